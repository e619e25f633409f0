use uuid::Uuid;

use crate::error::ApiError;

pub const MESSAGE_MIN_CHARS: usize = 5;
pub const MESSAGE_MAX_CHARS: usize = 140;
pub const NAME_MIN_CHARS: usize = 4;
pub const NAME_MAX_CHARS: usize = 32;
pub const PASSWORD_MIN_CHARS: usize = 8;

/// Trimmed thought message of 5 to 140 characters.
pub fn thought_message(message: Option<&str>) -> Result<String, ApiError> {
    let message = required("message", message)?;
    let len = message.chars().count();

    if len < MESSAGE_MIN_CHARS {
        return Err(ApiError::validation(
            "message",
            format!(
                "Message is too short ({} characters), minimum is {}",
                len, MESSAGE_MIN_CHARS
            ),
        ));
    }
    if len > MESSAGE_MAX_CHARS {
        return Err(ApiError::validation(
            "message",
            format!(
                "Message is too long ({} characters), maximum is {}",
                len, MESSAGE_MAX_CHARS
            ),
        ));
    }

    Ok(message.to_owned())
}

pub fn user_name(name: Option<&str>) -> Result<String, ApiError> {
    let name = required("name", name)?;
    let len = name.chars().count();

    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len) {
        return Err(ApiError::validation(
            "name",
            format!(
                "Name must be between {} and {} characters",
                NAME_MIN_CHARS, NAME_MAX_CHARS
            ),
        ));
    }

    Ok(name.to_owned())
}

/// Emails compare case-insensitively, so they are stored lower-cased.
pub fn email(email: Option<&str>) -> Result<String, ApiError> {
    Ok(required("email", email)?.to_lowercase())
}

/// Passwords are taken as-is; surrounding whitespace is significant.
pub fn new_password(password: Option<&str>) -> Result<String, ApiError> {
    let password = password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::validation("password", "Password is required"))?;

    if password.chars().count() < PASSWORD_MIN_CHARS {
        return Err(ApiError::validation(
            "password",
            format!("Password must be at least {} characters", PASSWORD_MIN_CHARS),
        ));
    }

    Ok(password.to_owned())
}

pub fn password(password: Option<&str>) -> Result<String, ApiError> {
    password
        .filter(|p| !p.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| ApiError::validation("password", "Password is required"))
}

/// Parse a path id, rejecting anything that isn't a UUID.
pub fn thought_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::InvalidId(raw.to_owned()))
}

/// Page size for list endpoints: `max` when unset, never above it, never 0.
pub fn list_limit(limit: Option<u32>, max: u32) -> Result<u32, ApiError> {
    match limit {
        Some(0) => Err(ApiError::validation("limit", "Limit must be at least 1")),
        Some(n) => Ok(n.min(max)),
        None => Ok(max),
    }
}

fn required<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str, ApiError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::validation(field, format!("{} is required", capitalize(field))))
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
