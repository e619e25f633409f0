use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use thoughts_db::DbError;
use thoughts_db::models::{NewUser, timestamp};
use thoughts_types::api::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

use crate::credentials::{generate_access_token, hash_password, verify_password};
use crate::error::ApiError;
use crate::state::{AppState, blocking};
use crate::validation;

pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    // Validate input
    let name = validation::user_name(req.name.as_deref())?;
    let email = validation::email(req.email.as_deref())?;
    let password = validation::new_password(req.password.as_deref())?;

    // Check if name or email is taken
    let users = state.users.clone();
    let (check_name, check_email) = (name.clone(), email.clone());
    let taken = blocking(move || -> Result<Option<&'static str>, DbError> {
        if users.get_user_by_name(&check_name)?.is_some() {
            return Ok(Some("name"));
        }
        if users.get_user_by_email(&check_email)?.is_some() {
            return Ok(Some("email"));
        }
        Ok(None)
    })
    .await?;
    if let Some(field) = taken {
        return Err(ApiError::Conflict(field));
    }

    // Hash password with Argon2id
    let password_hash = blocking(move || {
        hash_password(&password).map_err(|e| {
            error!("Password hashing failed: {}", e);
            ApiError::Internal
        })
    })
    .await?;

    let user_id = Uuid::new_v4();
    let access_token = generate_access_token();

    // A concurrent registration can still win the race; the UNIQUE
    // constraints turn that into a Duplicate error, i.e. 409.
    let users = state.users.clone();
    let (id, token) = (user_id.to_string(), access_token.clone());
    let register_date = timestamp(Utc::now());
    let user = blocking(move || {
        users.create_user(&NewUser {
            id: &id,
            name: &name,
            email: &email,
            password_hash: &password_hash,
            access_token: &token,
            register_date: &register_date,
        })
    })
    .await?;

    info!("Registered user {} ({})", user.name, user.id);

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user_id,
            access_token,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = validation::email(req.email.as_deref())?;
    let password = validation::password(req.password.as_deref())?;

    let users = state.users.clone();
    let user = blocking(move || users.get_user_by_email(&email))
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    // Verify password
    let hash = user.password.clone();
    let matches = blocking(move || Ok::<_, ApiError>(verify_password(&password, &hash))).await?;
    if !matches {
        return Err(ApiError::InvalidCredentials);
    }

    let user_id: Uuid = user.id.parse().map_err(|e| {
        error!("Corrupt user id '{}': {}", user.id, e);
        ApiError::Internal
    })?;

    info!("{} logged in", user.name);

    Ok(Json(LoginResponse {
        user_id,
        access_token: user.access_token,
    }))
}
