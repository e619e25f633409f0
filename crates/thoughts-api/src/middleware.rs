use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::error::ApiError;
use crate::state::{AppState, blocking};

/// Resolve the `Authorization` header to a user and attach it as an
/// [`crate::credentials::AuthUser`] extension. Rejects with 401 when the
/// header is missing or the token matches no user.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = access_token(req.headers())
        .ok_or(ApiError::Unauthorized("missing access token"))?
        .to_owned();

    let credentials = state.credentials.clone();
    let user = blocking(move || credentials.verify(&token))
        .await?
        .ok_or(ApiError::Unauthorized("invalid access token"))?;

    debug!("Authenticated request as {}", user.name);
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// The header carries the bare token; a `Bearer ` prefix is tolerated.
fn access_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let token = match value.split_once(' ') {
        Some(("Bearer", rest)) => rest.trim(),
        _ if value == "Bearer" => "",
        _ => value,
    };
    (!token.is_empty()).then_some(token)
}
