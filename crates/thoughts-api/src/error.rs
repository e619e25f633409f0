use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use thoughts_db::DbError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("'{0}' is not a valid thought id")]
    InvalidId(String),

    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Invalid request body: {0}")]
    Body(String),

    #[error("Invalid query string: {0}")]
    Query(String),

    #[error("Thought with id {0} doesn't exist")]
    ThoughtNotFound(String),

    /// A list or filter matched nothing.
    #[error("{0}")]
    NoMatches(String),

    #[error("Authentication required: {0}")]
    Unauthorized(&'static str),

    #[error("Email or password is incorrect")]
    InvalidCredentials,

    #[error("A user with this {0} already exists")]
    Conflict(&'static str),

    #[error("No route for {0}")]
    RouteNotFound(String),

    #[error("Internal server error")]
    Internal,

    #[error("Database error: {0}")]
    Database(DbError),
}

impl ApiError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidId(_) | Self::Validation { .. } | Self::Body(_) | Self::Query(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::ThoughtNotFound(_) | Self::NoMatches(_) | Self::RouteNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Unauthorized(_) | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal | Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Duplicate(field) => Self::Conflict(field),
            other => Self::Database(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Query(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            Self::Validation { field, message } => json!({
                "error": message,
                "details": { "field": field },
            }),
            Self::Database(err) => {
                error!("Database error: {}", err);
                json!({ "error": Self::Internal.to_string() })
            }
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
