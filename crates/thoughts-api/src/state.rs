use std::sync::Arc;

use tracing::error;

use thoughts_db::{Database, ThoughtRepository, UserRepository};

use crate::credentials::{CredentialVerifier, StoredTokenVerifier};
use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub thoughts: Arc<dyn ThoughtRepository>,
    pub users: Arc<dyn UserRepository>,
    pub credentials: Arc<dyn CredentialVerifier>,
}

impl AppStateInner {
    /// State backed by a single SQLite database with stored-token auth.
    pub fn new(db: Arc<Database>) -> AppState {
        let users: Arc<dyn UserRepository> = db.clone();
        Arc::new(Self {
            thoughts: db,
            credentials: Arc::new(StoredTokenVerifier::new(users.clone())),
            users,
        })
    }
}

/// Run blocking store or hashing work off the async runtime.
pub async fn blocking<F, T, E>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal
        })?
        .map_err(Into::into)
}
