pub mod auth;
pub mod credentials;
pub mod error;
pub mod hearts;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod thoughts;
pub mod validation;

pub use error::ApiError;
pub use routes::router;
pub use state::{AppState, AppStateInner};
