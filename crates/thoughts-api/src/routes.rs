use axum::{
    Json, Router,
    http::Uri,
    middleware,
    routing::{get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use thoughts_types::api::{Endpoint, EndpointList};

use crate::error::ApiError;
use crate::middleware::require_auth;
use crate::state::AppState;
use crate::{auth, hearts, thoughts};

/// Every route the router serves, listed by `GET /`. Keep in sync with
/// [`router`]; the integration tests check each entry resolves.
pub const ENDPOINTS: &[(&str, &[&str])] = &[
    ("/", &["GET"]),
    ("/thoughts", &["GET", "POST"]),
    ("/thoughts/{id}", &["GET", "PUT", "DELETE"]),
    ("/thoughts/{id}/like", &["POST"]),
    ("/hearts", &["GET"]),
    ("/register", &["POST"]),
    ("/login", &["POST"]),
];

/// Protected methods carry `require_auth` as a route layer, so methods a
/// path doesn't serve still answer 405 before any token check.
pub fn router(state: AppState) -> Router {
    let authenticated = middleware::from_fn_with_state(state.clone(), require_auth);

    Router::new()
        .route("/", get(list_endpoints))
        .route(
            "/thoughts",
            get(thoughts::list_thoughts)
                .merge(post(thoughts::create_thought).route_layer(authenticated.clone())),
        )
        .route(
            "/thoughts/{id}",
            get(thoughts::get_thought).merge(
                put(thoughts::update_thought)
                    .delete(thoughts::delete_thought)
                    .route_layer(authenticated),
            ),
        )
        .route("/thoughts/{id}/like", post(hearts::like_thought))
        .route("/hearts", get(hearts::most_hearts))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .fallback(route_not_found)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn list_endpoints() -> Json<EndpointList> {
    let endpoints = ENDPOINTS
        .iter()
        .map(|(path, methods)| Endpoint {
            path: path.replace("{id}", ":id"),
            methods: methods.iter().map(|m| m.to_string()).collect(),
        })
        .collect();

    Json(EndpointList { endpoints })
}

async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::RouteNotFound(uri.path().to_owned())
}
