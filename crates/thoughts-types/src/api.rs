use serde::{Deserialize, Serialize};
use uuid::Uuid;

// -- Auth --

/// Fields are optional so that a missing one is reported by the handler as a
/// readable 400 instead of a generic body rejection.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub id: Uuid,
    pub access_token: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub access_token: String,
}

// -- Thoughts --

#[derive(Debug, Default, Deserialize)]
pub struct CreateThoughtRequest {
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateThoughtRequest {
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

/// Query string of `GET /thoughts`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtListQuery {
    /// Exact heart count.
    pub hearts: Option<i64>,
    /// Minimum heart count.
    pub min_hearts: Option<i64>,
    #[serde(default)]
    pub sort: SortOrder,
    pub limit: Option<u32>,
}

/// Query string of `GET /hearts`.
#[derive(Debug, Default, Deserialize)]
pub struct HeartsQuery {
    pub hearts: Option<i64>,
}

// -- Index --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    pub path: String,
    pub methods: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointList {
    pub endpoints: Vec<Endpoint>,
}
