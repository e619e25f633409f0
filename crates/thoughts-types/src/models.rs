use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A message posted to the board, with its like counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thought {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub message: String,
    pub hearts: i64,
    pub created_at: DateTime<Utc>,
}
