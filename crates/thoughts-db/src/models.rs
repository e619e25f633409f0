//! Database row types. These map directly to SQLite rows and stay distinct
//! from the thoughts-types API models to keep the DB layer independent.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThoughtRow {
    pub id: String,
    pub message: String,
    pub hearts: i64,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub access_token: String,
    pub register_date: String,
}

pub struct NewThought<'a> {
    pub id: &'a str,
    pub message: &'a str,
    pub hearts: i64,
    /// RFC 3339 with a fixed precision, see [`timestamp`].
    pub created_at: &'a str,
}

pub struct NewUser<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub access_token: &'a str,
    pub register_date: &'a str,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeartsFilter {
    #[default]
    Any,
    Exact(i64),
    AtLeast(i64),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThoughtOrder {
    #[default]
    Newest,
    Oldest,
    /// Hearts descending, newest first among equals.
    MostHearts,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThoughtQuery {
    pub hearts: HeartsFilter,
    pub order: ThoughtOrder,
    pub limit: Option<u32>,
}

/// Formats a timestamp the way it is stored. Fixed microsecond precision and
/// a `Z` suffix keep the text order equal to the time order.
pub fn timestamp(at: chrono::DateTime<chrono::Utc>) -> String {
    at.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
