use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("DB lock poisoned: {0}")]
    Poisoned(String),

    /// A `UNIQUE` column already holds the value. Carries the column name.
    #[error("Duplicate value for {0}")]
    Duplicate(&'static str),
}

/// Maps a unique-constraint failure on one of `columns` to
/// [`DbError::Duplicate`]. SQLite reports these as
/// `UNIQUE constraint failed: <table>.<column>`.
pub(crate) fn unique_violation(err: rusqlite::Error, columns: &[&'static str]) -> DbError {
    if let rusqlite::Error::SqliteFailure(failure, Some(msg)) = &err {
        if failure.code == rusqlite::ErrorCode::ConstraintViolation {
            if let Some(column) = columns
                .iter()
                .find(|c| msg.ends_with(&format!(".{}", c)))
            {
                return DbError::Duplicate(*column);
            }
        }
    }
    DbError::Sqlite(err)
}
