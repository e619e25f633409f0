pub mod error;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod repository;

pub use error::{DbError, Result};
pub use repository::{ThoughtRepository, UserRepository};

use rusqlite::Connection;
use std::sync::Mutex;
use tracing::info;

/// Path value that selects a private in-memory database.
pub const IN_MEMORY: &str = ":memory:";

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Opens (or creates) the database at `url`, which is either a file path
    /// or [`IN_MEMORY`].
    pub fn open(url: &str) -> Result<Self> {
        if url == IN_MEMORY {
            return Self::open_in_memory();
        }

        let conn = Connection::open(url)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        migrations::run(&conn)?;

        info!("Database opened at {}", url);
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        migrations::run(&conn)?;

        info!("In-memory database opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DbError::Poisoned(e.to_string()))?;
        f(&conn)
    }

    /// Exclusive access for writes that need `&mut Connection`, such as
    /// transactions.
    pub fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| DbError::Poisoned(e.to_string()))?;
        f(&mut conn)
    }
}
