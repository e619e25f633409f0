use rusqlite::Connection;
use tracing::info;

use crate::Result;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (thoughts and users)");
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS thoughts (
                id          TEXT PRIMARY KEY,
                message     TEXT NOT NULL,
                hearts      INTEGER NOT NULL DEFAULT 0 CHECK (hearts >= 0),
                created_at  TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_thoughts_created
                ON thoughts(created_at);

            CREATE INDEX IF NOT EXISTS idx_thoughts_hearts
                ON thoughts(hearts, created_at);

            CREATE TABLE IF NOT EXISTS users (
                id              TEXT PRIMARY KEY,
                name            TEXT NOT NULL UNIQUE,
                email           TEXT NOT NULL UNIQUE,
                password        TEXT NOT NULL,
                access_token    TEXT NOT NULL UNIQUE,
                register_date   TEXT NOT NULL
            );

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        run(&conn).unwrap();

        let versions: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(versions, 1);
    }
}
