use rusqlite::{Connection, OptionalExtension, Row};

use crate::error::unique_violation;
use crate::models::{
    HeartsFilter, NewThought, NewUser, ThoughtOrder, ThoughtQuery, ThoughtRow, UserRow,
};
use crate::{Database, Result, ThoughtRepository, UserRepository};

const THOUGHT_COLUMNS: &str = "id, message, hearts, created_at";
const USER_COLUMNS: &str = "id, name, email, password, access_token, register_date";

impl ThoughtRepository for Database {
    fn list_thoughts(&self, query: &ThoughtQuery) -> Result<Vec<ThoughtRow>> {
        self.with_conn(|conn| query_thoughts(conn, query))
    }

    fn get_thought(&self, id: &str) -> Result<Option<ThoughtRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!("SELECT {THOUGHT_COLUMNS} FROM thoughts WHERE id = ?1"),
                    [id],
                    thought_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    fn insert_thought(&self, thought: &NewThought<'_>) -> Result<ThoughtRow> {
        self.with_conn_mut(|conn| {
            let row = conn.query_row(
                &format!(
                    "INSERT INTO thoughts (id, message, hearts, created_at) VALUES (?1, ?2, ?3, ?4)
                     RETURNING {THOUGHT_COLUMNS}"
                ),
                rusqlite::params![thought.id, thought.message, thought.hearts, thought.created_at],
                thought_from_row,
            )?;
            Ok(row)
        })
    }

    fn insert_thoughts(&self, thoughts: &[NewThought<'_>]) -> Result<usize> {
        self.with_conn_mut(|conn| {
            // Dropping the transaction without commit rolls the batch back.
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO thoughts (id, message, hearts, created_at) VALUES (?1, ?2, ?3, ?4)",
                )?;
                for thought in thoughts {
                    stmt.execute(rusqlite::params![
                        thought.id,
                        thought.message,
                        thought.hearts,
                        thought.created_at,
                    ])?;
                }
            }
            tx.commit()?;
            Ok(thoughts.len())
        })
    }

    fn like_thought(&self, id: &str) -> Result<Option<ThoughtRow>> {
        // Read-modify-write happens inside SQLite, so concurrent likes can't
        // overwrite each other.
        self.with_conn_mut(|conn| {
            let row = conn
                .query_row(
                    &format!(
                        "UPDATE thoughts SET hearts = hearts + 1 WHERE id = ?1
                         RETURNING {THOUGHT_COLUMNS}"
                    ),
                    [id],
                    thought_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    fn update_message(&self, id: &str, message: &str) -> Result<Option<ThoughtRow>> {
        self.with_conn_mut(|conn| {
            let row = conn
                .query_row(
                    &format!(
                        "UPDATE thoughts SET message = ?2 WHERE id = ?1
                         RETURNING {THOUGHT_COLUMNS}"
                    ),
                    [id, message],
                    thought_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    fn delete_thought(&self, id: &str) -> Result<Option<ThoughtRow>> {
        self.with_conn_mut(|conn| {
            let row = conn
                .query_row(
                    &format!("DELETE FROM thoughts WHERE id = ?1 RETURNING {THOUGHT_COLUMNS}"),
                    [id],
                    thought_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    fn count_thoughts(&self) -> Result<u64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM thoughts", [], |r| r.get(0))?;
            Ok(count.max(0) as u64)
        })
    }
}

impl UserRepository for Database {
    fn create_user(&self, user: &NewUser<'_>) -> Result<UserRow> {
        self.with_conn_mut(|conn| {
            conn.query_row(
                &format!(
                    "INSERT INTO users (id, name, email, password, access_token, register_date)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                     RETURNING {USER_COLUMNS}"
                ),
                rusqlite::params![
                    user.id,
                    user.name,
                    user.email,
                    user.password_hash,
                    user.access_token,
                    user.register_date,
                ],
                user_from_row,
            )
            .map_err(|e| unique_violation(e, &["name", "email", "access_token"]))
        })
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by(conn, "email", email))
    }

    fn get_user_by_name(&self, name: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by(conn, "name", name))
    }

    fn get_user_by_token(&self, token: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by(conn, "access_token", token))
    }
}

fn query_thoughts(conn: &Connection, query: &ThoughtQuery) -> Result<Vec<ThoughtRow>> {
    let (filter, hearts) = match query.hearts {
        HeartsFilter::Any => ("", 0),
        HeartsFilter::Exact(n) => ("WHERE hearts = ?1", n),
        HeartsFilter::AtLeast(n) => ("WHERE hearts >= ?1", n),
    };

    // rowid breaks ties between thoughts created within the same microsecond.
    let order = match query.order {
        ThoughtOrder::Newest => "created_at DESC, rowid DESC",
        ThoughtOrder::Oldest => "created_at ASC, rowid ASC",
        ThoughtOrder::MostHearts => "hearts DESC, created_at DESC, rowid DESC",
    };

    // A negative LIMIT means no limit in SQLite.
    let limit = query.limit.map(i64::from).unwrap_or(-1);

    let mut stmt = conn.prepare(&format!(
        "SELECT {THOUGHT_COLUMNS} FROM thoughts {filter} ORDER BY {order} LIMIT ?2"
    ))?;

    let rows = stmt
        .query_map(rusqlite::params![hearts, limit], thought_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// `column` is always one of the literals above, never user input.
fn query_user_by(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1"
    ))?;

    let row = stmt.query_row([value], user_from_row).optional()?;

    Ok(row)
}

fn thought_from_row(row: &Row<'_>) -> rusqlite::Result<ThoughtRow> {
    Ok(ThoughtRow {
        id: row.get(0)?,
        message: row.get(1)?,
        hearts: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        access_token: row.get(4)?,
        register_date: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::DbError;
    use crate::models::timestamp;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    /// Inserts a thought created `minutes` after a fixed epoch.
    fn seed(db: &Database, message: &str, hearts: i64, minutes: i64) -> ThoughtRow {
        let id = Uuid::new_v4().to_string();
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes);
        let created_at = timestamp(at);
        db.insert_thought(&NewThought {
            id: &id,
            message,
            hearts,
            created_at: &created_at,
        })
        .unwrap()
    }

    fn new_user<'a>(id: &'a str, name: &'a str, email: &'a str, token: &'a str) -> NewUser<'a> {
        NewUser {
            id,
            name,
            email,
            password_hash: "$argon2id$fake",
            access_token: token,
            register_date: "2024-01-01T00:00:00.000000Z",
        }
    }

    #[test]
    fn insert_and_get_thought() {
        let db = db();
        let created = seed(&db, "first thought", 0, 0);

        let fetched = db.get_thought(&created.id).unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.hearts, 0);

        assert!(db.get_thought(&Uuid::new_v4().to_string()).unwrap().is_none());
    }

    #[test]
    fn batch_insert_is_all_or_nothing() {
        let db = db();
        let at = timestamp(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap());
        let thought = |id, hearts| NewThought {
            id,
            message: "imported thought",
            hearts,
            created_at: &at,
        };

        let err = db
            .insert_thoughts(&[thought("a", 1), thought("b", 2), thought("a", 3)])
            .unwrap_err();
        assert!(matches!(err, DbError::Sqlite(_)));
        assert_eq!(db.count_thoughts().unwrap(), 0);

        // Negative hearts break the CHECK constraint on the second row.
        assert!(db.insert_thoughts(&[thought("c", 0), thought("d", -1)]).is_err());
        assert_eq!(db.count_thoughts().unwrap(), 0);

        assert_eq!(db.insert_thoughts(&[thought("e", 5), thought("f", 0)]).unwrap(), 2);
        assert_eq!(db.count_thoughts().unwrap(), 2);
        assert_eq!(db.get_thought("e").unwrap().unwrap().hearts, 5);
    }

    #[test]
    fn like_twice_adds_two_hearts() {
        let db = db();
        let thought = seed(&db, "like me please", 0, 0);

        db.like_thought(&thought.id).unwrap().unwrap();
        let liked = db.like_thought(&thought.id).unwrap().unwrap();
        assert_eq!(liked.hearts, 2);

        assert!(db.like_thought("missing").unwrap().is_none());
    }

    #[test]
    fn concurrent_likes_are_not_lost() {
        let db = Arc::new(db());
        let thought = seed(&db, "popular thought", 0, 0);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let db = db.clone();
                let id = thought.id.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        db.like_thought(&id).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(db.get_thought(&thought.id).unwrap().unwrap().hearts, 200);
    }

    #[test]
    fn exact_and_minimum_heart_filters() {
        let db = db();
        seed(&db, "zero hearts", 0, 0);
        seed(&db, "three hearts", 3, 1);
        seed(&db, "three again", 3, 2);
        seed(&db, "seven hearts", 7, 3);

        let exact = db
            .list_thoughts(&ThoughtQuery {
                hearts: HeartsFilter::Exact(3),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(exact.len(), 2);
        assert!(exact.iter().all(|t| t.hearts == 3));

        let at_least = db
            .list_thoughts(&ThoughtQuery {
                hearts: HeartsFilter::AtLeast(3),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(at_least.len(), 3);
        assert!(at_least.iter().all(|t| t.hearts >= 3));

        let none = db
            .list_thoughts(&ThoughtQuery {
                hearts: HeartsFilter::Exact(42),
                ..Default::default()
            })
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn ordering_by_creation_and_hearts() {
        let db = db();
        seed(&db, "middle one", 5, 10);
        seed(&db, "oldest one", 1, 0);
        seed(&db, "newest one", 9, 20);

        let messages = |order| {
            db.list_thoughts(&ThoughtQuery {
                order,
                ..Default::default()
            })
            .unwrap()
            .into_iter()
            .map(|t| t.message)
            .collect::<Vec<_>>()
        };

        assert_eq!(
            messages(ThoughtOrder::Newest),
            ["newest one", "middle one", "oldest one"]
        );
        assert_eq!(
            messages(ThoughtOrder::Oldest),
            ["oldest one", "middle one", "newest one"]
        );
        assert_eq!(
            messages(ThoughtOrder::MostHearts),
            ["newest one", "middle one", "oldest one"]
        );
    }

    #[test]
    fn same_timestamp_falls_back_to_insertion_order() {
        let db = db();
        seed(&db, "inserted first", 0, 0);
        seed(&db, "inserted second", 0, 0);

        let newest = db.list_thoughts(&ThoughtQuery::default()).unwrap();
        assert_eq!(newest[0].message, "inserted second");
    }

    #[test]
    fn limit_caps_results() {
        let db = db();
        for i in 0..5 {
            seed(&db, "some thought", 0, i);
        }

        let rows = db
            .list_thoughts(&ThoughtQuery {
                limit: Some(2),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(db.count_thoughts().unwrap(), 5);
    }

    #[test]
    fn update_and_delete() {
        let db = db();
        let thought = seed(&db, "original text", 4, 0);

        let updated = db.update_message(&thought.id, "edited text").unwrap().unwrap();
        assert_eq!(updated.message, "edited text");
        assert_eq!(updated.hearts, 4);

        let deleted = db.delete_thought(&thought.id).unwrap().unwrap();
        assert_eq!(deleted.message, "edited text");
        assert!(db.get_thought(&thought.id).unwrap().is_none());
        assert!(db.delete_thought(&thought.id).unwrap().is_none());
        assert!(db.update_message(&thought.id, "too late").unwrap().is_none());
    }

    #[test]
    fn duplicate_email_and_name_are_reported() {
        let db = db();
        db.create_user(&new_user("u1", "alice", "alice@example.com", "t1"))
            .unwrap();

        let err = db
            .create_user(&new_user("u2", "alicia", "alice@example.com", "t2"))
            .unwrap_err();
        assert!(matches!(err, DbError::Duplicate("email")));

        let err = db
            .create_user(&new_user("u3", "alice", "other@example.com", "t3"))
            .unwrap_err();
        assert!(matches!(err, DbError::Duplicate("name")));
    }

    #[test]
    fn user_lookups() {
        let db = db();
        db.create_user(&new_user("u1", "bobby", "bob@example.com", "secret-token"))
            .unwrap();

        assert_eq!(db.get_user_by_email("bob@example.com").unwrap().unwrap().id, "u1");
        assert_eq!(db.get_user_by_name("bobby").unwrap().unwrap().id, "u1");
        assert_eq!(db.get_user_by_token("secret-token").unwrap().unwrap().name, "bobby");
        assert!(db.get_user_by_token("nope").unwrap().is_none());
    }
}
