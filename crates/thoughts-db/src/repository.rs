//! Storage interfaces used by the HTTP layer. [`crate::Database`] implements
//! both over SQLite; see `queries.rs`.

use crate::Result;
use crate::models::{NewThought, NewUser, ThoughtQuery, ThoughtRow, UserRow};

pub trait ThoughtRepository: Send + Sync {
    fn list_thoughts(&self, query: &ThoughtQuery) -> Result<Vec<ThoughtRow>>;

    fn get_thought(&self, id: &str) -> Result<Option<ThoughtRow>>;

    fn insert_thought(&self, thought: &NewThought<'_>) -> Result<ThoughtRow>;

    /// Inserts every thought or none of them. Returns the number inserted.
    fn insert_thoughts(&self, thoughts: &[NewThought<'_>]) -> Result<usize>;

    /// Adds one heart in a single statement. `None` if the id is unknown.
    fn like_thought(&self, id: &str) -> Result<Option<ThoughtRow>>;

    fn update_message(&self, id: &str, message: &str) -> Result<Option<ThoughtRow>>;

    /// Returns the row as it was before deletion.
    fn delete_thought(&self, id: &str) -> Result<Option<ThoughtRow>>;

    fn count_thoughts(&self) -> Result<u64>;
}

pub trait UserRepository: Send + Sync {
    /// Fails with [`crate::DbError::Duplicate`] naming the taken column.
    fn create_user(&self, user: &NewUser<'_>) -> Result<UserRow>;

    fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>>;

    fn get_user_by_name(&self, name: &str) -> Result<Option<UserRow>>;

    fn get_user_by_token(&self, token: &str) -> Result<Option<UserRow>>;
}
