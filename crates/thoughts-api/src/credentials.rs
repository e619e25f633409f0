use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use rand::RngCore;
use tracing::warn;
use uuid::Uuid;

use thoughts_db::models::UserRow;
use thoughts_db::{DbError, UserRepository};

/// Random bytes behind each access token (hex doubles the length).
const ACCESS_TOKEN_BYTES: usize = 64;

/// The user a request was authenticated as. Inserted into the request
/// extensions by [`crate::middleware::require_auth`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
}

impl TryFrom<&UserRow> for AuthUser {
    type Error = uuid::Error;

    fn try_from(row: &UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.parse()?,
            name: row.name.clone(),
        })
    }
}

/// Resolves a presented credential to a user. Route logic only depends on
/// this trait, so the opaque stored-token lookup can be replaced by a signed
/// token scheme.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Option<AuthUser>, DbError>;
}

/// Looks the token up verbatim against the tokens stored with each user.
pub struct StoredTokenVerifier {
    users: Arc<dyn UserRepository>,
}

impl StoredTokenVerifier {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

impl CredentialVerifier for StoredTokenVerifier {
    fn verify(&self, token: &str) -> Result<Option<AuthUser>, DbError> {
        let Some(row) = self.users.get_user_by_token(token)? else {
            return Ok(None);
        };

        match AuthUser::try_from(&row) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!("Corrupt user id '{}': {}", row.id, e);
                Ok(None)
            }
        }
    }
}

pub fn generate_access_token() -> String {
    let mut bytes = [0u8; ACCESS_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hash a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// `false` for a wrong password and for a hash that can't be parsed.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        warn!("Stored password hash is not a valid PHC string");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
