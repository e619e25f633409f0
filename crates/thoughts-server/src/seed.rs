//! One-time import of the legacy `data.json` thought fixture.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use thoughts_db::ThoughtRepository;
use thoughts_db::models::{NewThought, timestamp};

/// One fixture entry. `_id` and `__v` are ignored; every import gets a
/// fresh UUID.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedThought {
    pub message: String,
    #[serde(default)]
    pub hearts: i64,
    pub created_at: Option<DateTime<Utc>>,
}

pub fn parse(json: &str) -> Result<Vec<SeedThought>> {
    serde_json::from_str(json).context("seed file is not a JSON array of thoughts")
}

/// Inserts the whole fixture in one transaction, so a failure leaves the
/// store empty and the next start retries.
pub fn import(repo: &dyn ThoughtRepository, thoughts: &[SeedThought]) -> Result<usize> {
    let now = Utc::now();

    let keys: Vec<(String, String)> = thoughts
        .iter()
        .map(|t| {
            (
                Uuid::new_v4().to_string(),
                timestamp(t.created_at.unwrap_or(now)),
            )
        })
        .collect();

    let rows: Vec<NewThought<'_>> = thoughts
        .iter()
        .zip(&keys)
        .map(|(thought, (id, created_at))| NewThought {
            id,
            message: &thought.message,
            hearts: thought.hearts.max(0),
            created_at,
        })
        .collect();

    let imported = repo
        .insert_thoughts(&rows)
        .context("importing seed thoughts")?;
    Ok(imported)
}

/// Imports `path` only when the store has no thoughts yet. Returns how many
/// thoughts were imported.
pub fn seed_if_empty(repo: &dyn ThoughtRepository, path: &Path) -> Result<usize> {
    let existing = repo.count_thoughts()?;
    if existing > 0 {
        info!("Store already holds {} thoughts, skipping seed", existing);
        return Ok(0);
    }

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading seed file {}", path.display()))?;
    let imported = import(repo, &parse(&json)?)?;

    info!("Seeded {} thoughts from {}", imported, path.display());
    Ok(imported)
}
