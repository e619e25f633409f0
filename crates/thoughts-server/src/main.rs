mod config;
mod seed;

use std::sync::Arc;

use tracing::info;

use thoughts_api::{AppStateInner, router};
use thoughts_db::Database;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "thoughts=debug,thoughts_api=debug,thoughts_db=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = Config::from_env()?;

    // Init database
    let db = Arc::new(Database::open(&config.database_url)?);

    if let Some(path) = &config.seed_file {
        seed::seed_if_empty(&*db, path)?;
    }

    let app = router(AppStateInner::new(db));

    let addr = config.addr()?;
    info!("Thoughts API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
