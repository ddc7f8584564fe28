use std::str::FromStr;

use anyhow::Result;
use serde::Deserialize;
use sqlx::{
    migrate::MigrateDatabase,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Sqlite, SqlitePool,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub url: String,
    pub max_connections: u32,
}

/// Opens the pool shared by every request and brings the schema up to date.
///
/// An in-memory url gives each connection its own database, so callers using
/// `sqlite::memory:` should keep `max_connections` at 1.
pub async fn create_pool(settings: &Settings) -> Result<SqlitePool> {
    match Sqlite::database_exists(&settings.url).await? {
        true => tracing::info!("Database already exists"),
        false => {
            tracing::info!("Creating database {}", settings.url);
            Sqlite::create_database(&settings.url).await?
        }
    }

    let connect_options = SqliteConnectOptions::from_str(&settings.url)?;
    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(connect_options)
        .await?;

    sqlx::migrate!("db/migrations").run(&pool).await?;

    Ok(pool)
}
