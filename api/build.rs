use std::{path::Path, str::FromStr};

use anyhow::Result;
use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

static MIGRATOR: Migrator = sqlx::migrate!("./db/migrations");

#[tokio::main]
async fn main() -> Result<()> {
    // `sqlx::migrate!` embeds the migrations at compile time
    println!("cargo:rerun-if-changed=db/migrations");

    let current_dir = std::env::current_dir()?;

    // a missing dev database never blocks the build
    if let Err(err) = setup_dev_db(&current_dir).await {
        println!("cargo:warning=Skipping dev database setup: {err}");
    }

    Ok(())
}

/// Keeps `db/gym.db` migrated so it can be inspected with the sqlite shell
/// while developing. The server itself migrates whatever database it is
/// pointed at on start.
async fn setup_dev_db(current_dir: &Path) -> Result<()> {
    let db_path = current_dir.join("db/gym.db");
    let db_url = format!("sqlite://{}", db_path.display());

    println!("cargo:warning=Ensuring database exists at {}", &db_url);

    let connect_options = SqliteConnectOptions::from_str(&db_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(connect_options)
        .await?;

    MIGRATOR.run(&pool).await?;
    println!("cargo:warning=Build script: Migrations complete.");

    Ok(())
}
