use std::str::FromStr;

use log::info;
use sqlx::{
    migrate,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/kirana.db";

/// The database URL from `KPS_DATABASE_URL`, or the default on-disk location.
pub fn db_url() -> String {
    std::env::var("KPS_DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Creates a connection pool for the given URL, creating the database file if it does not exist. Foreign keys are
/// switched on so that order-item rows follow their order.
pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true).foreign_keys(true);
    SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    migrate!("./src/sqlite/migrations").run(pool).await?;
    info!("🗃️ Migrations complete");
    Ok(())
}
