use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

use crate::error::AppError;

pub mod matches;
mod migrations;
mod models;
mod repository;
pub mod snapshots;

pub use migrations::run_migrations;
pub use models::{
    MatchRecord, MatchWithSnapshot, NewMatch, NewSnapshot, Player, RankInfo, RankSnapshot, WalkRow,
};
pub use repository::Repository;

/// Open the SQLite pool and bring the schema up to date.
///
/// In-memory databases live per connection, so they need `max_connections == 1`
/// and a connection that is never recycled.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    info!(database_url, "🗄️ Database connected");
    run_migrations(&pool).await?;
    Ok(pool)
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    connect("sqlite::memory:", 1).await.unwrap()
}
