//! Folio Storage
//!
//! `SQLite` database layer for the Folio catalog.
//!
//! This crate provides persistent storage for work records and application
//! settings, and implements the `CatalogStore` / `SettingsProvider`
//! collaborator traits from `folio-core`.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: Each feature owns its own queries (`works`,
//!   `settings`)
//! - **Explicit Ownership**: The `Database` handle is constructed by the
//!   caller and passed to the engine; there is no global connection state
//!
//! # Example
//!
//! ```rust,no_run
//! use folio_storage::{create_pool, run_migrations, Database};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://folio.db").await?;
//! run_migrations(&pool).await?;
//!
//! let db = Database::from_pool(pool);
//! let works = folio_storage::works::list_all(db.pool()).await?;
//! # Ok(())
//! # }
//! ```

mod database;
mod error;

// Vertical slices
pub mod settings;
pub mod works;

pub use database::Database;
pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://folio.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}
