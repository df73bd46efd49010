//! CLI subcommands.

pub mod hotels;
pub mod migrate;
pub mod token;

use otelier_api::config::{ConfigError, StorageConfig};
use secrecy::SecretString;
use thiserror::Error;

/// Errors shared by the database-backed commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("OTELIER_STORAGE=memory has no database to manage")]
    MemoryStorage,

    #[error("Invalid {0}: {1}")]
    InvalidArgument(&'static str, String),

    #[error(transparent)]
    Api(#[from] otelier_api::error::AppError),

    #[error(transparent)]
    Repository(#[from] otelier_api::db::RepositoryError),
}

/// Database URL from `OTELIER_DATABASE_URL` (or `DATABASE_URL`).
fn database_url() -> Result<SecretString, CommandError> {
    match StorageConfig::load()? {
        StorageConfig::Postgres { database_url } => Ok(database_url),
        StorageConfig::Memory => Err(CommandError::MemoryStorage),
    }
}
