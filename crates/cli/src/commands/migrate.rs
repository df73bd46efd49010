//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! otelier migrate
//! ```
//!
//! # Environment Variables
//!
//! - `OTELIER_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! `crates/api/migrations/`

use otelier_api::db;

use super::{CommandError, database_url};

/// Run the API's migrations.
pub async fn run() -> Result<(), CommandError> {
    let url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
