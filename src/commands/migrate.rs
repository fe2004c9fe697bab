//! Database migration command.

use arbor_core::config::AppConfig;
use arbor_core::result::AppResult;
use arbor_database::DatabasePool;
use arbor_database::migration::run_migrations;

use crate::output;

/// Apply pending migrations.
pub async fn execute(config: &AppConfig) -> AppResult<()> {
    let pool = DatabasePool::connect(&config.database).await?;
    run_migrations(pool.pool()).await?;
    pool.close().await;
    output::print_success("All migrations applied successfully.");
    Ok(())
}
