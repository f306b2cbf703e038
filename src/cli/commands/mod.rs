pub mod admin;
pub mod migrate;
pub mod serve;

use anyhow::Context;

use crate::config::config;
use crate::database::DatabaseManager;

/// Connect with the configured pool settings, ready for `migrate`/queries
pub(crate) async fn connect() -> anyhow::Result<DatabaseManager> {
    DatabaseManager::connect(&config().database)
        .await
        .context("failed to connect to PostgreSQL")
}
