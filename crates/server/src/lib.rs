pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod telemetry;

use ozbooks_ingest::{AutoExtractor, IngestPipeline, TextExtractor};
use ozbooks_storage::{create_db_with, seed_system_categories, DbPool};
use std::sync::Arc;

pub use config::{Config, LogFormat};
pub use error::AppError;
pub use routes::build_router;

pub struct AppState {
    pub pool: DbPool,
    pub pipeline: IngestPipeline,
    pub config: Config,
}

/// Opens the database, seeds shared categories and wires the import pipeline.
///
/// Bad bank patterns or a bad rules file fail here, before the server accepts requests.
pub async fn build_state(config: Config) -> anyhow::Result<AppState> {
    let banks = Arc::new(config.bank_registry()?);
    let rules = Arc::new(config.rule_set()?);

    let pool = create_db_with(&config.database, config.max_connections).await?;
    seed_system_categories(&pool, &config.system_categories).await?;

    let extractor: Arc<dyn TextExtractor> = Arc::new(AutoExtractor);
    let pipeline = IngestPipeline::new(pool.clone(), banks, rules, extractor);

    tracing::info!(
        database = %config.database.display(),
        banks = config.banks.len(),
        rules_file = ?config.rules_file,
        "state initialised"
    );
    Ok(AppState {
        pool,
        pipeline,
        config,
    })
}
