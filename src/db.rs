use crate::config::DatabaseConfig;
use rocket::fairing::AdHoc;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("database url is not configured")]
    MissingUrl,
    #[error("failed to connect: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("failed to run migrations: {0}")]
    Migrate(#[source] sqlx::migrate::MigrateError),
}

fn pool_options(db_config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(db_config.max_connections)
        .min_connections(db_config.min_connections)
        .acquire_timeout(Duration::from_secs(db_config.acquire_timeout))
        .idle_timeout(Duration::from_secs(30))
        .max_lifetime(Duration::from_secs(1800))
}

pub(crate) async fn init_pool(db_config: &DatabaseConfig) -> Result<PgPool, StageError> {
    if db_config.url.trim().is_empty() {
        return Err(StageError::MissingUrl);
    }

    let pool = pool_options(db_config).connect(&db_config.url).await.map_err(StageError::Connect)?;

    MIGRATOR.run(&pool).await.map_err(StageError::Migrate)?;

    Ok(pool)
}

/// Builds a pool that only connects on first use. Used where no query is expected to run.
pub fn lazy_pool(db_config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    pool_options(db_config).min_connections(0).connect_lazy(&db_config.url)
}

pub fn stage_db(db_config: DatabaseConfig) -> AdHoc {
    AdHoc::try_on_ignite("Postgres (sqlx)", |rocket| async move {
        match init_pool(&db_config).await {
            Ok(pool) => {
                tracing::info!("Database pool initialized successfully");
                Ok(rocket.manage(pool))
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize database pool");
                Err(rocket)
            }
        }
    })
}
