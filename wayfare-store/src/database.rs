use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use tracing::{error, info, warn};

use crate::app_config::DatabaseConfig;

#[derive(Clone)]
pub struct DbClient {
    pub pool: Pool<Postgres>,
}

impl DbClient {
    pub async fn new(connection_string: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(connection_string)
            .await?;

        Ok(Self { pool })
    }

    /// Connect, retrying with a fixed delay. Gives up after
    /// `connect_attempts` failures and returns the last error.
    pub async fn connect_with_retry(cfg: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let attempts = cfg.connect_attempts.max(1);
        let delay = Duration::from_secs(cfg.connect_retry_delay_seconds);
        let mut attempt = 1;

        loop {
            match Self::new(&cfg.url, cfg.max_connections).await {
                Ok(client) => {
                    info!(attempt, "Connected to database");
                    return Ok(client);
                }
                Err(e) if attempt < attempts => {
                    warn!(attempt, attempts, "Database connection failed, retrying in {:?}: {}", delay, e);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!(attempts, "Database connection failed, giving up: {}", e);
                    return Err(e);
                }
            }
        }
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running database migrations...");
        sqlx::migrate!("../migrations")
            .run(&self.pool)
            .await?;
        info!("Migrations completed successfully.");
        Ok(())
    }
}
