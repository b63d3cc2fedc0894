use super::schema::REGISTERED_RECORDS;
use crate::config::DatabaseConfig;
use crate::context::Context;
use crate::error::{FlowRunError, Result};
use crate::health::Pinger;
use crate::logging::Logger;
use crate::validation::check;
use async_trait::async_trait;
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use sqlx::Connection;
use std::time::Duration;
use tracing::{debug, info, warn, Instrument};

/// Upper bound on waiting for a pooled connection
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Pooled handle to the relational store.
///
/// The pool is owned here; other components only see it through [`Pinger`].
pub struct Database {
    pool: AnyPool,
    logger: Logger,
}

impl Database {
    /// Validate `config`, connect the pool and create any missing tables.
    pub async fn open(config: &DatabaseConfig, logger: Logger) -> Result<Self> {
        check(config)?;
        sqlx::any::install_default_drivers();

        let min_connections = config.max_idle_conns.min(config.max_open_conns);
        if min_connections < config.max_idle_conns {
            warn!(
                parent: logger.span(),
                "DB_MAX_IDLE_CONNS ({}) exceeds DB_MAX_OPEN_CONNS ({}), keeping {} idle",
                config.max_idle_conns,
                config.max_open_conns,
                min_connections
            );
        }

        let pool = AnyPoolOptions::new()
            .max_connections(config.max_open_conns)
            .min_connections(min_connections)
            .max_lifetime(config.conn_max_lifetime)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(&config.url)
            .instrument(logger.span().clone())
            .await?;

        let database = Self { pool, logger };
        database.sync_schema().await?;

        info!(
            parent: database.logger.span(),
            max_open = config.max_open_conns,
            max_idle = min_connections,
            "Database connection established"
        );
        Ok(database)
    }

    async fn sync_schema(&self) -> Result<()> {
        for (table, ddl) in REGISTERED_RECORDS {
            debug!(parent: self.logger.span(), "Synchronising table {}", table);
            sqlx::query(ddl).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// One round trip on a single pooled connection, released before returning
    pub async fn ping(&self, ctx: &Context) -> Result<()> {
        ctx.run("database ping", async {
            let mut conn = self.pool.acquire().await?;
            conn.ping().await?;
            Ok::<_, FlowRunError>(())
        })
        .await
    }

    /// Close the pool, waiting for checked-out connections to come back
    pub async fn close(&self, ctx: &Context) -> Result<()> {
        info!(parent: self.logger.span(), "Closing database connection pool");
        ctx.run("database close", async {
            self.pool.close().await;
            Ok::<_, FlowRunError>(())
        })
        .await
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

#[async_trait]
impl Pinger for Database {
    async fn ping(&self, ctx: &Context) -> Result<()> {
        Database::ping(self, ctx).await
    }
}
