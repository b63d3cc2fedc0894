use super::{Component, LifecycleState, Orchestrator};
use crate::config::FlowRunConfig;
use crate::context::Context;
use crate::database::Database;
use crate::error::Result;
use crate::health::Pinger;
use crate::logging::Logger;
use crate::server::{HealthHandler, HttpServer, LoggingMiddleware};
use crate::validation::check;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// The FlowRun service: database, HTTP API and the lifecycle tying them together
pub struct FlowRun {
    config: FlowRunConfig,
    database: Arc<Database>,
    server: Arc<HttpServer>,
    orchestrator: Orchestrator,
    logger: Logger,
}

impl FlowRun {
    /// Open the database and assemble the server from a validated config.
    ///
    /// Components are registered as `database` (stop only) then `server`.
    pub async fn new(config: FlowRunConfig, logger: Logger) -> Result<Self> {
        check(&config)?;

        let database = Arc::new(
            Database::open(&config.database, logger.component("database")).await?,
        );

        let server = Arc::new(
            HttpServer::builder()
                .addr(config.server.socket_addr())
                .middleware(LoggingMiddleware::new(logger.component("http")))
                .handler(HealthHandler::new(
                    Arc::clone(&database) as Arc<dyn Pinger>,
                    logger.component("health"),
                ))
                .logger(logger.component("server"))
                .build()?,
        );

        let components = vec![
            Component::new("database").with_stop({
                let database = Arc::clone(&database);
                move |ctx: Context| {
                    let database = Arc::clone(&database);
                    async move { database.close(&ctx).await }
                }
            }),
            Component::new("server")
                .with_start({
                    let server = Arc::clone(&server);
                    move |ctx: Context| {
                        let server = Arc::clone(&server);
                        async move { server.start(&ctx).await }
                    }
                })
                .with_stop({
                    let server = Arc::clone(&server);
                    move |ctx: Context| {
                        let server = Arc::clone(&server);
                        async move { server.stop(&ctx).await }
                    }
                }),
        ];

        Ok(Self {
            config,
            database,
            server,
            orchestrator: Orchestrator::new(logger.clone(), components),
            logger,
        })
    }

    /// Load configuration from the environment, then build as [`FlowRun::new`]
    pub async fn from_env(logger: Logger) -> Result<Self> {
        let config = FlowRunConfig::load(&logger.component("config"))?;
        Self::new(config, logger).await
    }

    pub fn config(&self) -> &FlowRunConfig {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub async fn start(&mut self, ctx: &Context) -> Result<()> {
        info!(parent: self.logger.span(), "Starting FlowRun server");
        self.orchestrator.start(ctx).await
    }

    pub async fn stop(&mut self, ctx: &Context) -> Result<()> {
        info!(parent: self.logger.span(), "Stopping FlowRun server");
        let result = self.orchestrator.stop(ctx).await;
        info!(parent: self.logger.span(), "Stopped FlowRun server");
        result
    }

    pub fn state(&self) -> LifecycleState {
        self.orchestrator.state()
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Address the HTTP server is bound to, once started
    pub fn server_addr(&self) -> Option<SocketAddr> {
        self.server.local_addr()
    }
}
