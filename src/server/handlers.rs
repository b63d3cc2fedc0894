use crate::context::Context;
use crate::health::{HealthResponse, HealthStatus, Pinger};
use crate::logging::Logger;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

pub const HEALTH_PATH: &str = "/v1/health";

/// Bound on a single database ping made by the health endpoint
pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(2);

/// Contributes routes to the HTTP server
pub trait Handler: Send + Sync {
    fn routes(&self) -> Router;
}

#[derive(Clone)]
struct HealthState {
    pinger: Arc<dyn Pinger>,
    ping_timeout: Duration,
    logger: Logger,
}

/// `GET /v1/health`, reporting whether the backing store answers a ping
pub struct HealthHandler {
    state: HealthState,
}

impl HealthHandler {
    pub fn new(pinger: Arc<dyn Pinger>, logger: Logger) -> Self {
        Self {
            state: HealthState {
                pinger,
                ping_timeout: DEFAULT_PING_TIMEOUT,
                logger,
            },
        }
    }

    pub fn with_ping_timeout(mut self, ping_timeout: Duration) -> Self {
        self.state.ping_timeout = ping_timeout;
        self
    }
}

impl Handler for HealthHandler {
    fn routes(&self) -> Router {
        Router::new()
            .route(HEALTH_PATH, get(health_handler))
            .with_state(self.state.clone())
    }
}

async fn health_handler(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let ctx = Context::with_timeout(state.ping_timeout);

    match state.pinger.ping(&ctx).await {
        Ok(()) => {
            debug!(parent: state.logger.span(), "Database ping succeeded");
            (StatusCode::OK, Json(HealthResponse::new(HealthStatus::Up)))
        }
        Err(e) => {
            error!(parent: state.logger.span(), "Database ping failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse::new(HealthStatus::Down)),
            )
        }
    }
}
