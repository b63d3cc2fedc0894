use crate::logging::Logger;
use axum::{
    extract::{Request, State},
    middleware::{from_fn_with_state, Next},
    response::Response,
    Router,
};
use tracing::info;

/// Wraps every route registered on the server
pub trait Middleware: Send + Sync {
    fn apply(&self, router: Router) -> Router;
}

/// Logs each request line and the status of its response
#[derive(Clone)]
pub struct LoggingMiddleware {
    logger: Logger,
}

impl LoggingMiddleware {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

impl Middleware for LoggingMiddleware {
    fn apply(&self, router: Router) -> Router {
        router.layer(from_fn_with_state(self.logger.clone(), log_request))
    }
}

async fn log_request(State(logger): State<Logger>, request: Request, next: Next) -> Response {
    info!(parent: logger.span(), "Request: {} {}", request.method(), request.uri());
    let response = next.run(request).await;
    info!(parent: logger.span(), "Response: {}", response.status().as_u16());
    response
}
