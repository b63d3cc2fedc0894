mod handlers;
mod http;
mod middleware;

pub use handlers::{Handler, HealthHandler, DEFAULT_PING_TIMEOUT, HEALTH_PATH};
pub use http::{HttpServer, HttpServerBuilder};
pub use middleware::{LoggingMiddleware, Middleware};
