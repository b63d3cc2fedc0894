pub mod app;
pub mod client;
pub mod config;
pub mod context;
pub mod database;
pub mod domain;
pub mod error;
pub mod health;
pub mod logging;
pub mod server;
pub mod validation;

pub use app::{
    wait_for_shutdown, Component, ComponentState, FlowRun, LifecycleState, Orchestrator,
    ShutdownReason, StopOrder,
};
pub use client::FlowRunClient;
pub use config::{DatabaseConfig, FlowRunConfig, ServerConfig};
pub use context::Context;
pub use database::Database;
pub use domain::{Model, ModelBuilder, Provider, ProviderBuilder, ProviderType};
pub use error::{ComponentStopError, FlowRunError, Result, StopFailures};
pub use health::{HealthResponse, HealthStatus, Pinger};
pub use logging::{LogFormat, Logger, Logging, LoggingConfig};
pub use server::{Handler, HealthHandler, HttpServer, HttpServerBuilder, LoggingMiddleware, Middleware};
pub use validation::{Validate, ValidationError};
