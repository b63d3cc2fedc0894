use super::handlers::Handler;
use super::middleware::Middleware;
use crate::context::Context;
use crate::error::{FlowRunError, Result};
use crate::logging::Logger;
use axum::Router;
use std::net::SocketAddr;
use std::sync::OnceLock;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn, Instrument};

/// HTTP server whose serve loop runs in a background task between `start` and `stop`
pub struct HttpServer {
    addr: SocketAddr,
    router: Router,
    logger: Logger,
    shutdown: CancellationToken,
    local_addr: OnceLock<SocketAddr>,
    task: Mutex<Option<JoinHandle<std::io::Result<()>>>>,
}

impl HttpServer {
    pub fn builder() -> HttpServerBuilder {
        HttpServerBuilder::new()
    }

    /// Bind the listener and spawn the serve loop.
    ///
    /// Returns once the socket is bound; bind failures are returned directly.
    pub async fn start(&self, ctx: &Context) -> Result<()> {
        let mut task = self.task.lock().await;
        if task.is_some() || self.shutdown.is_cancelled() {
            return Err(FlowRunError::component("server", "already started or stopped"));
        }

        info!(parent: self.logger.span(), "Starting HTTP server on {}", self.addr);

        let listener = ctx
            .run("server bind", async {
                TcpListener::bind(self.addr)
                    .await
                    .map_err(FlowRunError::from)
            })
            .await
            .map_err(|e| {
                error!(parent: self.logger.span(), "Failed to bind {}: {}", self.addr, e);
                e
            })?;

        let local_addr = listener.local_addr()?;
        let _ = self.local_addr.set(local_addr);

        let router = self.router.clone();
        let shutdown = self.shutdown.clone();
        let logger = self.logger.clone();
        let serve = async move {
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(async move { shutdown.cancelled().await })
                .await;
            if let Err(e) = &result {
                error!(parent: logger.span(), "HTTP server error: {}", e);
            }
            result
        };
        *task = Some(tokio::spawn(serve.instrument(self.logger.span().clone())));

        info!(parent: self.logger.span(), "HTTP server listening on {}", local_addr);
        Ok(())
    }

    /// Stop accepting connections and wait for in-flight requests, bounded by `ctx`.
    ///
    /// The serve task is aborted if `ctx` ends first. A server that was never
    /// started stops successfully.
    pub async fn stop(&self, ctx: &Context) -> Result<()> {
        let Some(mut task) = self.task.lock().await.take() else {
            debug!(parent: self.logger.span(), "HTTP server was not running");
            self.shutdown.cancel();
            return Ok(());
        };

        info!(parent: self.logger.span(), "Stopping HTTP server");
        self.shutdown.cancel();

        let result = ctx
            .run("server shutdown", async {
                match (&mut task).await {
                    Ok(served) => served.map_err(FlowRunError::from),
                    Err(e) => Err(FlowRunError::system(format!("HTTP server task failed: {}", e))),
                }
            })
            .await;

        match result {
            Ok(()) => {
                info!(parent: self.logger.span(), "HTTP server stopped");
                Ok(())
            }
            Err(e) => {
                if e.is_deadline() {
                    warn!(parent: self.logger.span(), "Graceful shutdown did not finish, aborting");
                    task.abort();
                }
                Err(e)
            }
        }
    }

    /// Address actually bound, once started
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr.get().copied()
    }

    /// The assembled router, for driving requests without a socket
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Builder for [`HttpServer`]
pub struct HttpServerBuilder {
    addr: Option<SocketAddr>,
    middleware: Vec<Box<dyn Middleware>>,
    handlers: Vec<Box<dyn Handler>>,
    logger: Option<Logger>,
}

impl HttpServerBuilder {
    pub fn new() -> Self {
        Self {
            addr: None,
            middleware: Vec::new(),
            handlers: Vec::new(),
            logger: None,
        }
    }

    /// Set the listen address
    pub fn addr(mut self, addr: SocketAddr) -> Self {
        self.addr = Some(addr);
        self
    }

    /// Add a middleware; each one wraps every route
    pub fn middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middleware.push(Box::new(middleware));
        self
    }

    /// Add a handler contributing routes
    pub fn handler<H: Handler + 'static>(mut self, handler: H) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Build the server
    pub fn build(self) -> Result<HttpServer> {
        let addr = self
            .addr
            .ok_or_else(|| FlowRunError::component("server", "listen address is required"))?;

        let router = self
            .handlers
            .iter()
            .fold(Router::new(), |router, handler| router.merge(handler.routes()));

        // Layers only wrap routes that already exist
        let router = self
            .middleware
            .iter()
            .fold(router, |router, middleware| middleware.apply(router));

        Ok(HttpServer {
            addr,
            router,
            logger: self.logger.unwrap_or_default(),
            shutdown: CancellationToken::new(),
            local_addr: OnceLock::new(),
            task: Mutex::new(None),
        })
    }
}

impl Default for HttpServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
