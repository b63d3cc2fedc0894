use crate::context::Context;
use crate::error::Result;
use futures::future::{BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;

/// A start or stop function bound to a component
pub type LifecycleFn = Box<dyn Fn(Context) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Named unit with optional start and stop functions.
///
/// A missing function is treated as an immediate success.
pub struct Component {
    name: String,
    start: Option<LifecycleFn>,
    stop: Option<LifecycleFn>,
}

impl Component {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            start: None,
            stop: None,
        }
    }

    pub fn with_start<F, Fut>(mut self, start: F) -> Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.start = Some(Box::new(move |ctx| start(ctx).boxed()));
        self
    }

    pub fn with_stop<F, Fut>(mut self, stop: F) -> Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.stop = Some(Box::new(move |ctx| stop(ctx).boxed()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_start(&self) -> bool {
        self.start.is_some()
    }

    pub fn has_stop(&self) -> bool {
        self.stop.is_some()
    }

    pub(super) fn start_fn(&self) -> Option<&LifecycleFn> {
        self.start.as_ref()
    }

    pub(super) fn stop_fn(&self) -> Option<&LifecycleFn> {
        self.stop.as_ref()
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("start", &self.has_start())
            .field("stop", &self.has_stop())
            .finish()
    }
}
