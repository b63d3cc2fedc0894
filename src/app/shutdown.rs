use super::{ComponentState, LifecycleState, Orchestrator, StopOrder};
use crate::context::Context;
use crate::error::{ComponentStopError, FlowRunError, Result, StopFailures};
use tracing::{debug, info, warn};

impl Orchestrator {
    /// Stop every component in stop order.
    ///
    /// Each stop function runs exactly once whether or not its start ran or
    /// succeeded, and a failure never skips the rest. Failures come back
    /// together as [`StopFailures`].
    pub async fn stop(&mut self, ctx: &Context) -> Result<()> {
        if self.state == LifecycleState::Stopped {
            return Err(FlowRunError::InvalidState {
                state: self.state,
                operation: "stop",
            });
        }

        info!(parent: self.logger.span(), "Stopping {} component(s)", self.components.len());

        let order: Vec<usize> = match self.stop_order {
            StopOrder::Forward => (0..self.components.len()).collect(),
            StopOrder::Reverse => (0..self.components.len()).rev().collect(),
        };

        let mut failures = Vec::new();
        for index in order {
            let component = &self.components[index];
            let name = component.name().to_string();

            let Some(stop) = component.stop_fn() else {
                debug!(parent: self.logger.span(), "Component '{}' has nothing to stop", name);
                self.set_component_state(index, ComponentState::Stopped);
                continue;
            };

            // Polled before the deadline is checked, so an expired context
            // still gives every stop function its turn
            let future = stop(ctx.clone());
            self.set_component_state(index, ComponentState::Stopping);

            match ctx.run(&format!("stopping {}", name), future).await {
                Ok(()) => {
                    self.set_component_state(index, ComponentState::Stopped);
                    info!(parent: self.logger.span(), "Component '{}' stopped", name);
                }
                Err(e) => {
                    warn!(parent: self.logger.span(), "Failed to stop component {}: {}", name, e);
                    self.set_component_state(index, ComponentState::Failed);
                    failures.push(ComponentStopError {
                        component: name,
                        source: e,
                    });
                }
            }
        }

        self.state = LifecycleState::Stopped;

        if failures.is_empty() {
            info!(parent: self.logger.span(), "All components stopped");
            Ok(())
        } else {
            Err(StopFailures::new(failures).into())
        }
    }
}
