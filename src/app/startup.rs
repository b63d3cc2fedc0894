use super::{ComponentState, LifecycleState, Orchestrator};
use crate::context::Context;
use crate::error::{FlowRunError, Result};
use tracing::{debug, error, info};

impl Orchestrator {
    /// Start every component in registration order.
    ///
    /// The first failure marks that component failed and is returned; later
    /// components are never started. Nothing already started is stopped here.
    pub async fn start(&mut self, ctx: &Context) -> Result<()> {
        if self.state != LifecycleState::Unstarted {
            return Err(FlowRunError::InvalidState {
                state: self.state,
                operation: "start",
            });
        }

        info!(parent: self.logger.span(), "Starting {} component(s)", self.components.len());

        for index in 0..self.components.len() {
            let name = self.components[index].name().to_string();
            let operation = format!("starting {}", name);

            let Some(start) = self.components[index].start_fn() else {
                debug!(parent: self.logger.span(), "Component '{}' has nothing to start", name);
                self.set_component_state(index, ComponentState::Running);
                continue;
            };

            // A context that is already done fails the component without invoking it
            let future = match ctx.err(&operation) {
                None => start(ctx.clone()),
                Some(e) => return Err(self.fail_start(index, name, e)),
            };
            self.set_component_state(index, ComponentState::Starting);

            match ctx.run(&operation, future).await {
                Ok(()) => {
                    self.set_component_state(index, ComponentState::Running);
                    info!(parent: self.logger.span(), "Component '{}' started", name);
                }
                Err(e) => return Err(self.fail_start(index, name, e)),
            }
        }

        self.state = LifecycleState::Running;
        info!(parent: self.logger.span(), "All components started");
        Ok(())
    }

    fn fail_start(&mut self, index: usize, component: String, source: FlowRunError) -> FlowRunError {
        error!(
            parent: self.logger.span(),
            "Failed to start component {}: {}", component, source
        );
        self.set_component_state(index, ComponentState::Failed);
        self.state = LifecycleState::Failed;

        FlowRunError::ComponentStart {
            component,
            source: Box::new(source),
        }
    }
}
