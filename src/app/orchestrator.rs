use super::component::Component;
use super::types::{ComponentState, LifecycleState, StopOrder};
use crate::logging::Logger;

/// Drives an ordered list of components through start and stop.
///
/// Starts run in registration order and stop at the first failure. Stops run
/// in [`StopOrder`] and every stop function is attempted.
pub struct Orchestrator {
    pub(super) components: Vec<Component>,
    pub(super) stop_order: StopOrder,
    pub(super) state: LifecycleState,
    pub(super) component_states: Vec<ComponentState>,
    pub(super) logger: Logger,
}

impl Orchestrator {
    pub fn new(logger: Logger, components: Vec<Component>) -> Self {
        let component_states = vec![ComponentState::Stopped; components.len()];

        Self {
            components,
            stop_order: StopOrder::default(),
            state: LifecycleState::Unstarted,
            component_states,
            logger,
        }
    }

    pub fn with_stop_order(mut self, stop_order: StopOrder) -> Self {
        self.stop_order = stop_order;
        self
    }

    pub fn stop_order(&self) -> StopOrder {
        self.stop_order
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }
}
