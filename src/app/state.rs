use super::{ComponentState, LifecycleState, Orchestrator};
use tracing::debug;

impl Orchestrator {
    pub(super) fn set_component_state(&mut self, index: usize, state: ComponentState) {
        self.component_states[index] = state;
        debug!(
            parent: self.logger.span(),
            "Component '{}' state changed to: {:?}",
            self.components[index].name(),
            state
        );
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Get component state
    pub fn component_state(&self, component: &str) -> Option<ComponentState> {
        self.components
            .iter()
            .position(|c| c.name() == component)
            .map(|index| self.component_states[index])
    }

    /// Get all component states in registration order
    pub fn component_states(&self) -> Vec<(&str, ComponentState)> {
        self.components
            .iter()
            .map(|c| c.name())
            .zip(self.component_states.iter().copied())
            .collect()
    }
}
