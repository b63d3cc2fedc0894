mod component;
mod flowrun;
mod orchestrator;
mod runtime;
mod shutdown;
mod startup;
mod state;
mod types;


pub use component::{Component, LifecycleFn};
pub use flowrun::FlowRun;
pub use orchestrator::Orchestrator;
pub use runtime::wait_for_shutdown;
pub use types::{ComponentState, LifecycleState, ShutdownReason, StopOrder};
