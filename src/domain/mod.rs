//! Configuration records served by FlowRun.

mod model;
mod provider;

pub use model::{Model, ModelBuilder};
pub use provider::{Provider, ProviderBuilder, ProviderType};
