use crate::app::LifecycleState;
use crate::validation::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowRunError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Unexpected status code: {status}")]
    UnexpectedStatus { status: u16 },

    #[error("Deadline exceeded during {operation}")]
    Timeout { operation: String },

    #[error("Cancelled during {operation}")]
    Cancelled { operation: String },

    #[error("Failed to start component {component}: {source}")]
    ComponentStart {
        component: String,
        #[source]
        source: Box<FlowRunError>,
    },

    #[error(transparent)]
    ComponentStop(#[from] StopFailures),

    #[error("Cannot {operation} while {state:?}")]
    InvalidState {
        state: LifecycleState,
        operation: &'static str,
    },

    #[error("System error: {message}")]
    System { message: String },

    #[error("Component error in {component}: {message}")]
    Component { component: String, message: String },
}

impl FlowRunError {
    pub fn system<S: Into<String>>(message: S) -> Self {
        Self::System {
            message: message.into(),
        }
    }

    pub fn component<C: Into<String>, M: Into<String>>(component: C, message: M) -> Self {
        Self::Component {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Whether this error came from an expired or cancelled context
    pub fn is_deadline(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Cancelled { .. } => true,
            Self::ComponentStart { source, .. } => source.is_deadline(),
            _ => false,
        }
    }
}

/// A component whose stop function failed during shutdown
#[derive(Error, Debug)]
#[error("{component}: {source}")]
pub struct ComponentStopError {
    pub component: String,
    #[source]
    pub source: FlowRunError,
}

/// Every stop failure from one shutdown pass
#[derive(Error, Debug)]
#[error("{} component(s) failed to stop: {}", .failures.len(), summarize(.failures))]
pub struct StopFailures {
    failures: Vec<ComponentStopError>,
}

impl StopFailures {
    pub fn new(failures: Vec<ComponentStopError>) -> Self {
        Self { failures }
    }

    pub fn failures(&self) -> &[ComponentStopError] {
        &self.failures
    }

    /// Names of the components that failed, in the order they were stopped
    pub fn components(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.component.as_str()).collect()
    }
}

fn summarize(failures: &[ComponentStopError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, FlowRunError>;
