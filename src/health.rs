use crate::context::Context;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Reachability reported by the health endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
}

impl HealthResponse {
    pub fn new(status: HealthStatus) -> Self {
        Self { status }
    }
}

/// Something whose reachability can be probed in one round trip
#[async_trait]
pub trait Pinger: Send + Sync {
    async fn ping(&self, ctx: &Context) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_wire_format() {
        let up = serde_json::to_string(&HealthResponse::new(HealthStatus::Up)).unwrap();
        assert_eq!(up, r#"{"status":"up"}"#);

        let down: HealthResponse = serde_json::from_str(r#"{"status":"down"}"#).unwrap();
        assert_eq!(down.status, HealthStatus::Down);
    }
}
