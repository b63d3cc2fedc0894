//! Typed HTTP client for the FlowRun API.

use crate::error::{FlowRunError, Result};
use crate::health::HealthResponse;
use crate::validation::ValidationError;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct FlowRunClient {
    base_url: Url,
    http: reqwest::Client,
}

impl FlowRunClient {
    /// Create a client for the service at `base_url`, e.g. `http://127.0.0.1:8080`
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ValidationError::single("base_url", e.to_string()))?;
        let http = reqwest::Client::builder().timeout(DEFAULT_TIMEOUT).build()?;

        Ok(Self { base_url, http })
    }

    pub async fn get_health(&self) -> Result<HealthResponse> {
        self.get("/v1/health").await
    }

    /// GET `endpoint` and decode a JSON body; any status other than 200 is an error
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|e| ValidationError::single("endpoint", e.to_string()))?;

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(FlowRunError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        Ok(response.json::<T>().await?)
    }
}
