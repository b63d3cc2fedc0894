use crate::validation::{ValidationError, Validate, Violations};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Upstream LLM gateway a provider record points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderType {
    #[serde(rename = "open_router")]
    OpenRouter,
}

impl ProviderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::OpenRouter => "open_router",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open_router" => Ok(ProviderType::OpenRouter),
            other => Err(ValidationError::single(
                "type",
                format!("must be one of [open_router] (got {})", other),
            )),
        }
    }
}

/// Credentials for one upstream provider, owned by an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub id: Uuid,
    pub name: String,
    pub account_id: Uuid,
    #[serde(rename = "type")]
    pub provider_type: ProviderType,
    pub api_key: String,
}

impl Provider {
    pub fn builder() -> ProviderBuilder {
        ProviderBuilder::new()
    }
}

impl Validate for Provider {
    fn validate(&self, v: &mut Violations) {
        v.non_nil("id", &self.id);
        if v.required("name", &self.name) {
            v.alphanumeric("name", &self.name);
            v.length("name", &self.name, 1, 50);
        }
        v.non_nil("account_id", &self.account_id);
        v.required("api_key", &self.api_key);
    }
}

/// Collects provider fields and validates them once in [`ProviderBuilder::build`]
#[derive(Debug, Clone, Default)]
pub struct ProviderBuilder {
    id: Option<Uuid>,
    name: Option<String>,
    account_id: Option<Uuid>,
    provider_type: Option<ProviderType>,
    api_key: Option<String>,
}

impl ProviderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn account_id(mut self, account_id: Uuid) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn provider_type(mut self, provider_type: ProviderType) -> Self {
        self.provider_type = Some(provider_type);
        self
    }

    pub fn api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn build(self) -> Result<Provider, ValidationError> {
        let mut violations = Violations::new();
        if self.provider_type.is_none() {
            violations.push("type", "is required");
        }

        let provider = Provider {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            account_id: self.account_id.unwrap_or_default(),
            provider_type: self.provider_type.unwrap_or(ProviderType::OpenRouter),
            api_key: self.api_key.unwrap_or_default(),
        };

        provider.validate(&mut violations);
        violations.into_result()?;
        Ok(provider)
    }
}
