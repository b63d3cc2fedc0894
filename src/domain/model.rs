use crate::validation::{ValidationError, Validate, Violations};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A model exposed through one of an account's providers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub id: Uuid,
    pub name: String,
    pub account_id: Uuid,
    pub provider_id: Uuid,
}

impl Model {
    pub fn builder() -> ModelBuilder {
        ModelBuilder::new()
    }
}

impl Validate for Model {
    fn validate(&self, v: &mut Violations) {
        v.non_nil("id", &self.id);
        v.required("name", &self.name);
        v.non_nil("account_id", &self.account_id);
        v.non_nil("provider_id", &self.provider_id);
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    id: Option<Uuid>,
    name: Option<String>,
    account_id: Option<Uuid>,
    provider_id: Option<Uuid>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// Stored as given; surrounding whitespace is kept
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn account_id(mut self, account_id: Uuid) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn provider_id(mut self, provider_id: Uuid) -> Self {
        self.provider_id = Some(provider_id);
        self
    }

    pub fn build(self) -> Result<Model, ValidationError> {
        crate::validation::validated(Model {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            account_id: self.account_id.unwrap_or_default(),
            provider_id: self.provider_id.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> ModelBuilder {
        Model::builder()
            .id(Uuid::new_v4())
            .name("gpt-4o-mini")
            .account_id(Uuid::new_v4())
            .provider_id(Uuid::new_v4())
    }

    #[test]
    fn test_build_with_valid_names() {
        let long_name = "ModelName".repeat(10);
        let names = [
            "a",
            long_name.as_str(),
            "Model123",
            "Model-Name_v2.0",
            "  Model Name  ",
            "模型名称",
        ];

        for name in names {
            let model = complete().name(name).build().unwrap();
            assert_eq!(model.name, name);
            assert!(!model.id.is_nil());
            assert!(!model.account_id.is_nil());
            assert!(!model.provider_id.is_nil());
        }
    }

    #[test]
    fn test_build_with_invalid_input() {
        let cases: Vec<(&str, ModelBuilder, &str)> = vec![
            ("missing_id", ModelBuilder { id: None, ..complete() }, "id"),
            ("missing_name", ModelBuilder { name: None, ..complete() }, "name"),
            ("empty_name", complete().name(""), "name"),
            (
                "missing_account_id",
                ModelBuilder {
                    account_id: None,
                    ..complete()
                },
                "account_id",
            ),
            (
                "missing_provider_id",
                ModelBuilder {
                    provider_id: None,
                    ..complete()
                },
                "provider_id",
            ),
        ];

        for (case, builder, field) in cases {
            let err = builder.build().expect_err(case);
            assert!(err.has_field(field), "{}: expected violation on {}", case, field);
        }
    }

    #[test]
    fn test_all_fields_missing_reports_each() {
        let err = ModelBuilder::new().build().unwrap_err();
        assert_eq!(err.violations().len(), 4);
    }

    #[test]
    fn test_shared_ids_are_allowed() {
        let shared = Uuid::new_v4();
        let model = complete()
            .id(shared)
            .account_id(shared)
            .provider_id(shared)
            .build()
            .unwrap();

        assert_eq!(model.id, shared);
        assert_eq!(model.account_id, model.provider_id);
    }

    #[test]
    fn test_json_field_names() {
        let model = complete().build().unwrap();
        let json = serde_json::to_value(&model).unwrap();

        assert_eq!(json["name"], "gpt-4o-mini");
        assert_eq!(json["provider_id"], model.provider_id.to_string());
        assert_eq!(serde_json::from_value::<Model>(json).unwrap(), model);
    }
}
