use std::fmt::Debug;
use thiserror::Error;
use uuid::Uuid;

/// A single failed constraint on a named field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field} {message}")]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// Every constraint that failed during one validation pass
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", summarize(.violations))]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Build an error carrying a single violation
    pub fn single<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self {
            violations: vec![FieldViolation {
                field: field.into(),
                message: message.into(),
            }],
        }
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Whether any violation was recorded against `field`
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Types that can check their own constraints
pub trait Validate {
    fn validate(&self, violations: &mut Violations);
}

/// Run every constraint of `value`, handing it back only if all of them hold.
pub fn validated<T: Validate>(value: T) -> Result<T, ValidationError> {
    check(&value)?;
    Ok(value)
}

/// Run every constraint of `value` without taking ownership
pub fn check<T: Validate + ?Sized>(value: &T) -> Result<(), ValidationError> {
    let mut violations = Violations::new();
    value.validate(&mut violations);
    violations.into_result()
}

/// Collector for constraint failures.
///
/// Checks never short-circuit, so a single pass reports every broken field.
#[derive(Debug, Default)]
pub struct Violations {
    prefix: Option<String>,
    items: Vec<FieldViolation>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    fn field_name(&self, field: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}.{}", prefix, field),
            None => field.to_string(),
        }
    }

    /// Record a failure against `field`
    pub fn push<M: Into<String>>(&mut self, field: &str, message: M) {
        let field = self.field_name(field);
        self.items.push(FieldViolation {
            field,
            message: message.into(),
        });
    }

    /// Non-empty string. Returns whether the value was present.
    pub fn required(&mut self, field: &str, value: &str) -> bool {
        if value.is_empty() {
            self.push(field, "is required");
            return false;
        }
        true
    }

    pub fn non_nil(&mut self, field: &str, value: &Uuid) {
        if value.is_nil() {
            self.push(field, "is required");
        }
    }

    /// Character count within `min..=max`
    pub fn length(&mut self, field: &str, value: &str, min: usize, max: usize) {
        let len = value.chars().count();
        if len < min || len > max {
            self.push(
                field,
                format!("must be between {} and {} characters (got {})", min, max, len),
            );
        }
    }

    /// ASCII letters and digits only
    pub fn alphanumeric(&mut self, field: &str, value: &str) {
        if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
            self.push(field, "must contain only letters and digits");
        }
    }

    pub fn range<T: PartialOrd + Debug>(&mut self, field: &str, value: &T, min: &T, max: &T) {
        if value < min || value > max {
            self.push(
                field,
                format!("must be between {:?} and {:?} (got {:?})", min, max, value),
            );
        }
    }

    /// Absolute URL with a scheme
    pub fn url(&mut self, field: &str, value: &str) {
        if let Err(e) = url::Url::parse(value) {
            self.push(field, format!("must be a valid URL ({})", e));
        }
    }

    /// Validate a nested value, prefixing its field names with `prefix`
    pub fn nested<T: Validate + ?Sized>(&mut self, prefix: &str, value: &T) {
        let mut inner = Violations {
            prefix: Some(self.field_name(prefix)),
            items: Vec::new(),
        };
        value.validate(&mut inner);
        self.items.extend(inner.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.items.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                violations: self.items,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Account {
        name: String,
        owner: Uuid,
        seats: u32,
    }

    impl Validate for Account {
        fn validate(&self, v: &mut Violations) {
            if v.required("name", &self.name) {
                v.alphanumeric("name", &self.name);
            }
            v.non_nil("owner", &self.owner);
            v.range("seats", &self.seats, &1, &10);
        }
    }

    struct Tenant {
        account: Account,
        endpoint: String,
    }

    impl Validate for Tenant {
        fn validate(&self, v: &mut Violations) {
            v.nested("account", &self.account);
            v.url("endpoint", &self.endpoint);
        }
    }

    fn valid_account() -> Account {
        Account {
            name: "acme42".to_string(),
            owner: Uuid::new_v4(),
            seats: 3,
        }
    }

    #[test]
    fn test_validated_returns_value_when_all_constraints_hold() {
        let account = validated(valid_account()).unwrap();
        assert_eq!(account.name, "acme42");
        assert_eq!(account.seats, 3);
    }

    #[test]
    fn test_validation_reports_every_violation() {
        let account = Account {
            name: String::new(),
            owner: Uuid::nil(),
            seats: 0,
        };

        let err = validated(account).err().unwrap();
        assert_eq!(err.violations().len(), 3);
        assert!(err.has_field("name"));
        assert!(err.has_field("owner"));
        assert!(err.has_field("seats"));
    }

    #[test]
    fn test_required_skips_dependent_checks() {
        let account = Account {
            name: String::new(),
            ..valid_account()
        };

        let err = validated(account).err().unwrap();
        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.violations()[0].message, "is required");
    }

    #[test]
    fn test_nested_fields_are_prefixed() {
        let tenant = Tenant {
            account: Account {
                name: "has space".to_string(),
                ..valid_account()
            },
            endpoint: "not a url".to_string(),
        };

        let err = validated(tenant).err().unwrap();
        assert!(err.has_field("account.name"));
        assert!(err.has_field("endpoint"));
        assert!(err.to_string().contains("account.name must contain only letters and digits"));
    }

    #[test]
    fn test_length_counts_characters() {
        let mut v = Violations::new();
        v.length("name", "模型", 1, 2);
        assert!(v.is_empty());

        v.length("name", "abc", 1, 2);
        assert!(!v.is_empty());
    }

    #[test]
    fn test_single_violation_display() {
        let err = ValidationError::single("server.port", "must be numeric");
        assert_eq!(err.to_string(), "server.port must be numeric");
    }
}
