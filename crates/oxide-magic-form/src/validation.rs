//! Form field validators.

use crate::error::{ValidationErrors, REQUIRED_MESSAGE};
use crate::schema::{FieldSpec, FormSchema};
use crate::value::{FieldValue, FormData};

/// Trait for field validators.
pub trait Validator: Send + Sync {
    /// Validates a value and returns an error message if invalid.
    fn validate(&self, field: &FieldSpec, value: &FieldValue) -> Result<(), String>;

    /// Returns the error message for this validator.
    fn message(&self) -> &str;
}

/// Validator that rejects empty values on required fields.
#[derive(Debug, Clone)]
pub struct RequiredValidator {
    message: String,
}

impl RequiredValidator {
    /// Creates a new RequiredValidator with default message.
    pub fn new() -> Self {
        Self {
            message: REQUIRED_MESSAGE.to_string(),
        }
    }

    /// Creates a new RequiredValidator with custom message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for RequiredValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for RequiredValidator {
    fn validate(&self, field: &FieldSpec, value: &FieldValue) -> Result<(), String> {
        if field.required && value.is_empty() {
            Err(self.message.clone())
        } else {
            Ok(())
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Runs `validators` over every field of `schema`.
///
/// Builds a fresh error set; the first failing validator wins for a field.
/// A field missing from `values` is checked against its default.
pub fn validate_form(
    schema: &FormSchema,
    values: &FormData,
    validators: &[Box<dyn Validator>],
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for field in schema.fields() {
        let default;
        let value = match values.get(&field.name) {
            Some(value) => value,
            None => {
                default = FieldValue::default_for(&field.kind);
                &default
            }
        };
        if let Some(message) = validators
            .iter()
            .find_map(|v| v.validate(field, value).err())
        {
            errors.add(&field.name, message);
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required() -> Vec<Box<dyn Validator>> {
        vec![Box::new(RequiredValidator::new())]
    }

    #[test]
    fn test_required_validator() {
        let v = RequiredValidator::new();
        let field = FieldSpec::text("name", "Name").required();
        assert!(v.validate(&field, &"hello".into()).is_ok());
        assert!(v.validate(&field, &"".into()).is_err());
        assert!(v.validate(&field, &" ".into()).is_ok());

        let optional = FieldSpec::text("name", "Name");
        assert!(v.validate(&optional, &"".into()).is_ok());
    }

    #[test]
    fn test_required_checkbox_must_be_checked() {
        let v = RequiredValidator::with_message("Please accept");
        let field = FieldSpec::checkbox("terms", "Terms").required();
        assert_eq!(v.validate(&field, &false.into()), Err("Please accept".to_string()));
        assert!(v.validate(&field, &true.into()).is_ok());
    }

    #[test]
    fn test_validate_form_collects_required() {
        let schema = FormSchema::single(vec![
            FieldSpec::text("username", "Username").required(),
            FieldSpec::text("nickname", "Nickname"),
            FieldSpec::image("avatar", "Avatar").required(),
        ])
        .unwrap();
        let values = FormData::new().with("username", "alice");

        let errors = validate_form(&schema, &values, &required());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("avatar"), Some(REQUIRED_MESSAGE));
    }

    #[test]
    fn test_validate_form_is_idempotent() {
        let schema = FormSchema::single(vec![
            FieldSpec::text("a", "A").required(),
            FieldSpec::text("b", "B").required(),
        ])
        .unwrap();
        let values = FormData::new().with("a", "").with("b", "x");

        let first = validate_form(&schema, &values, &required());
        let second = validate_form(&schema, &values, &required());
        assert_eq!(first, second);
    }
}
