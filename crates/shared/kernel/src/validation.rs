//! Wire representation of `validator` failures.

use chub_derive::api_model;
use validator::ValidationErrors;

/// A single rejected input field.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Wire name of the field
    pub field: String,
    /// Human readable reason
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

/// Flattens field-level errors into violations keyed by camelCase field name.
///
/// Violations are sorted by field; a field's own errors keep their declaration order.
/// Errors without a message fall back to the validator code.
#[must_use]
pub fn field_violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            let field = camel_case(field.as_ref());
            field_errors.iter().map(move |error| {
                let message = error.message.as_deref().unwrap_or(error.code.as_ref());
                FieldViolation::new(field.clone(), message)
            })
        })
        .collect();

    violations.sort_by(|a, b| a.field.cmp(&b.field));
    violations
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    fn error(code: &'static str, message: Option<&'static str>) -> ValidationError {
        let error = ValidationError::new(code);
        match message {
            Some(message) => error.with_message(message.into()),
            None => error,
        }
    }

    #[test]
    fn field_names_become_camel_case() {
        assert_eq!(camel_case("customer_name"), "customerName");
        assert_eq!(camel_case("email"), "email");
        assert_eq!(camel_case("_private_key"), "privateKey");
    }

    #[test]
    fn violations_are_sorted_by_field() {
        let mut errors = ValidationErrors::new();
        errors.add("email", error("required", Some("must not be null")));
        errors.add("customer_name", error("length", Some("Customer name cannot be empty")));
        errors.add("customer_id", error("required", None));

        assert_eq!(
            field_violations(&errors),
            vec![
                FieldViolation::new("customerId", "required"),
                FieldViolation::new("customerName", "Customer name cannot be empty"),
                FieldViolation::new("email", "must not be null"),
            ]
        );
    }

    #[test]
    fn no_errors_no_violations() {
        assert!(field_violations(&ValidationErrors::new()).is_empty());
    }
}
