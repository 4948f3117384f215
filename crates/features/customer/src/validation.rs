use crate::error::CustomerError;
use crate::model::{Customer, CustomerPayload};
use chub_kernel::validation::field_violations;
use validator::ValidationErrors;

impl From<ValidationErrors> for CustomerError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation { violations: field_violations(&errors), context: None }
    }
}

/// Converts a payload that passed [`validator::Validate`] into a [`Customer`].
impl TryFrom<CustomerPayload> for Customer {
    type Error = CustomerError;

    fn try_from(payload: CustomerPayload) -> Result<Self, Self::Error> {
        match (payload.customer_id, payload.customer_name, payload.email) {
            (Some(id), Some(name), Some(email)) => Ok(Self { id, name, email }),
            _ => Err(CustomerError::from("Customer payload was not validated")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chub_kernel::validation::FieldViolation;
    use validator::Validate;

    const REQUIRED: &str = "must not be null";
    const EMPTY_NAME: &str = "Customer name cannot be empty";
    const BAD_EMAIL: &str = "check the email id format";

    fn payload(id: Option<i32>, name: Option<&str>, email: Option<&str>) -> CustomerPayload {
        CustomerPayload {
            customer_id: id,
            customer_name: name.map(str::to_owned),
            email: email.map(str::to_owned),
        }
    }

    fn violations(payload: &CustomerPayload) -> Vec<FieldViolation> {
        match payload.validate().map_err(CustomerError::from) {
            Err(CustomerError::Validation { violations, .. }) => violations,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_payload_becomes_customer() {
        let payload = payload(Some(1), Some("Alice"), Some("alice@example.com"));
        assert!(payload.validate().is_ok());
        assert_eq!(
            Customer::try_from(payload).unwrap(),
            Customer { id: 1, name: "Alice".to_owned(), email: "alice@example.com".to_owned() }
        );
    }

    #[test]
    fn empty_name_is_rejected() {
        assert_eq!(
            violations(&payload(Some(1), Some(""), Some("alice@example.com"))),
            vec![FieldViolation::new("customerName", EMPTY_NAME)]
        );
    }

    #[test]
    fn malformed_email_is_rejected() {
        assert_eq!(
            violations(&payload(Some(1), Some("Alice"), Some("not-an-email"))),
            vec![FieldViolation::new("email", BAD_EMAIL)]
        );
        assert_eq!(
            violations(&payload(Some(1), Some("Alice"), Some(""))),
            vec![FieldViolation::new("email", BAD_EMAIL)]
        );
    }

    #[test]
    fn all_missing_fields_are_reported_in_order() {
        assert_eq!(
            violations(&CustomerPayload::default()),
            vec![
                FieldViolation::new("customerId", REQUIRED),
                FieldViolation::new("customerName", EMPTY_NAME),
                FieldViolation::new("email", REQUIRED),
            ]
        );
    }

    #[test]
    fn unvalidated_payload_does_not_convert() {
        let err = Customer::try_from(CustomerPayload::default()).unwrap_err();
        assert!(matches!(err, CustomerError::Internal { .. }));
    }
}
