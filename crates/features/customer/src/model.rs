//! Customer representations: inbound payload, validated entity, wire DTO and stored record.

use crate::error::CustomerError;
use chub_derive::api_model;
use surrealdb::types::SurrealValue;
use validator::Validate;

/// Customer as submitted by a client. Every field may be missing until validated.
#[api_model(deny_unknown_fields = false)]
#[derive(Clone, Default, PartialEq, Eq, Validate)]
pub struct CustomerPayload {
    /// Client supplied identifier
    #[validate(required(message = "must not be null"))]
    pub customer_id: Option<i32>,
    #[validate(
        required(message = "Customer name cannot be empty"),
        length(min = 1, message = "Customer name cannot be empty")
    )]
    pub customer_name: Option<String>,
    #[validate(
        required(message = "must not be null"),
        email(message = "check the email id format")
    )]
    pub email: Option<String>,
}

/// A validated customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// Customer as returned by the read endpoints.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct CustomerDto {
    pub customer_id: i32,
    pub customer_name: String,
    pub email: String,
}

/// Row of the `customer` table.
#[derive(Debug, Clone, PartialEq, Eq, SurrealValue)]
pub struct CustomerRecord {
    pub customer_id: i64,
    pub customer_name: String,
    pub email_address: String,
}

impl From<&Customer> for CustomerRecord {
    fn from(customer: &Customer) -> Self {
        Self {
            customer_id: i64::from(customer.id),
            customer_name: customer.name.clone(),
            email_address: customer.email.clone(),
        }
    }
}

impl TryFrom<CustomerRecord> for Customer {
    type Error = CustomerError;

    fn try_from(record: CustomerRecord) -> Result<Self, Self::Error> {
        let id = i32::try_from(record.customer_id).map_err(|_| CustomerError::Internal {
            message: format!("Stored customer id {} is out of range", record.customer_id).into(),
            context: None,
        })?;
        Ok(Self { id, name: record.customer_name, email: record.email_address })
    }
}

impl From<Customer> for CustomerDto {
    fn from(customer: Customer) -> Self {
        Self { customer_id: customer.id, customer_name: customer.name, email: customer.email }
    }
}
