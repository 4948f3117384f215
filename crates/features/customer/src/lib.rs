//! Customer feature slice.
//!
//! Owns the `customer` table schema, payload validation, the [`CustomerService`]
//! use cases and, behind the `server` feature, the `/customers` REST endpoints.

mod error;
mod model;
mod repository;
mod service;
mod validation;

#[cfg(feature = "server")]
pub mod server;

pub use crate::error::{CustomerError, CustomerErrorExt};
pub use crate::model::{Customer, CustomerDto, CustomerPayload, CustomerRecord};
pub use crate::repository::CustomerRepository;
pub use crate::service::CustomerService;

use chub_database::{Database, Migration};
use chub_domain::config::ApiConfig;
use chub_kernel::domain::registry::InitializedSlice;

/// Schema scripts applied in order at start-up.
pub const MIGRATIONS: &[Migration] = &[Migration::new(
    "customer",
    "0001-customer",
    include_str!("../migrations/0001-customer.surql"),
)];

/// Customer feature state
#[chub_derive::chub_slice]
pub struct Customers {
    pub service: CustomerService,
}

/// Builds the customer slice on top of an initialized database.
///
/// # Errors
/// Currently infallible; kept fallible like every slice initializer.
pub fn init(config: &ApiConfig, database: &Database) -> Result<InitializedSlice, CustomerError> {
    let repository = CustomerRepository::new(database.clone());
    let service = CustomerService::new(repository, config.customers.clone());

    tracing::info!("Customer slice initialized");
    Ok(InitializedSlice::new(Customers::new(CustomersInner { service })))
}
