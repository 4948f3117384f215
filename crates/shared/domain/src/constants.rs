//! Shared names used by routers, the `OpenAPI` document and the database schema.

/// `OpenAPI` tag for system endpoints.
pub const SYSTEM_TAG: &str = "System";
/// `OpenAPI` tag for customer endpoints.
pub const CUSTOMER_TAG: &str = "Customers";

/// Table holding customer rows.
pub const CUSTOMER_TABLE: &str = "customer";
/// Unique index on `customer.customer_id`.
pub const CUSTOMER_ID_INDEX: &str = "customer_id_idx";
/// Unique index on `customer.email_address`.
pub const CUSTOMER_EMAIL_INDEX: &str = "customer_email_idx";
/// Table recording applied schema migrations.
pub const MIGRATION_TABLE: &str = "migration";

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "CHUB";
