//! Facade crate for the Customer Hub features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `chub` with the `server` feature.
//! - Pass [`migrations`] to the database builder, then call [`init`] to build the slices.

use chub_database::{Database, Migration};
pub use chub_domain as domain;
use chub_domain::config::ApiConfig;
pub use chub_kernel as kernel;

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        pub use chub_customer::server::router as customer_router;
        pub use chub_kernel::server::router::system_router;
    }
}

/// Feature slices bundled into this build.
pub mod features {
    pub use chub_customer as customer;
}

/// Schema migrations of every feature, in application order.
#[must_use]
pub fn migrations() -> Vec<Migration> {
    features::customer::MIGRATIONS.to_vec()
}

/// Initialize all features on top of a migrated database.
///
/// # Errors
/// Returns an error if any feature initialization fails.
pub fn init(
    config: &ApiConfig,
    database: &Database,
) -> Result<Vec<domain::registry::InitializedSlice>, Box<dyn std::error::Error + Send + Sync>> {
    let mut slices = Vec::new();

    slices.push(features::customer::init(config, database)?);

    Ok(slices)
}
