//! HTTP plumbing shared by every slice router.

mod error;
mod health;
pub mod router;
mod state;

pub use error::ErrorBody;
pub use state::{ApiState, ApiStateBuilder, ApiStateError, ApiStateInner};
