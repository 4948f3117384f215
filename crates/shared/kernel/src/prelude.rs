pub use crate::config::load_config;
pub use crate::matrix::MatrixSegment;
#[cfg(feature = "server")]
pub use crate::server::{ApiState, ApiStateError, ErrorBody};
pub use crate::validation::{FieldViolation, field_violations};
pub use chub_domain::config::ApiConfig;
