//! Kernel utilities shared across slices.
//! Keep this crate lightweight: configuration loading, matrix-variable parsing and,
//! behind the `server` feature, the application state and system routes.
//!
//! ## Matrix variables
//! ```rust
//! use chub_kernel::matrix::MatrixSegment;
//!
//! let segment = MatrixSegment::parse("lookup;email=a@x.io,b@x.io;email=c@x.io");
//! assert_eq!(segment.value(), "lookup");
//! assert_eq!(segment.get("email").map(<[String]>::len), Some(3));
//! ```
pub mod config;
pub mod matrix;
pub mod prelude;
#[cfg(feature = "server")]
pub mod server;
pub mod validation;

pub use chub_domain as domain;
