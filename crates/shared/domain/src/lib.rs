//! # Domain Models
//!
//! Pure configuration and registry types shared by every crate.
//! Keep it lean: no I/O, networking, or heavy logic, just data and simple helpers.

pub mod config;
pub mod constants;
pub mod registry;
