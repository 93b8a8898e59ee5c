//! Spotlight controller
//!
//! - `controller`: activation, deactivation and the Inactive/Active state
//! - `error`: construction failures

pub mod controller;
pub mod error;

pub use controller::{DismissCallback, Placeholder, Spotlight, TargetElement};
pub use error::SpotlightError;
