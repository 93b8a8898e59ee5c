//! Spotlight WASM API
//!
//! This module provides the JavaScript-facing API.
//!
//! # Module Structure
//!
//! - `helpers`: Console logging macros and decoding of JS arguments
//! - `controller`: The `SpotlightController` class

pub mod helpers;
pub mod controller;

pub use controller::SpotlightController;
