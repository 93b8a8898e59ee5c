//! Spotlight WASM Module
//!
//! Dims the page with a full-viewport overlay and lifts selected elements
//! above it, keeping their slots in the layout with placeholders until the
//! overlay is clicked or the effect is removed.

pub mod models;
pub mod dom;
pub mod spotlight;
pub mod api;

// Re-export commonly used types
pub use api::SpotlightController;
pub use models::{SpotlightOptions, TargetSpec};
pub use spotlight::{Spotlight, SpotlightError};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // Fails only if a logger is already installed
    #[cfg(feature = "console_log")]
    let _ = console_log::init_with_level(log::Level::Debug);

    log::info!("Spotlight WASM module initialized");
}
