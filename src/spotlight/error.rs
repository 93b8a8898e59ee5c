//! Error types for spotlight construction

use thiserror::Error;

use crate::dom::DomError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpotlightError {
    /// Targets argument was neither an identifier nor a list of identifiers
    #[error("Spotlight targets must be an element id or an array of element ids, got {0}")]
    InvalidTargets(String),

    /// Options argument could not be decoded
    #[error("Invalid spotlight options: {0}")]
    InvalidOptions(String),

    /// A DOM operation failed; everything already applied was rolled back
    #[error("Spotlight activation failed: {0}")]
    Dom(#[from] DomError),
}

impl From<SpotlightError> for wasm_bindgen::JsValue {
    fn from(err: SpotlightError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
