//! Shared helpers for the WASM API
//!
//! Console logging macros and decoding of the loosely typed arguments that
//! JavaScript hands to the constructor.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::models::{SpotlightOptions, TargetSpec};
use crate::spotlight::SpotlightError;

// ============================================================================
// Console Logging Functions
// ============================================================================

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    fn info(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    fn warn(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    fn error(s: &str);
}

// ============================================================================
// Logging Macros
// ============================================================================

/// Log a debug message with [WASM] prefix
#[macro_export]
macro_rules! wasm_log {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_debug(&format!($($arg)*))
    };
}

/// Log an info message with [WASM] prefix
#[macro_export]
macro_rules! wasm_info {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_info(&format!($($arg)*))
    };
}

/// Log a warning message with [WASM] ⚠️ prefix
#[macro_export]
macro_rules! wasm_warn {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_warn(&format!($($arg)*))
    };
}

/// Log an error message with [WASM] ❌ prefix
#[macro_export]
macro_rules! wasm_error {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_error(&format!($($arg)*))
    };
}

pub fn log_debug(msg: &str) {
    log(&format!("[WASM] {}", msg));
}

pub fn log_info(msg: &str) {
    info(&format!("[WASM] {}", msg));
}

pub fn log_warn(msg: &str) {
    warn(&format!("[WASM] ⚠️ {}", msg));
}

pub fn log_error(msg: &str) {
    error(&format!("[WASM] ❌ {}", msg));
}

// ============================================================================
// Argument Decoding
// ============================================================================

/// Short description of a JS value's shape for error messages
fn describe_js_type(value: &JsValue) -> String {
    if value.is_null() {
        return "null".to_string();
    }
    if js_sys::Array::is_array(value) {
        return "array".to_string();
    }
    value
        .js_typeof()
        .as_string()
        .unwrap_or_else(|| "unknown".to_string())
}

/// Accept a string or an array of strings; reject everything else
pub fn decode_targets(value: &JsValue) -> Result<TargetSpec, SpotlightError> {
    if let Some(id) = value.as_string() {
        return Ok(TargetSpec::Single(id));
    }

    if js_sys::Array::is_array(value) {
        let array: &js_sys::Array = value.unchecked_ref();
        let mut ids = Vec::with_capacity(array.length() as usize);
        for (index, item) in array.iter().enumerate() {
            match item.as_string() {
                Some(id) => ids.push(id),
                None => {
                    return Err(SpotlightError::InvalidTargets(format!(
                        "an array with a {} at index {}",
                        describe_js_type(&item),
                        index
                    )))
                }
            }
        }
        return Ok(TargetSpec::Multiple(ids));
    }

    Err(SpotlightError::InvalidTargets(describe_js_type(value)))
}

/// `undefined` and `null` select the defaults
pub fn decode_options(value: JsValue) -> Result<SpotlightOptions, SpotlightError> {
    if value.is_undefined() || value.is_null() {
        return Ok(SpotlightOptions::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| SpotlightError::InvalidOptions(e.to_string()))
}

/// Log `err` and turn it into a thrown JS `Error`
pub fn throw(err: SpotlightError) -> JsValue {
    log_error(&err.to_string());
    err.into()
}
