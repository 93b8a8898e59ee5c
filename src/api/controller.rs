//! `SpotlightController` JavaScript class

use wasm_bindgen::prelude::*;

use crate::api::helpers::{decode_options, decode_targets, throw};
use crate::dom::WebDom;
use crate::spotlight::{DismissCallback, Spotlight, SpotlightError};
use crate::{wasm_error, wasm_info, wasm_log};

/// Dims the page and lifts the given elements above the overlay.
///
/// ```js
/// const spotlight = new SpotlightController(["a", "b"], { overlayOpacity: 0.2 }, () => {
///     console.log("dismissed");
/// });
/// spotlight.remove();
/// ```
#[wasm_bindgen]
pub struct SpotlightController {
    spotlight: Spotlight<WebDom>,
}

#[wasm_bindgen]
impl SpotlightController {
    /// Activate the effect on the current document.
    ///
    /// # Parameters
    /// - `targets`: element id or array of element ids
    /// - `options`: `{ overlayOpacity, overlayColor, overlayId, placeholderClass }`, all optional
    /// - `on_dismiss`: called once, without arguments, when the effect is dismissed
    ///
    /// Throws if `targets` is neither a string nor an array of strings, or if
    /// `options` is malformed. Nothing is added to the page in that case.
    #[wasm_bindgen(constructor)]
    pub fn new(
        targets: JsValue,
        options: JsValue,
        on_dismiss: Option<js_sys::Function>,
    ) -> Result<SpotlightController, JsValue> {
        let targets = decode_targets(&targets).map_err(throw)?;
        let options = decode_options(options).map_err(throw)?;
        wasm_info!(
            "SpotlightController: {} target(s), overlay #{}",
            targets.len(),
            options.overlay_id
        );

        let dom = WebDom::from_window()
            .map_err(SpotlightError::from)
            .map_err(throw)?;

        let callback = on_dismiss.map(|function| {
            Box::new(move || {
                if let Err(err) = function.call0(&JsValue::NULL) {
                    wasm_error!("onDismiss callback threw: {:?}", err);
                }
            }) as DismissCallback
        });

        let spotlight = Spotlight::activate(dom, &targets, options, callback).map_err(throw)?;
        wasm_log!("  lifted {} element(s)", spotlight.target_count());

        Ok(SpotlightController { spotlight })
    }

    /// Dismiss the effect. Safe to call more than once.
    pub fn remove(&self) {
        if !self.spotlight.remove() {
            wasm_log!("SpotlightController.remove: already dismissed");
        }
    }

    #[wasm_bindgen(getter, js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.spotlight.is_active()
    }

    /// Number of lifted elements; 0 once dismissed
    #[wasm_bindgen(getter, js_name = targetCount)]
    pub fn target_count(&self) -> usize {
        self.spotlight.target_count()
    }
}
