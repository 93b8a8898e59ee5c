//! Spotlight configuration
//!
//! Options are captured per controller instance at construction time and
//! never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::models::style::StyleMap;

pub const DEFAULT_OVERLAY_OPACITY: f64 = 0.8;
pub const DEFAULT_OVERLAY_COLOR: &str = "#000";
pub const DEFAULT_OVERLAY_ID: &str = "overlay";
pub const DEFAULT_PLACEHOLDER_CLASS: &str = "spotlight-placeholder";

/// Stacking order of the dimming layer
pub const OVERLAY_Z_INDEX: i32 = 10;

/// Stacking order of lifted targets, above the overlay
pub const TARGET_Z_INDEX: i32 = 90;

/// Configuration for a single spotlight effect
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SpotlightOptions {
    /// Opacity of the dimming layer, in [0, 1]
    pub overlay_opacity: f64,

    /// Any CSS color accepted by `background-color`
    pub overlay_color: String,

    /// `id` attribute given to the overlay node
    pub overlay_id: String,

    /// Layout-preserving marker class put on placeholders
    pub placeholder_class: String,
}

impl Default for SpotlightOptions {
    fn default() -> Self {
        Self {
            overlay_opacity: DEFAULT_OVERLAY_OPACITY,
            overlay_color: DEFAULT_OVERLAY_COLOR.to_string(),
            overlay_id: DEFAULT_OVERLAY_ID.to_string(),
            placeholder_class: DEFAULT_PLACEHOLDER_CLASS.to_string(),
        }
    }
}

impl SpotlightOptions {
    /// Parse options from JSON text, e.g. `{"overlayOpacity": 0.2}`
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Clamp opacity into [0, 1]; non-finite values fall back to the default.
    pub fn normalized(mut self) -> Self {
        let opacity = self.overlay_opacity;
        if !opacity.is_finite() {
            log::warn!(
                "overlayOpacity {} is not a finite number, using {}",
                opacity,
                DEFAULT_OVERLAY_OPACITY
            );
            self.overlay_opacity = DEFAULT_OVERLAY_OPACITY;
        } else if !(0.0..=1.0).contains(&opacity) {
            let clamped = opacity.clamp(0.0, 1.0);
            log::warn!("overlayOpacity {} out of range, clamped to {}", opacity, clamped);
            self.overlay_opacity = clamped;
        }
        self
    }

    /// Inline styles for the full-viewport dimming layer
    pub fn overlay_style(&self) -> StyleMap {
        let mut style = StyleMap::new();
        style
            .set("position", "fixed")
            .set("top", "0")
            .set("left", "0")
            .set("width", "100%")
            .set("height", "100%")
            .set("background-color", self.overlay_color.as_str())
            .set("opacity", self.overlay_opacity.to_string())
            .set("z-index", OVERLAY_Z_INDEX.to_string());
        style
    }
}
