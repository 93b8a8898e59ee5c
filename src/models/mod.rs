//! Data models for the spotlight effect
//!
//! Configuration, target identifiers, inline style sets and page geometry.
//! Nothing in here touches the DOM.

pub mod geometry;
pub mod options;
pub mod style;
pub mod targets;

pub use geometry::{BoxSize, OffsetMetrics, PageOffset};
pub use options::SpotlightOptions;
pub use style::StyleMap;
pub use targets::TargetSpec;
