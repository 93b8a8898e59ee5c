//! Page geometry
//!
//! Page offsets are found by walking an element's offset-parent chain and
//! summing `offsetTop - scrollTop` (and the left analogue) at every step,
//! the element itself included.

use serde::{Deserialize, Serialize};

/// Position of an element relative to the document
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct PageOffset {
    pub top: f64,
    pub left: f64,
}

/// Rendered box size captured for a placeholder
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct BoxSize {
    pub width: f64,
    pub height: f64,
}

/// Offset and scroll position of one element relative to its offset parent
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OffsetMetrics {
    pub offset_top: f64,
    pub offset_left: f64,
    pub scroll_top: f64,
    pub scroll_left: f64,
}

impl OffsetMetrics {
    pub fn new(offset_top: f64, offset_left: f64, scroll_top: f64, scroll_left: f64) -> Self {
        Self {
            offset_top,
            offset_left,
            scroll_top,
            scroll_left,
        }
    }
}

/// Sum a chain of metrics, innermost element first
pub fn page_offset<I>(chain: I) -> PageOffset
where
    I: IntoIterator<Item = OffsetMetrics>,
{
    chain.into_iter().fold(PageOffset::default(), |acc, m| PageOffset {
        top: acc.top + m.offset_top - m.scroll_top,
        left: acc.left + m.offset_left - m.scroll_left,
    })
}
