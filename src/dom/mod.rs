//! DOM access for the spotlight controller
//!
//! The controller only needs a handful of operations from a document, so
//! they live behind the `Dom` trait. Two backends implement it:
//!
//! - `web`: the browser document through `web-sys`
//! - `memory`: a headless element tree with hand-set geometry, used by
//!   native tests and non-browser hosts

pub mod memory;
pub mod web;

pub use memory::{MemoryDom, NodeId};
pub use web::WebDom;

use thiserror::Error;

use crate::models::{BoxSize, OffsetMetrics, StyleMap};

/// Failures reported by a DOM backend
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomError {
    #[error("no global window available")]
    NoWindow,

    #[error("window has no document")]
    NoDocument,

    #[error("document has no body")]
    NoBody,

    /// A node that must be in the tree has no parent
    #[error("element is not attached to the document: {0}")]
    Detached(String),

    /// A node handle no longer refers to a live node
    #[error("unknown node: {0}")]
    UnknownNode(String),

    /// The browser threw while performing a DOM call
    #[error("DOM call failed: {0}")]
    Js(String),
}

/// Click handler registered on a node
pub type ClickHandler = Box<dyn FnMut()>;

/// Minimal document interface used by the spotlight controller
pub trait Dom: Clone + 'static {
    /// Handle to an element
    type Node: Clone + PartialEq + std::fmt::Debug + 'static;

    /// Registration guard; dropping it unregisters the handler
    type Listener: 'static;

    /// Resolve an element by its `id` attribute
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Create a detached `<div>`
    fn create_div(&self) -> Result<Self::Node, DomError>;

    fn set_id(&self, node: &Self::Node, id: &str) -> Result<(), DomError>;

    /// Append `node` as the last child of the document body
    fn append_to_body(&self, node: &Self::Node) -> Result<(), DomError>;

    /// Insert `node` into `reference`'s parent, immediately before `reference`
    fn insert_before(&self, node: &Self::Node, reference: &Self::Node) -> Result<(), DomError>;

    /// Remove `node` from its parent. A detached node is left alone.
    fn detach(&self, node: &Self::Node);

    /// Set every property of `style` inline on `node`
    fn apply_style(&self, node: &Self::Node, style: &StyleMap) -> Result<(), DomError>;

    /// Remove the whole `style` attribute
    fn clear_style(&self, node: &Self::Node);

    fn add_class(&self, node: &Self::Node, class: &str) -> Result<(), DomError>;

    fn remove_class(&self, node: &Self::Node, class: &str);

    /// Offset and scroll of `node` relative to its offset parent
    fn offset_metrics(&self, node: &Self::Node) -> OffsetMetrics;

    fn offset_parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Rendered border-box size
    fn box_size(&self, node: &Self::Node) -> BoxSize;

    /// Call `handler` on every click on `node` until the guard is dropped
    fn listen_click(&self, node: &Self::Node, handler: ClickHandler)
        -> Result<Self::Listener, DomError>;

    /// Metrics of `node` followed by every ancestor on its offset-parent chain
    fn offset_chain(&self, node: &Self::Node) -> Vec<OffsetMetrics> {
        let mut chain = Vec::new();
        let mut current = Some(node.clone());
        while let Some(element) = current {
            chain.push(self.offset_metrics(&element));
            current = self.offset_parent(&element);
        }
        chain
    }
}
