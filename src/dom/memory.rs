//! Headless DOM backend
//!
//! An arena of elements with explicit parent/child links. There is no layout
//! engine: offsets, scroll positions, sizes and offset parents are whatever
//! the host sets with the builder methods.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::{ClickHandler, Dom, DomError};
use crate::models::{BoxSize, OffsetMetrics, StyleMap};

/// Index of a node in a `MemoryDom`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Default)]
struct NodeData {
    tag: String,
    id: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    classes: Vec<String>,
    /// `None` means the element carries no `style` attribute at all
    style: Option<StyleMap>,
    metrics: OffsetMetrics,
    size: BoxSize,
    offset_parent: Option<NodeId>,
}

type SharedHandler = Rc<RefCell<ClickHandler>>;

#[derive(Default)]
struct Arena {
    nodes: Vec<NodeData>,
    listeners: HashMap<NodeId, Vec<(u64, SharedHandler)>>,
    next_listener: u64,
}

impl Arena {
    fn node(&self, id: NodeId) -> Result<&NodeData, DomError> {
        self.nodes
            .get(id.0)
            .ok_or_else(|| DomError::UnknownNode(format!("{:?}", id)))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeData, DomError> {
        self.nodes
            .get_mut(id.0)
            .ok_or_else(|| DomError::UnknownNode(format!("{:?}", id)))
    }

    fn unlink(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get(id.0).and_then(|node| node.parent) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(parent.0) {
            parent.children.retain(|child| *child != id);
        }
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.parent = None;
        }
    }

    /// Guard against inserting a node into its own subtree
    fn is_ancestor(&self, candidate: NodeId, of: NodeId) -> bool {
        let mut current = Some(of);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.nodes.get(id.0).and_then(|node| node.parent);
        }
        false
    }

    fn label(&self, id: NodeId) -> String {
        match self.nodes.get(id.0) {
            Some(NodeData { id: Some(attr), .. }) => format!("#{}", attr),
            Some(node) => format!("<{}>", node.tag),
            None => format!("{:?}", id),
        }
    }
}

/// In-memory document with a `<body>` root
#[derive(Clone)]
pub struct MemoryDom {
    arena: Rc<RefCell<Arena>>,
    body: NodeId,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    pub fn new() -> Self {
        let arena = Arena {
            nodes: vec![NodeData {
                tag: "body".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        Self {
            arena: Rc::new(RefCell::new(arena)),
            body: NodeId(0),
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Create a detached element
    pub fn create_element(&self, tag: &str) -> NodeId {
        let mut arena = self.arena.borrow_mut();
        arena.nodes.push(NodeData {
            tag: tag.to_string(),
            ..Default::default()
        });
        NodeId(arena.nodes.len() - 1)
    }

    /// Append `child` to `parent`, moving it if it already has a parent
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let mut arena = self.arena.borrow_mut();
        arena.node(parent)?;
        arena.node(child)?;
        if arena.is_ancestor(child, parent) {
            return Err(DomError::Js(format!(
                "cannot append {} inside itself",
                arena.label(child)
            )));
        }
        arena.unlink(child);
        arena.node_mut(parent)?.children.push(child);
        arena.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Create a `<div id=..>` under `parent` with the given geometry; its
    /// offset parent is `parent` unless `parent` is the body.
    pub fn add_box(
        &self,
        parent: NodeId,
        id: &str,
        metrics: OffsetMetrics,
        size: BoxSize,
    ) -> Result<NodeId, DomError> {
        let node = self.create_element("div");
        self.set_id(&node, id)?;
        self.append_child(parent, node)?;
        self.set_metrics(node, metrics)?;
        self.set_size(node, size)?;
        if parent != self.body {
            self.set_offset_parent(node, Some(parent))?;
        }
        Ok(node)
    }

    pub fn set_metrics(&self, node: NodeId, metrics: OffsetMetrics) -> Result<(), DomError> {
        self.arena.borrow_mut().node_mut(node)?.metrics = metrics;
        Ok(())
    }

    pub fn set_size(&self, node: NodeId, size: BoxSize) -> Result<(), DomError> {
        self.arena.borrow_mut().node_mut(node)?.size = size;
        Ok(())
    }

    pub fn set_offset_parent(&self, node: NodeId, parent: Option<NodeId>) -> Result<(), DomError> {
        self.arena.borrow_mut().node_mut(node)?.offset_parent = parent;
        Ok(())
    }

    /// Replace the `style` attribute with raw CSS text
    pub fn set_style_attribute(&self, node: NodeId, css_text: &str) -> Result<(), DomError> {
        self.arena.borrow_mut().node_mut(node)?.style = Some(StyleMap::parse(css_text));
        Ok(())
    }

    /// Value of the `style` attribute, if the element has one
    pub fn style_attribute(&self, node: NodeId) -> Option<String> {
        let arena = self.arena.borrow();
        arena
            .node(node)
            .ok()
            .and_then(|data| data.style.as_ref().map(StyleMap::to_css_text))
    }

    /// Value of a single inline style property
    pub fn style_property(&self, node: NodeId, property: &str) -> Option<String> {
        let arena = self.arena.borrow();
        arena
            .node(node)
            .ok()
            .and_then(|data| data.style.as_ref())
            .and_then(|style| style.get(property).map(str::to_string))
    }

    pub fn id_of(&self, node: NodeId) -> Option<String> {
        let arena = self.arena.borrow();
        arena.node(node).ok().and_then(|data| data.id.clone())
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        let arena = self.arena.borrow();
        arena
            .node(node)
            .map(|data| data.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        let arena = self.arena.borrow();
        arena.node(node).ok().and_then(|data| data.parent)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        let arena = self.arena.borrow();
        arena
            .node(node)
            .map(|data| data.children.clone())
            .unwrap_or_default()
    }

    /// Whether `node` is reachable from the body
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.arena.borrow().is_ancestor(self.body, node)
    }

    /// Number of elements in the document, body excluded
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = self.children(self.body);
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(self.children(node));
        }
        count
    }

    /// Attached elements carrying `class`, in document order
    pub fn elements_with_class(&self, class: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.children(self.body).into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            if self.has_class(node, class) {
                found.push(node);
            }
            stack.extend(self.children(node).into_iter().rev());
        }
        found
    }

    /// Number of click handlers currently registered on `node`
    pub fn listener_count(&self, node: NodeId) -> usize {
        self.arena
            .borrow()
            .listeners
            .get(&node)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Run every click handler registered on `node`
    pub fn click(&self, node: NodeId) {
        let handlers: Vec<SharedHandler> = self
            .arena
            .borrow()
            .listeners
            .get(&node)
            .map(|entries| entries.iter().map(|(_, handler)| Rc::clone(handler)).collect())
            .unwrap_or_default();
        for handler in handlers {
            // A handler that re-enters its own click is skipped.
            if let Ok(mut handler) = handler.try_borrow_mut() {
                (*handler)();
            }
        }
    }
}

/// Click registration on a `MemoryDom` node
pub struct MemoryClickListener {
    arena: Rc<RefCell<Arena>>,
    node: NodeId,
    key: u64,
}

impl Drop for MemoryClickListener {
    fn drop(&mut self) {
        let mut arena = self.arena.borrow_mut();
        if let Some(entries) = arena.listeners.get_mut(&self.node) {
            entries.retain(|(key, _)| *key != self.key);
            if entries.is_empty() {
                arena.listeners.remove(&self.node);
            }
        }
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;
    type Listener = MemoryClickListener;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        let arena = self.arena.borrow();
        let mut stack = vec![self.body];
        while let Some(node) = stack.pop() {
            let data = arena.node(node).ok()?;
            if data.id.as_deref() == Some(id) {
                return Some(node);
            }
            stack.extend(data.children.iter().rev());
        }
        None
    }

    fn create_div(&self) -> Result<NodeId, DomError> {
        Ok(self.create_element("div"))
    }

    fn set_id(&self, node: &NodeId, id: &str) -> Result<(), DomError> {
        self.arena.borrow_mut().node_mut(*node)?.id = Some(id.to_string());
        Ok(())
    }

    fn append_to_body(&self, node: &NodeId) -> Result<(), DomError> {
        self.append_child(self.body, *node)
    }

    fn insert_before(&self, node: &NodeId, reference: &NodeId) -> Result<(), DomError> {
        let mut arena = self.arena.borrow_mut();
        arena.node(*node)?;
        let parent = arena
            .node(*reference)?
            .parent
            .ok_or_else(|| DomError::Detached(arena.label(*reference)))?;
        if arena.is_ancestor(*node, parent) {
            return Err(DomError::Js(format!(
                "cannot insert {} inside itself",
                arena.label(*node)
            )));
        }
        arena.unlink(*node);
        let siblings = &mut arena.node_mut(parent)?.children;
        let index = siblings
            .iter()
            .position(|child| child == reference)
            .unwrap_or(siblings.len());
        siblings.insert(index, *node);
        arena.node_mut(*node)?.parent = Some(parent);
        Ok(())
    }

    fn detach(&self, node: &NodeId) {
        self.arena.borrow_mut().unlink(*node);
    }

    fn apply_style(&self, node: &NodeId, style: &StyleMap) -> Result<(), DomError> {
        let mut arena = self.arena.borrow_mut();
        let current = arena.node_mut(*node)?.style.get_or_insert_with(StyleMap::new);
        for (property, value) in style.iter() {
            current.set(property, value);
        }
        Ok(())
    }

    fn clear_style(&self, node: &NodeId) {
        if let Ok(data) = self.arena.borrow_mut().node_mut(*node) {
            data.style = None;
        }
    }

    fn add_class(&self, node: &NodeId, class: &str) -> Result<(), DomError> {
        let mut arena = self.arena.borrow_mut();
        let classes = &mut arena.node_mut(*node)?.classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
        Ok(())
    }

    fn remove_class(&self, node: &NodeId, class: &str) {
        if let Ok(data) = self.arena.borrow_mut().node_mut(*node) {
            data.classes.retain(|c| c != class);
        }
    }

    fn offset_metrics(&self, node: &NodeId) -> OffsetMetrics {
        let arena = self.arena.borrow();
        arena.node(*node).map(|data| data.metrics).unwrap_or_default()
    }

    fn offset_parent(&self, node: &NodeId) -> Option<NodeId> {
        let arena = self.arena.borrow();
        arena.node(*node).ok().and_then(|data| data.offset_parent)
    }

    fn box_size(&self, node: &NodeId) -> BoxSize {
        let arena = self.arena.borrow();
        arena.node(*node).map(|data| data.size).unwrap_or_default()
    }

    fn listen_click(&self, node: &NodeId, handler: ClickHandler) -> Result<MemoryClickListener, DomError> {
        let mut arena = self.arena.borrow_mut();
        arena.node(*node)?;
        let key = arena.next_listener;
        arena.next_listener += 1;
        arena
            .listeners
            .entry(*node)
            .or_default()
            .push((key, Rc::new(RefCell::new(handler))));
        Ok(MemoryClickListener {
            arena: Rc::clone(&self.arena),
            node: *node,
            key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(width: f64, height: f64) -> BoxSize {
        BoxSize { width, height }
    }

    #[test]
    fn test_insert_before_keeps_sibling_order() {
        let dom = MemoryDom::new();
        let body = dom.body();
        let a = dom.add_box(body, "a", OffsetMetrics::default(), size(1.0, 1.0)).unwrap();
        let b = dom.add_box(body, "b", OffsetMetrics::default(), size(1.0, 1.0)).unwrap();
        let marker = dom.create_element("div");

        dom.insert_before(&marker, &b).unwrap();
        assert_eq!(dom.children(body), vec![a, marker, b]);
    }

    #[test]
    fn test_insert_before_detached_reference_fails() {
        let dom = MemoryDom::new();
        let loose = dom.create_element("div");
        let marker = dom.create_element("div");
        assert!(matches!(dom.insert_before(&marker, &loose), Err(DomError::Detached(_))));
    }

    #[test]
    fn test_detach_twice_is_noop() {
        let dom = MemoryDom::new();
        let node = dom.create_div().unwrap();
        dom.append_to_body(&node).unwrap();
        dom.detach(&node);
        dom.detach(&node);
        assert!(!dom.is_attached(node));
        assert_eq!(dom.node_count(), 0);
    }

    #[test]
    fn test_element_by_id_searches_subtree() {
        let dom = MemoryDom::new();
        let outer = dom.add_box(dom.body(), "outer", OffsetMetrics::default(), size(10.0, 10.0)).unwrap();
        let inner = dom.add_box(outer, "inner", OffsetMetrics::default(), size(5.0, 5.0)).unwrap();
        assert_eq!(dom.element_by_id("inner"), Some(inner));
        assert_eq!(dom.element_by_id("missing"), None);
        assert_eq!(dom.element_by_id(""), None);
    }

    #[test]
    fn test_append_into_own_subtree_rejected() {
        let dom = MemoryDom::new();
        let outer = dom.add_box(dom.body(), "outer", OffsetMetrics::default(), size(10.0, 10.0)).unwrap();
        let inner = dom.add_box(outer, "inner", OffsetMetrics::default(), size(5.0, 5.0)).unwrap();
        assert!(dom.append_child(inner, outer).is_err());
    }

    #[test]
    fn test_clear_style_removes_attribute() {
        let dom = MemoryDom::new();
        let node = dom.create_element("div");
        dom.set_style_attribute(node, "color: red").unwrap();
        assert_eq!(dom.style_attribute(node).as_deref(), Some("color: red;"));
        dom.clear_style(&node);
        assert_eq!(dom.style_attribute(node), None);
    }

    #[test]
    fn test_listener_guard_unregisters() {
        let dom = MemoryDom::new();
        let node = dom.create_element("div");
        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);
        let guard = dom
            .listen_click(&node, Box::new(move || *counter.borrow_mut() += 1))
            .unwrap();

        dom.click(node);
        assert_eq!(*hits.borrow(), 1);

        drop(guard);
        dom.click(node);
        assert_eq!(*hits.borrow(), 1);
        assert_eq!(dom.listener_count(node), 0);
    }

    #[test]
    fn test_offset_chain_follows_offset_parents() {
        let dom = MemoryDom::new();
        let outer = dom.add_box(dom.body(), "outer", OffsetMetrics::new(100.0, 10.0, 0.0, 0.0), size(50.0, 50.0)).unwrap();
        let inner = dom.add_box(outer, "inner", OffsetMetrics::new(5.0, 6.0, 0.0, 0.0), size(5.0, 5.0)).unwrap();
        let chain = dom.offset_chain(&inner);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].offset_top, 5.0);
        assert_eq!(chain[1].offset_top, 100.0);
    }
}
