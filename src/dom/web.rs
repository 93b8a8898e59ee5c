//! Browser DOM backend over `web-sys`

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, EventTarget, HtmlElement, Node};

use super::{ClickHandler, Dom, DomError};
use crate::models::{BoxSize, OffsetMetrics, StyleMap};

/// Handle to the browser document
#[derive(Clone, Debug)]
pub struct WebDom {
    document: Document,
}

impl WebDom {
    /// Use the document of the global window
    pub fn from_window() -> Result<Self, DomError> {
        let window = web_sys::window().ok_or(DomError::NoWindow)?;
        let document = window.document().ok_or(DomError::NoDocument)?;
        Ok(Self { document })
    }

    pub fn new(document: Document) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

fn js_error(err: JsValue) -> DomError {
    DomError::Js(
        err.as_string()
            .or_else(|| err.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())))
            .unwrap_or_else(|| format!("{:?}", err)),
    )
}

fn describe(node: &HtmlElement) -> String {
    let id = node.id();
    if id.is_empty() {
        format!("<{}>", node.tag_name().to_lowercase())
    } else {
        format!("#{}", id)
    }
}

/// Click listener registration; removed from the target on drop
pub struct WebClickListener {
    target: EventTarget,
    closure: Closure<dyn FnMut(Event)>,
}

impl Drop for WebClickListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback("click", self.closure.as_ref().unchecked_ref());
    }
}

impl Dom for WebDom {
    type Node = HtmlElement;
    type Listener = WebClickListener;

    fn element_by_id(&self, id: &str) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(id)
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    }

    fn create_div(&self) -> Result<HtmlElement, DomError> {
        self.document
            .create_element("div")
            .map_err(js_error)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| DomError::Js("created element is not an HTMLElement".to_string()))
    }

    fn set_id(&self, node: &HtmlElement, id: &str) -> Result<(), DomError> {
        node.set_id(id);
        Ok(())
    }

    fn append_to_body(&self, node: &HtmlElement) -> Result<(), DomError> {
        let body = self.document.body().ok_or(DomError::NoBody)?;
        body.append_child(node).map_err(js_error)?;
        Ok(())
    }

    fn insert_before(&self, node: &HtmlElement, reference: &HtmlElement) -> Result<(), DomError> {
        let parent = reference
            .parent_node()
            .ok_or_else(|| DomError::Detached(describe(reference)))?;
        let reference: &Node = reference;
        parent.insert_before(node, Some(reference)).map_err(js_error)?;
        Ok(())
    }

    fn detach(&self, node: &HtmlElement) {
        node.remove();
    }

    fn apply_style(&self, node: &HtmlElement, style: &StyleMap) -> Result<(), DomError> {
        let declaration = node.style();
        for (property, value) in style.iter() {
            declaration.set_property(property, value).map_err(js_error)?;
        }
        Ok(())
    }

    fn clear_style(&self, node: &HtmlElement) {
        let _ = node.remove_attribute("style");
    }

    fn add_class(&self, node: &HtmlElement, class: &str) -> Result<(), DomError> {
        node.class_list().add_1(class).map_err(js_error)
    }

    fn remove_class(&self, node: &HtmlElement, class: &str) {
        let _ = node.class_list().remove_1(class);
    }

    fn offset_metrics(&self, node: &HtmlElement) -> OffsetMetrics {
        OffsetMetrics::new(
            f64::from(node.offset_top()),
            f64::from(node.offset_left()),
            f64::from(node.scroll_top()),
            f64::from(node.scroll_left()),
        )
    }

    fn offset_parent(&self, node: &HtmlElement) -> Option<HtmlElement> {
        node.offset_parent()
            .and_then(|parent| parent.dyn_into::<HtmlElement>().ok())
    }

    fn box_size(&self, node: &HtmlElement) -> BoxSize {
        BoxSize {
            width: f64::from(node.offset_width()),
            height: f64::from(node.offset_height()),
        }
    }

    fn listen_click(
        &self,
        node: &HtmlElement,
        mut handler: ClickHandler,
    ) -> Result<WebClickListener, DomError> {
        let closure = Closure::wrap(Box::new(move |_event: Event| handler()) as Box<dyn FnMut(Event)>);
        let target: EventTarget = node.clone().into();
        target
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .map_err(js_error)?;
        Ok(WebClickListener { target, closure })
    }
}
