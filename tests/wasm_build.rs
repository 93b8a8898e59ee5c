//! WASM browser tests
//!
//! Exercises the `SpotlightController` class and the web-sys backend in a
//! real document.

#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use spotlight_wasm::api::SpotlightController;
use spotlight_wasm::dom::{Dom, WebDom};
use spotlight_wasm::models::geometry::page_offset;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

/// Append a block sized by its text to the body. No inline style: removal
/// wipes the whole `style` attribute.
fn add_block(id: &str, lines: usize) -> HtmlElement {
    let doc = document();
    let element: HtmlElement = doc.create_element("div").unwrap().dyn_into().unwrap();
    element.set_id(id);
    for line in 0..lines {
        let row = doc.create_element("div").unwrap();
        row.set_text_content(Some(&format!("{} line {}", id, line)));
        element.append_child(&row).unwrap();
    }
    doc.body().unwrap().append_child(&element).unwrap();
    element
}

fn ids(values: &[&str]) -> JsValue {
    let array = js_sys::Array::new();
    for value in values {
        array.push(&JsValue::from_str(value));
    }
    array.into()
}

fn options(json: &str) -> JsValue {
    js_sys::JSON::parse(json).unwrap()
}

fn counting_function() -> (Rc<RefCell<u32>>, Closure<dyn FnMut()>, js_sys::Function) {
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    let closure = Closure::wrap(Box::new(move || *counter.borrow_mut() += 1) as Box<dyn FnMut()>);
    let function = closure.as_ref().unchecked_ref::<js_sys::Function>().clone();
    (calls, closure, function)
}

#[wasm_bindgen_test]
fn test_single_target_default_options() {
    let block = add_block("wb-box1", 2);
    let dom = WebDom::from_window().unwrap();
    let expected = page_offset(dom.offset_chain(&block));

    let controller = SpotlightController::new(JsValue::from_str("wb-box1"), JsValue::UNDEFINED, None)
        .expect("construction should succeed");

    let overlay: HtmlElement = document()
        .get_element_by_id("overlay")
        .expect("overlay appended")
        .dyn_into()
        .unwrap();
    let overlay_style = overlay.style();
    assert_eq!(overlay_style.get_property_value("opacity").unwrap(), "0.8");
    assert_eq!(overlay_style.get_property_value("background-color").unwrap(), "rgb(0, 0, 0)");
    assert_eq!(overlay_style.get_property_value("position").unwrap(), "fixed");
    assert_eq!(overlay_style.get_property_value("z-index").unwrap(), "10");
    assert_eq!(overlay.parent_element().map(|p| p.tag_name()).as_deref(), Some("BODY"));

    let style = block.style();
    assert_eq!(style.get_property_value("position").unwrap(), "absolute");
    assert_eq!(style.get_property_value("top").unwrap(), format!("{}px", expected.top));
    assert_eq!(style.get_property_value("left").unwrap(), format!("{}px", expected.left));
    assert_eq!(style.get_property_value("z-index").unwrap(), "90");
    assert!(controller.is_active());
    assert_eq!(controller.target_count(), 1);

    controller.remove();
    block.remove();
}

#[wasm_bindgen_test]
fn test_layout_round_trip() {
    let first = add_block("wb-rt-a", 1);
    let second = add_block("wb-rt-b", 3);
    let follower = add_block("wb-rt-c", 1);
    let before: Vec<_> = [&first, &second, &follower]
        .iter()
        .map(|e| e.get_bounding_client_rect())
        .map(|r| (r.top(), r.left(), r.width(), r.height()))
        .collect();

    let controller = SpotlightController::new(ids(&["wb-rt-a", "wb-rt-b"]), JsValue::UNDEFINED, None).unwrap();

    assert_eq!(controller.target_count(), 2);
    controller.remove();

    let after: Vec<_> = [&first, &second, &follower]
        .iter()
        .map(|e| e.get_bounding_client_rect())
        .map(|r| (r.top(), r.left(), r.width(), r.height()))
        .collect();
    assert_eq!(before, after);

    for element in [first, second, follower] {
        element.remove();
    }
}

#[wasm_bindgen_test]
fn test_two_targets_and_overlay_click() {
    let a = add_block("wb-a", 1);
    let b = add_block("wb-b", 1);
    let (calls, _closure, function) = counting_function();

    let controller = SpotlightController::new(
        ids(&["wb-a", "wb-b"]),
        options(r#"{"overlayOpacity": 0.2, "overlayId": "wb-overlay"}"#),
        Some(function),
    )
    .unwrap();

    let placeholder_a = a.previous_element_sibling().expect("placeholder before a");
    let placeholder_b = b.previous_element_sibling().expect("placeholder before b");
    assert!(placeholder_a.class_list().contains("spotlight-placeholder"));
    assert!(placeholder_b.class_list().contains("spotlight-placeholder"));

    let overlay: HtmlElement = document()
        .get_element_by_id("wb-overlay")
        .unwrap()
        .dyn_into()
        .unwrap();
    assert_eq!(overlay.style().get_property_value("opacity").unwrap(), "0.2");

    overlay.click();
    overlay.click();

    assert!(document().get_element_by_id("wb-overlay").is_none());
    assert!(placeholder_a.parent_node().is_none());
    assert!(placeholder_b.parent_node().is_none());
    assert!(!a.has_attribute("style"));
    assert!(!b.has_attribute("style"));
    assert_eq!(*calls.borrow(), 1);
    assert!(!controller.is_active());

    controller.remove();
    assert_eq!(*calls.borrow(), 1);

    a.remove();
    b.remove();
}

#[wasm_bindgen_test]
fn test_invalid_targets_throw_without_mutation() {
    let body = document().body().unwrap();
    let before = body.child_element_count();

    assert!(SpotlightController::new(JsValue::from_f64(3.0), JsValue::UNDEFINED, None).is_err());
    assert!(SpotlightController::new(JsValue::NULL, JsValue::UNDEFINED, None).is_err());

    let mixed = js_sys::Array::new();
    mixed.push(&JsValue::from_str("wb-x"));
    mixed.push(&JsValue::from_f64(1.0));
    assert!(SpotlightController::new(mixed.into(), JsValue::UNDEFINED, None).is_err());

    assert_eq!(body.child_element_count(), before);
    assert!(document().get_element_by_id("overlay").is_none());
}

#[wasm_bindgen_test]
fn test_invalid_options_throw() {
    let result = SpotlightController::new(
        JsValue::from_str("wb-none"),
        options(r#"{"overlayOpacity": "dark"}"#),
        None,
    );
    assert!(result.is_err());
    assert!(document().get_element_by_id("overlay").is_none());
}
