//! DOM helpers shared by the overlay views.

use overlay_common::config::Params;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, Window};

pub fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| "no global `window` exists".into())
}

pub fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| "should have a document on window".into())
}

/// Look up the element a view mounts into.
pub fn root(root_id: &str) -> Result<Element, JsValue> {
    document()?
        .get_element_by_id(root_id)
        .ok_or_else(|| format!("mount element '{}' not found", root_id).into())
}

/// Create an element, assign its inline style, and append it to `parent`.
pub fn styled_child(parent: &Element, tag: &str, style: &str) -> Result<HtmlElement, JsValue> {
    let el = document()?.create_element(tag)?;
    el.set_attribute("style", style)?;
    parent.append_child(&el)?;
    Ok(el.dyn_into::<HtmlElement>()?)
}

/// The translucent rounded box every overlay sits in.
pub fn overlay_container(root: &Element, extra: &str) -> Result<HtmlElement, JsValue> {
    styled_child(
        root,
        "div",
        &format!(
            "display:flex;flex-direction:column;gap:16px;padding:16px;\
             background:rgba(0,0,0,0.6);border-radius:8px;color:#fff;\
             font-family:system-ui,sans-serif;{extra}"
        ),
    )
}

/// Collect the location's query parameters.
pub fn query_params() -> Result<Params, JsValue> {
    let search = window()?.location().search()?;
    let parsed = web_sys::UrlSearchParams::new_with_str(&search)?;
    let mut params = Params::new();
    for entry in js_sys::try_iter(&parsed.entries())?.ok_or("entries is not iterable")? {
        let pair = js_sys::Array::from(&entry?);
        if let (Some(key), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_string()) {
            params.push(key, value);
        }
    }
    Ok(params)
}

/// Install a stylesheet once per document, keyed by element id.
pub fn ensure_stylesheet(id: &str, css: &str) -> Result<(), JsValue> {
    let document = document()?;
    if document.get_element_by_id(id).is_some() {
        return Ok(());
    }
    let style = document.create_element("style")?;
    style.set_id(id);
    style.set_text_content(Some(css));
    document
        .body()
        .ok_or("document has no body")?
        .append_child(&style)?;
    Ok(())
}
