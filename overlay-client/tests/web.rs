//! Browser-side smoke tests, run with `wasm-pack test --headless --chrome`.

#![cfg(target_arch = "wasm32")]

use overlay_client::{MessageBoxView, TickerView};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn mount_point(id: &str) -> web_sys::Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let el = document.create_element("div").unwrap();
    el.set_id(id);
    document.body().unwrap().append_child(&el).unwrap();
    el
}

#[wasm_bindgen_test]
fn ticker_renders_default_text() {
    let root = mount_point("ticker-root");
    let _view = TickerView::new("ticker-root").unwrap();
    assert!(
        root.text_content()
            .unwrap_or_default()
            .contains("滚动文字")
    );
}

#[wasm_bindgen_test]
fn message_box_shows_pushed_toast() {
    let root = mount_point("message-root");
    let view = MessageBoxView::new("message-root").unwrap();
    let message = js_sys::JSON::parse(r#"{"content":"hello","type":"success"}"#).unwrap();
    view.push(message).unwrap();
    assert!(root.text_content().unwrap_or_default().contains("hello"));
}

#[wasm_bindgen_test]
fn missing_mount_element_is_an_error() {
    assert!(TickerView::new("no-such-element").is_err());
}
