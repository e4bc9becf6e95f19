//! Scrolling ticker overlay.

use std::cell::RefCell;
use std::rc::Rc;

use overlay_common::config::Params;
use overlay_common::live::LiveEvent;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement};

use crate::dom;
use crate::net::{DataSource, SourceMode};
use crate::tick::Interval;
use crate::views::TICK_MS;

const DEFAULT_TEXT: &str = "OBS Overlay Ticker - 这是一条滚动文字示例";
const DEFAULT_SPEED: u32 = 30;

const KEYFRAMES_ID: &str = "overlay-ticker-keyframes";
const KEYFRAMES: &str = "@keyframes overlay-ticker-scroll { \
    from { transform: translateX(0); } to { transform: translateX(-50%); } }";

/// Seconds one full scroll takes: longer text scrolls longer, higher speed
/// shortens it, with a 5 s floor.
fn scroll_duration_secs(char_count: usize, speed: u32) -> f64 {
    (char_count as f64 * (100.0 / speed.max(1) as f64)).max(5.0)
}

struct TickerState {
    scroller: HtmlElement,
    spans: [HtmlElement; 2],
    text: String,
    speed: u32,
    source: Option<DataSource>,
}

impl TickerState {
    fn apply(&mut self, text: String, speed: u32) {
        if text == self.text && speed == self.speed {
            return;
        }
        self.text = text;
        self.speed = speed;
        self.paint();
    }

    fn paint(&self) {
        // The text is doubled so the keyframe loop wraps seamlessly.
        for span in &self.spans {
            span.set_text_content(Some(&self.text));
        }
        let secs = scroll_duration_secs(self.text.chars().count(), self.speed);
        let _ = self
            .scroller
            .style()
            .set_property("animation-duration", &format!("{secs}s"));
    }
}

/// Ticker overlay view; configured from `text` and `speed` parameters.
#[wasm_bindgen]
pub struct TickerView {
    root: Element,
    state: Rc<RefCell<TickerState>>,
    _interval: Interval,
}

#[wasm_bindgen]
impl TickerView {
    /// Build the ticker inside the element `root_id`, configured from the
    /// current URL's query parameters.
    #[wasm_bindgen(constructor)]
    pub fn new(root_id: &str) -> Result<TickerView, JsValue> {
        console_error_panic_hook::set_once();
        let params = dom::query_params()?;
        Self::with_params(root_id, &params)
    }

    /// Connect a live source; `ticker` events replace the text and speed.
    /// `polling_ms` switches the source from WebSocket to polling mode.
    pub fn attach_source(&self, url: &str, polling_ms: Option<u32>) -> Result<(), JsValue> {
        let mode = SourceMode::from_polling_ms(polling_ms);
        self.state.borrow_mut().source = Some(DataSource::connect(url, mode)?);
        Ok(())
    }

    /// Whether the attached source is currently delivering.
    pub fn source_connected(&self) -> bool {
        self.state
            .borrow()
            .source
            .as_ref()
            .is_some_and(|source| source.is_connected())
    }
}

impl TickerView {
    pub fn with_params(root_id: &str, params: &Params) -> Result<TickerView, JsValue> {
        let root = dom::root(root_id)?;
        root.set_inner_html("");
        dom::ensure_stylesheet(KEYFRAMES_ID, KEYFRAMES)?;

        let container = dom::styled_child(
            &root,
            "div",
            "overflow:hidden;white-space:nowrap;width:100%;\
             background:rgba(0,0,0,0.6);padding:8px 0;",
        )?;
        let scroller = dom::styled_child(
            &container,
            "div",
            "display:inline-block;white-space:nowrap;\
             animation-name:overlay-ticker-scroll;\
             animation-timing-function:linear;\
             animation-iteration-count:infinite;",
        )?;
        let span_style = "padding:0 2em;color:#fff;font-size:20px;font-family:system-ui,sans-serif;";
        let span_a = dom::styled_child(&scroller, "span", span_style)?;
        let span_b = dom::styled_child(&scroller, "span", span_style)?;

        let text = params.get("text").unwrap_or(DEFAULT_TEXT).to_string();
        let speed = params
            .get("speed")
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_SPEED);

        let state = Rc::new(RefCell::new(TickerState {
            scroller,
            spans: [span_a, span_b],
            text,
            speed,
            source: None,
        }));
        state.borrow().paint();

        let interval = {
            let state = Rc::clone(&state);
            Interval::new(TICK_MS, move || {
                let mut state = state.borrow_mut();
                let events = state
                    .source
                    .as_ref()
                    .map(|source| source.drain())
                    .unwrap_or_default();
                for event in events {
                    if let LiveEvent::Ticker(data) = event {
                        let speed = data.speed.unwrap_or(DEFAULT_SPEED);
                        state.apply(data.text, speed);
                    }
                }
            })?
        };

        Ok(TickerView {
            root,
            state,
            _interval: interval,
        })
    }
}

impl Drop for TickerView {
    fn drop(&mut self) {
        self.root.set_inner_html("");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_duration_scales_with_text() {
        // 30 chars at the default speed take 100s
        assert!((scroll_duration_secs(30, 30) - 100.0).abs() < 1e-9);
        assert!((scroll_duration_secs(60, 30) - 200.0).abs() < 1e-9);
        // faster speed shortens the loop
        assert!((scroll_duration_secs(30, 100) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_scroll_duration_floor() {
        assert_eq!(scroll_duration_secs(1, 100), 5.0);
        assert_eq!(scroll_duration_secs(0, 30), 5.0);
    }

    #[test]
    fn test_zero_speed_does_not_divide_by_zero() {
        assert!(scroll_duration_secs(30, 0).is_finite());
    }
}
