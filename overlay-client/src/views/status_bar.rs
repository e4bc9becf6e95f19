//! Status bar overlay.

use std::cell::RefCell;
use std::rc::Rc;

use overlay_common::config::Params;
use overlay_common::live::{LiveEvent, StatusData};
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement};

use crate::dom;
use crate::net::{DataSource, SourceMode};
use crate::tick::Interval;
use crate::views::TICK_MS;

const DEFAULT_LABEL: &str = "状态";
const DEFAULT_VALUE: &str = "在线";

struct StatusState {
    icon_el: HtmlElement,
    label_el: HtmlElement,
    value_el: HtmlElement,
    source: Option<DataSource>,
}

impl StatusState {
    fn apply(&self, data: &StatusData) {
        match &data.icon {
            Some(icon) => {
                self.icon_el.set_text_content(Some(icon));
                let _ = self.icon_el.style().set_property("display", "inline");
            }
            None => {
                self.icon_el.set_text_content(None);
                let _ = self.icon_el.style().set_property("display", "none");
            }
        }
        self.label_el.set_text_content(Some(&format!("{}:", data.label)));
        self.value_el.set_text_content(Some(&data.value));
    }
}

/// Status bar view; configured from `label`, `value` and `icon` parameters.
#[wasm_bindgen]
pub struct StatusBarView {
    root: Element,
    state: Rc<RefCell<StatusState>>,
    _interval: Interval,
}

#[wasm_bindgen]
impl StatusBarView {
    #[wasm_bindgen(constructor)]
    pub fn new(root_id: &str) -> Result<StatusBarView, JsValue> {
        console_error_panic_hook::set_once();
        let params = dom::query_params()?;
        Self::with_params(root_id, &params)
    }

    /// Connect a live source; `status` events replace the displayed values.
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

impl StatusBarView {
    pub fn with_params(root_id: &str, params: &Params) -> Result<StatusBarView, JsValue> {
        let root = dom::root(root_id)?;
        root.set_inner_html("");

        let bar = dom::styled_child(
            &root,
            "div",
            "display:inline-flex;align-items:center;gap:8px;padding:8px 16px;\
             background:rgba(0,0,0,0.6);border-radius:8px;color:#fff;\
             font-family:system-ui,sans-serif;font-size:16px;",
        )?;
        let icon_el = dom::styled_child(&bar, "span", "font-size:18px;")?;
        let label_el = dom::styled_child(&bar, "span", "color:rgba(255,255,255,0.7);")?;
        let value_el = dom::styled_child(&bar, "span", "font-weight:bold;")?;

        let initial = StatusData {
            label: params.get("label").unwrap_or(DEFAULT_LABEL).to_string(),
            value: params.get("value").unwrap_or(DEFAULT_VALUE).to_string(),
            icon: params
                .get("icon")
                .filter(|icon| !icon.is_empty())
                .map(|icon| icon.to_string()),
        };

        let state = Rc::new(RefCell::new(StatusState {
            icon_el,
            label_el,
            value_el,
            source: None,
        }));
        state.borrow().apply(&initial);

        let interval = {
            let state = Rc::clone(&state);
            Interval::new(TICK_MS, move || {
                let state = state.borrow();
                let events = state
                    .source
                    .as_ref()
                    .map(|source| source.drain())
                    .unwrap_or_default();
                for event in events {
                    if let LiveEvent::Status(data) = event {
                        state.apply(&data);
                    }
                }
            })?
        };

        Ok(StatusBarView {
            root,
            state,
            _interval: interval,
        })
    }
}

impl Drop for StatusBarView {
    fn drop(&mut self) {
        self.root.set_inner_html("");
    }
}
