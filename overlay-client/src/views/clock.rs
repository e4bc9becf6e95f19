//! Wall-clock overlay.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::Local;
use overlay_common::config::Params;
use overlay_common::core::{ClockFormat, ClockStrings, DateStyle};
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement};

use crate::dom;
use crate::tick::Interval;
use crate::views::TICK_MS;

const DEFAULT_FONT_SIZE: u32 = 48;
const DEFAULT_BG_OPACITY: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Vertical,
    Horizontal,
    Compact,
}

impl Layout {
    fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("horizontal") => Self::Horizontal,
            Some("compact") => Self::Compact,
            _ => Self::Vertical,
        }
    }
}

struct ClockState {
    time_el: HtmlElement,
    date_el: Option<HtmlElement>,
    weekday_el: Option<HtmlElement>,
    /// Compact layout folds date and weekday into one line.
    combined_el: Option<HtmlElement>,
    show_date: bool,
    show_weekday: bool,
    format: ClockFormat,
}

impl ClockState {
    fn paint(&self) {
        let strings = ClockStrings::compute(&Local::now(), &self.format);
        self.time_el.set_text_content(Some(&strings.time));
        if let Some(el) = &self.date_el {
            el.set_text_content(Some(&strings.date));
        }
        if let Some(el) = &self.weekday_el {
            el.set_text_content(Some(&strings.weekday));
        }
        if let Some(el) = &self.combined_el {
            let mut parts = Vec::new();
            if self.show_date {
                parts.push(strings.date.as_str());
            }
            if self.show_weekday {
                parts.push(strings.weekday.as_str());
            }
            el.set_text_content(Some(&parts.join(" ")));
        }
    }
}

/// Clock view; configured from `seconds`, `date`, `weekday`, `shortWeekday`,
/// `layout`, `dateFormat`, `fontSize` and `bgOpacity` parameters.
#[wasm_bindgen]
pub struct ClockView {
    root: Element,
    _state: Rc<RefCell<ClockState>>,
    _interval: Interval,
}

#[wasm_bindgen]
impl ClockView {
    #[wasm_bindgen(constructor)]
    pub fn new(root_id: &str) -> Result<ClockView, JsValue> {
        console_error_panic_hook::set_once();
        let params = dom::query_params()?;
        Self::with_params(root_id, &params)
    }
}

impl ClockView {
    pub fn with_params(root_id: &str, params: &Params) -> Result<ClockView, JsValue> {
        let show_date = params.get("date") != Some("false");
        let show_weekday = params.get("weekday") != Some("false");
        let format = ClockFormat {
            show_seconds: params.get("seconds") != Some("false"),
            short_weekday: params.get("shortWeekday") == Some("true"),
            date_style: match params.get("dateFormat") {
                Some("slash") => DateStyle::Slash,
                _ => DateStyle::Cn,
            },
        };
        let layout = Layout::parse(params.get("layout"));
        let font_size = params
            .get("fontSize")
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_FONT_SIZE);
        let bg_opacity = params
            .get("bgOpacity")
            .and_then(|raw| raw.parse::<u32>().ok())
            .unwrap_or(DEFAULT_BG_OPACITY)
            .min(100);

        let root = dom::root(root_id)?;
        root.set_inner_html("");

        let direction = if layout == Layout::Horizontal {
            "row"
        } else {
            "column"
        };
        let container = dom::styled_child(
            &root,
            "div",
            &format!(
                "display:inline-flex;flex-direction:{direction};align-items:center;\
                 gap:{};padding:24px 32px;border-radius:8px;\
                 background:rgba(0,0,0,{:.2});color:#fff;\
                 font-family:system-ui,sans-serif;",
                if layout == Layout::Horizontal { "24px" } else { "8px" },
                f64::from(bg_opacity) / 100.0,
            ),
        )?;

        let time_el = dom::styled_child(
            &container,
            "div",
            &format!(
                "font-size:{font_size}px;font-weight:bold;\
                 font-variant-numeric:tabular-nums;letter-spacing:0.05em;"
            ),
        )?;

        let mut date_el = None;
        let mut weekday_el = None;
        let mut combined_el = None;
        match layout {
            Layout::Compact => {
                if show_date || show_weekday {
                    combined_el = Some(dom::styled_child(
                        &container,
                        "div",
                        "font-size:18px;color:rgba(255,255,255,0.8);",
                    )?);
                }
            }
            Layout::Vertical | Layout::Horizontal => {
                let details: HtmlElement = if layout == Layout::Horizontal {
                    if show_date || show_weekday {
                        dom::styled_child(
                            &container,
                            "div",
                            "border-left:1px solid rgba(255,255,255,0.3);\
                             padding-left:24px;display:flex;\
                             flex-direction:column;gap:4px;",
                        )?
                    } else {
                        container.clone()
                    }
                } else {
                    container.clone()
                };
                if show_date {
                    date_el = Some(dom::styled_child(
                        &details,
                        "div",
                        "font-size:20px;color:rgba(255,255,255,0.8);",
                    )?);
                }
                if show_weekday {
                    weekday_el = Some(dom::styled_child(
                        &details,
                        "div",
                        "font-size:18px;color:rgba(255,255,255,0.7);",
                    )?);
                }
            }
        }

        let state = Rc::new(RefCell::new(ClockState {
            time_el,
            date_el,
            weekday_el,
            combined_el,
            show_date,
            show_weekday,
            format,
        }));
        state.borrow().paint();

        let interval = {
            let state = Rc::clone(&state);
            Interval::new(TICK_MS, move || state.borrow().paint())?
        };

        Ok(ClockView {
            root,
            _state: state,
            _interval: interval,
        })
    }
}

impl Drop for ClockView {
    fn drop(&mut self) {
        self.root.set_inner_html("");
    }
}
