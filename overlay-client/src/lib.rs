//! Stream Overlay - Browser Client
//!
//! Overlay views meant to run as independent browser sources inside a
//! streaming-production tool. Each route is a standalone view configured
//! through URL query parameters; [`mount`] dispatches on the current path.

use wasm_bindgen::prelude::*;

mod dom;
mod net;
mod tick;
mod views;

pub use views::{ClockView, MessageBoxView, ProgressView, StatusBarView, TickerView};

// For logging to JS console
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    pub(crate) fn log(s: &str);
}

#[macro_export]
macro_rules! console_log {
    ($($t:tt)*) => ($crate::log(&format_args!($($t)*).to_string()))
}

enum ActiveView {
    Ticker(TickerView),
    StatusBar(StatusBarView),
    MessageBox(MessageBoxView),
    Progress(ProgressView),
    Clock(ClockView),
    Home,
}

/// Handle to the mounted overlay. Dropping it (JS `free()`) releases the
/// view's tick and clears its DOM subtree.
#[wasm_bindgen]
pub struct Overlay {
    _view: ActiveView,
}

/// Mount the overlay matching the current location onto `root_id`.
#[wasm_bindgen]
pub fn mount(root_id: &str) -> Result<Overlay, JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let window = web_sys::window().ok_or("no global `window` exists")?;
    let path = window.location().pathname()?;
    console_log!("mounting overlay for {}", path);

    let view = match path.trim_end_matches('/') {
        "/ticker" => ActiveView::Ticker(TickerView::new(root_id)?),
        "/statusbar" => ActiveView::StatusBar(StatusBarView::new(root_id)?),
        "/message" => ActiveView::MessageBox(MessageBoxView::new(root_id)?),
        "/progress" => ActiveView::Progress(ProgressView::new(root_id)?),
        "/clock" => ActiveView::Clock(ClockView::new(root_id)?),
        _ => {
            views::render_home(root_id)?;
            ActiveView::Home
        }
    };
    Ok(Overlay { _view: view })
}
