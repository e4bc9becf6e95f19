//! Live-data transport: a reconnecting WebSocket or a polling loop.
//!
//! Either mode pushes decoded [`LiveEvent`]s into an inbox the owning view
//! drains on its tick. Dropping the [`DataSource`] closes the socket and
//! cancels every timer it scheduled.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use log::{info, warn};
use overlay_common::live::{LiveEvent, ping_frame};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{CloseEvent, ErrorEvent, MessageEvent, Response, WebSocket};

use crate::tick::{Interval, Timeout};

/// Heartbeat period for WebSocket sources.
const HEARTBEAT_MS: u32 = 30_000;
/// Polling period when the caller does not pick one.
pub const DEFAULT_POLL_MS: u32 = 5_000;

/// Reconnect delay: exponential backoff capped at 30 s.
fn backoff_delay_ms(attempts: u32) -> u32 {
    let delay = 1000u64 << attempts.min(15);
    delay.min(30_000) as u32
}

/// How a view's live data arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    WebSocket,
    Polling { interval_ms: u32 },
}

impl SourceMode {
    /// Mode from the optional `polling_ms` argument the views expose to JS:
    /// absent means WebSocket, 0 selects the default polling period.
    pub fn from_polling_ms(polling_ms: Option<u32>) -> Self {
        match polling_ms {
            None => Self::WebSocket,
            Some(0) => Self::Polling {
                interval_ms: DEFAULT_POLL_MS,
            },
            Some(interval_ms) => Self::Polling { interval_ms },
        }
    }
}

struct Shared {
    inbox: RefCell<VecDeque<LiveEvent>>,
    connected: Cell<bool>,
    /// Set on teardown; stops reconnects and in-flight fetches.
    closed: Cell<bool>,
}

/// One WebSocket attempt. Handlers are struct fields so they stay alive
/// for as long as the socket can still fire them.
struct WsConn {
    ws: WebSocket,
    _onopen: Closure<dyn FnMut()>,
    _onmessage: Closure<dyn FnMut(MessageEvent)>,
    _onerror: Closure<dyn FnMut(ErrorEvent)>,
    _onclose: Closure<dyn FnMut(CloseEvent)>,
}

impl WsConn {
    fn detach(&self) {
        self.ws.set_onopen(None);
        self.ws.set_onmessage(None);
        self.ws.set_onerror(None);
        self.ws.set_onclose(None);
    }
}

struct WsState {
    url: String,
    attempts: Cell<u32>,
    conn: RefCell<Option<WsConn>>,
    heartbeat: RefCell<Option<Interval>>,
    reconnect: RefCell<Option<Timeout>>,
}

pub struct DataSource {
    shared: Rc<Shared>,
    ws: Option<Rc<WsState>>,
    _poll: Option<Interval>,
}

impl DataSource {
    /// Open a source and start delivering events.
    pub fn connect(url: &str, mode: SourceMode) -> Result<Self, JsValue> {
        let shared = Rc::new(Shared {
            inbox: RefCell::new(VecDeque::new()),
            connected: Cell::new(false),
            closed: Cell::new(false),
        });
        match mode {
            SourceMode::WebSocket => {
                let state = Rc::new(WsState {
                    url: url.to_string(),
                    attempts: Cell::new(0),
                    conn: RefCell::new(None),
                    heartbeat: RefCell::new(None),
                    reconnect: RefCell::new(None),
                });
                open_socket(&state, &shared)?;
                Ok(Self {
                    shared,
                    ws: Some(state),
                    _poll: None,
                })
            }
            SourceMode::Polling { interval_ms } => {
                // Fetch once right away, then on every period.
                poll_once(url.to_string(), Rc::clone(&shared));
                let poll = {
                    let url = url.to_string();
                    let shared = Rc::clone(&shared);
                    Interval::new(interval_ms, move || {
                        poll_once(url.clone(), Rc::clone(&shared));
                    })?
                };
                Ok(Self {
                    shared,
                    ws: None,
                    _poll: Some(poll),
                })
            }
        }
    }

    /// Take every event received since the last drain.
    pub fn drain(&self) -> Vec<LiveEvent> {
        self.shared.inbox.borrow_mut().drain(..).collect()
    }

    pub fn is_connected(&self) -> bool {
        self.shared.connected.get()
    }
}

impl Drop for DataSource {
    fn drop(&mut self) {
        self.shared.closed.set(true);
        if let Some(state) = &self.ws {
            state.heartbeat.borrow_mut().take();
            state.reconnect.borrow_mut().take();
            if let Some(conn) = state.conn.borrow_mut().take() {
                conn.detach();
                let _ = conn.ws.close();
            }
        }
    }
}

fn open_socket(state: &Rc<WsState>, shared: &Rc<Shared>) -> Result<(), JsValue> {
    let ws = WebSocket::new(&state.url)?;

    let onopen = {
        let state = Rc::clone(state);
        let shared = Rc::clone(shared);
        Closure::wrap(Box::new(move || {
            info!("data source connected: {}", state.url);
            shared.connected.set(true);
            state.attempts.set(0);
            let heartbeat = {
                let state = Rc::clone(&state);
                Interval::new(HEARTBEAT_MS, move || {
                    if let Some(conn) = &*state.conn.borrow() {
                        if conn.ws.ready_state() == WebSocket::OPEN {
                            let _ = conn.ws.send_with_str(ping_frame());
                        }
                    }
                })
            };
            match heartbeat {
                Ok(heartbeat) => *state.heartbeat.borrow_mut() = Some(heartbeat),
                Err(err) => warn!("failed to start heartbeat: {err:?}"),
            }
        }) as Box<dyn FnMut()>)
    };
    ws.set_onopen(Some(onopen.as_ref().unchecked_ref()));

    let onmessage = {
        let shared = Rc::clone(shared);
        Closure::wrap(Box::new(move |e: MessageEvent| {
            let Some(text) = e.data().as_string() else {
                return;
            };
            match LiveEvent::decode(&text) {
                Ok(LiveEvent::Pong) => {}
                Ok(event) => shared.inbox.borrow_mut().push_back(event),
                Err(err) => warn!("dropping malformed frame: {err:#}"),
            }
        }) as Box<dyn FnMut(MessageEvent)>)
    };
    ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));

    let onerror = Closure::wrap(Box::new(move |_e: ErrorEvent| {
        warn!("data source socket error");
    }) as Box<dyn FnMut(ErrorEvent)>);
    ws.set_onerror(Some(onerror.as_ref().unchecked_ref()));

    let onclose = {
        let state = Rc::clone(state);
        let shared = Rc::clone(shared);
        Closure::wrap(Box::new(move |e: CloseEvent| {
            shared.connected.set(false);
            state.heartbeat.borrow_mut().take();
            if shared.closed.get() {
                return;
            }
            let attempts = state.attempts.get();
            let delay = backoff_delay_ms(attempts);
            state.attempts.set(attempts + 1);
            info!("socket closed (code {}), reconnecting in {delay} ms", e.code());
            let timeout = {
                let state = Rc::clone(&state);
                let shared = Rc::clone(&shared);
                Timeout::new(delay, move || {
                    if shared.closed.get() {
                        return;
                    }
                    if let Err(err) = open_socket(&state, &shared) {
                        warn!("reconnect failed: {err:?}");
                    }
                })
            };
            match timeout {
                Ok(timeout) => *state.reconnect.borrow_mut() = Some(timeout),
                Err(err) => warn!("failed to schedule reconnect: {err:?}"),
            }
        }) as Box<dyn FnMut(CloseEvent)>)
    };
    ws.set_onclose(Some(onclose.as_ref().unchecked_ref()));

    // Replace (and detach) the previous attempt's socket, if any. Its
    // onclose already ran, so nothing of it is still executing.
    if let Some(old) = state.conn.borrow_mut().take() {
        old.detach();
    }
    *state.conn.borrow_mut() = Some(WsConn {
        ws,
        _onopen: onopen,
        _onmessage: onmessage,
        _onerror: onerror,
        _onclose: onclose,
    });
    Ok(())
}

fn poll_once(url: String, shared: Rc<Shared>) {
    if shared.closed.get() {
        return;
    }
    spawn_local(async move {
        match fetch_event(&url).await {
            Ok(event) => {
                if shared.closed.get() {
                    return;
                }
                shared.connected.set(true);
                if !matches!(event, LiveEvent::Pong) {
                    shared.inbox.borrow_mut().push_back(event);
                }
            }
            Err(err) => {
                shared.connected.set(false);
                warn!("poll failed: {err:?}");
            }
        }
    });
}

async fn fetch_event(url: &str) -> Result<LiveEvent, JsValue> {
    let window = web_sys::window().ok_or("no global `window` exists")?;
    let resp_value = JsFuture::from(window.fetch_with_str(url)).await?;
    let resp: Response = resp_value.dyn_into()?;
    if !resp.ok() {
        return Err(JsValue::from_str(&format!(
            "fetch failed: {}",
            resp.status_text()
        )));
    }
    let text = JsFuture::from(resp.text()?).await?;
    let text = text.as_string().ok_or("response body is not text")?;
    LiveEvent::decode(&text).map_err(|err| JsValue::from_str(&format!("{err:#}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_mode_from_polling_ms() {
        assert_eq!(SourceMode::from_polling_ms(None), SourceMode::WebSocket);
        assert_eq!(
            SourceMode::from_polling_ms(Some(0)),
            SourceMode::Polling {
                interval_ms: DEFAULT_POLL_MS
            }
        );
        assert_eq!(
            SourceMode::from_polling_ms(Some(2_000)),
            SourceMode::Polling {
                interval_ms: 2_000
            }
        );
    }

    #[test]
    fn test_backoff_doubles_then_caps() {
        assert_eq!(backoff_delay_ms(0), 1_000);
        assert_eq!(backoff_delay_ms(1), 2_000);
        assert_eq!(backoff_delay_ms(4), 16_000);
        assert_eq!(backoff_delay_ms(5), 30_000);
        assert_eq!(backoff_delay_ms(40), 30_000);
    }
}
