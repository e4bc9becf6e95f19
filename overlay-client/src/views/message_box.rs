//! Toast message overlay backed by a bounded queue.
//!
//! Messages arrive through the exported [`MessageBoxView::push`] method or
//! a live source; past capacity the oldest toast gives way. Expiry is
//! checked on the shared 1 s tick, so the view never schedules a timer per
//! message.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use overlay_common::live::{LiveEvent, MessageData, MessageKind};
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement};

use crate::dom;
use crate::net::{DataSource, SourceMode};
use crate::tick::{Interval, now_ms};
use crate::views::TICK_MS;

/// Most toasts kept on screen at once.
const CAPACITY: usize = 8;
/// Display time when a message does not bring its own.
const DEFAULT_DURATION_MS: u32 = 4_000;

const DEMO_CONTENT: &str = "这是一条示例消息，实际使用时通过 WebSocket 或 API 推送";
const DEMO_DURATION_MS: u32 = 5_000;

fn accent_color(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Info => "#3b82f6",
        MessageKind::Success => "#22c55e",
        MessageKind::Warning => "#f59e0b",
        MessageKind::Error => "#ef4444",
    }
}

struct Toast {
    content: String,
    kind: MessageKind,
    expires_at: i64,
}

/// The queue policy, kept free of DOM handles.
#[derive(Default)]
struct ToastQueue {
    toasts: VecDeque<Toast>,
    dirty: bool,
}

impl ToastQueue {
    fn push(&mut self, data: MessageData, now: i64) {
        if self.toasts.len() == CAPACITY {
            self.toasts.pop_front();
        }
        let ttl = data.duration.unwrap_or(DEFAULT_DURATION_MS);
        self.toasts.push_back(Toast {
            content: data.content,
            kind: data.kind,
            expires_at: now + i64::from(ttl),
        });
        self.dirty = true;
    }

    fn expire(&mut self, now: i64) {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.expires_at > now);
        if self.toasts.len() != before {
            self.dirty = true;
        }
    }
}

struct BoxState {
    container: HtmlElement,
    queue: ToastQueue,
    source: Option<DataSource>,
}

impl BoxState {
    /// Rebuild the toast stack if the queue changed since the last paint.
    fn paint(&mut self) -> Result<(), JsValue> {
        if !self.queue.dirty {
            return Ok(());
        }
        self.queue.dirty = false;
        self.container.set_inner_html("");
        for toast in &self.queue.toasts {
            let el = dom::styled_child(
                &self.container,
                "div",
                &format!(
                    "padding:10px 16px;background:rgba(0,0,0,0.75);color:#fff;\
                     border-left:4px solid {};border-radius:4px;\
                     font-family:system-ui,sans-serif;font-size:15px;",
                    accent_color(toast.kind)
                ),
            )?;
            el.set_text_content(Some(&toast.content));
        }
        Ok(())
    }
}

/// Toast box view.
#[wasm_bindgen]
pub struct MessageBoxView {
    root: Element,
    state: Rc<RefCell<BoxState>>,
    _interval: Interval,
}

#[wasm_bindgen]
impl MessageBoxView {
    #[wasm_bindgen(constructor)]
    pub fn new(root_id: &str) -> Result<MessageBoxView, JsValue> {
        console_error_panic_hook::set_once();
        let root = dom::root(root_id)?;
        root.set_inner_html("");

        let container = dom::styled_child(
            &root,
            "div",
            "display:flex;flex-direction:column;gap:8px;padding:16px;",
        )?;

        let mut initial = BoxState {
            container,
            queue: ToastQueue::default(),
            source: None,
        };
        // Demo toast so a freshly mounted box is visibly alive.
        initial.queue.push(
            MessageData {
                id: Some("demo-1".to_string()),
                content: DEMO_CONTENT.to_string(),
                kind: MessageKind::Info,
                duration: Some(DEMO_DURATION_MS),
            },
            now_ms(),
        );
        initial.paint()?;

        let state = Rc::new(RefCell::new(initial));
        let interval = {
            let state = Rc::clone(&state);
            Interval::new(TICK_MS, move || {
                let mut state = state.borrow_mut();
                let now = now_ms();
                let events = state
                    .source
                    .as_ref()
                    .map(|source| source.drain())
                    .unwrap_or_default();
                for event in events {
                    if let LiveEvent::Message(data) = event {
                        state.queue.push(data, now);
                    }
                }
                state.queue.expire(now);
                if let Err(err) = state.paint() {
                    log::warn!("message box repaint failed: {err:?}");
                }
            })?
        };

        Ok(MessageBoxView {
            root,
            state,
            _interval: interval,
        })
    }

    /// Queue a toast. Accepts `{content, type?, duration?, id?}`.
    pub fn push(&self, message: JsValue) -> Result<(), JsValue> {
        let data: MessageData = serde_wasm_bindgen::from_value(message)
            .map_err(|err| JsValue::from_str(&format!("bad message: {err}")))?;
        let mut state = self.state.borrow_mut();
        state.queue.push(data, now_ms());
        state.paint()
    }

    /// Connect a live source; `message` events are queued as toasts.
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

impl Drop for MessageBoxView {
    fn drop(&mut self) {
        self.root.set_inner_html("");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(content: &str) -> MessageData {
        MessageData {
            id: None,
            content: content.to_string(),
            kind: MessageKind::Info,
            duration: None,
        }
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut queue = ToastQueue::default();
        for i in 0..CAPACITY + 2 {
            queue.push(message(&format!("m{i}")), 0);
        }
        assert_eq!(queue.toasts.len(), CAPACITY);
        assert_eq!(queue.toasts.front().unwrap().content, "m2");
    }

    #[test]
    fn test_expiry_uses_message_duration() {
        let mut queue = ToastQueue::default();
        let mut short = message("short");
        short.duration = Some(1_000);
        queue.push(short, 10_000);
        queue.push(message("default"), 10_000);

        queue.expire(11_500);
        assert_eq!(queue.toasts.len(), 1);
        assert_eq!(queue.toasts.front().unwrap().content, "default");

        // The default ttl expires later.
        queue.expire(14_100);
        assert!(queue.toasts.is_empty());
    }

    #[test]
    fn test_expire_marks_dirty_only_on_change() {
        let mut queue = ToastQueue::default();
        queue.push(message("m"), 0);
        queue.dirty = false;
        queue.expire(1_000);
        assert!(!queue.dirty);
        queue.expire(10_000);
        assert!(queue.dirty);
    }
}
