//! Live-data protocol shared between the overlays and their transport.
//!
//! A transport (WebSocket or polling, owned by the client crate) delivers
//! JSON frames of the shape `{"type": …, "payload": …, "timestamp": …}`;
//! each decodes to one [`LiveEvent`] that a view applies on its next tick.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Scrolling ticker payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerData {
    pub text: String,
    /// Scroll speed; higher scrolls faster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<u32>,
}

/// Status bar payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusData {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Toast severity; picks the accent color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// One toast message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub content: String,
    #[serde(default, rename = "type")]
    pub kind: MessageKind,
    /// Display time in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

/// Externally synchronized clock sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSync {
    /// Epoch milliseconds.
    pub current_time: i64,
}

/// Envelope decoded from one transport frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum LiveEvent {
    Ticker(TickerData),
    Status(StatusData),
    Message(MessageData),
    Time(TimeSync),
    /// Heartbeat reply; carries nothing and is dropped by the receiver.
    Pong,
}

impl LiveEvent {
    /// Decode one JSON frame.
    pub fn decode(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("malformed live event frame")
    }
}

/// The heartbeat frame the client sends.
pub fn ping_frame() -> &'static str {
    r#"{"type":"ping"}"#
}
