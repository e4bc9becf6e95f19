//! Stream Overlay - Common Types & Logic
//!
//! Shared data model and pure derivation logic for the browser overlay
//! views: timeline configuration, time/phase snapshots, clock formatting,
//! and the live-data envelope protocol. Everything here is synchronous and
//! deterministic; "now" is always an argument, never an ambient read.

pub mod config;
pub mod core;
pub mod live;
