//! Overlay views, one per route.

mod clock;
pub use clock::ClockView;

mod home;
pub use home::render_home;

mod message_box;
pub use message_box::MessageBoxView;

mod progress;
pub use progress::ProgressView;

mod status_bar;
pub use status_bar::StatusBarView;

mod ticker;
pub use ticker::TickerView;

/// Snapshot recomputation period.
pub const TICK_MS: u32 = 1_000;
