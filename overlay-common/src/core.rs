mod clock;
pub use clock::{ClockFormat, ClockStrings, DateStyle};

mod flow;
pub use flow::FlowSnapshot;

mod format;
pub use format::{format_compact, format_hms};

mod phase;
pub use phase::{Phase, Timeline};

mod progress;
pub use progress::TimeProgress;
