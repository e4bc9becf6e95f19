//! Phase and timeline data model.

use serde::{Deserialize, Serialize};

/// One named segment of a live event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    /// Stable identifier, unique within a timeline. Assigned `"0"`, `"1"`, …
    /// by position at configuration time.
    pub id: String,
    /// Display label.
    pub name: String,
    /// Optional display glyph, handed to the presentation untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Planned length in seconds. Absent means 0.
    #[serde(default)]
    pub duration: u64,
}

/// An ordered sequence of phases anchored to a start instant.
///
/// Immutable once constructed: snapshots are re-derived from it on every
/// tick, never patched in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    /// Epoch milliseconds.
    pub start_time: i64,
    pub phases: Vec<Phase>,
}

impl Timeline {
    pub fn new(start_time: i64, phases: Vec<Phase>) -> Self {
        Self { start_time, phases }
    }

    /// Sum of the per-phase durations, in seconds.
    pub fn total_duration(&self) -> u64 {
        self.phases.iter().map(|p| p.duration).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phase(id: &str, duration: u64) -> Phase {
        Phase {
            id: id.into(),
            name: format!("phase {id}"),
            icon: None,
            duration,
        }
    }

    #[test]
    fn test_total_duration() {
        let timeline = Timeline::new(0, vec![phase("0", 60), phase("1", 120), phase("2", 0)]);
        assert_eq!(timeline.total_duration(), 180);
    }

    #[test]
    fn test_total_duration_empty() {
        assert_eq!(Timeline::new(0, Vec::new()).total_duration(), 0);
    }
}
