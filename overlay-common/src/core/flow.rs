//! Phase-timeline derivation: which phase is live right now.

use super::Timeline;

/// Derived phase-timeline state, recomputed on every tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowSnapshot {
    /// Id of the phase currently in progress (`"0"` for an empty timeline).
    pub current_phase_id: String,
    /// Ids of fully elapsed phases, in phase order.
    ///
    /// The final phase never appears here: once its end passes it stays
    /// current with a remaining of 0 so the last node keeps its highlight,
    /// while `is_completed` flips independently.
    pub completed_phase_ids: Vec<String>,
    /// Seconds left in the current phase. Before the start this counts the
    /// remaining pre-roll plus the whole first phase.
    pub current_phase_remaining: u64,
    pub is_last_phase: bool,
    /// True once the total elapsed time reaches the sum of all durations.
    pub is_completed: bool,
}

impl FlowSnapshot {
    pub fn compute(timeline: &Timeline, now_ms: i64) -> Self {
        let phases = &timeline.phases;
        let elapsed_total = (now_ms - timeline.start_time).div_euclid(1000);

        // Not started yet: the first phase is current and its countdown
        // runs through the pre-roll plus the phase itself.
        if elapsed_total < 0 {
            let first = phases.first();
            return Self {
                current_phase_id: first.map_or_else(|| "0".to_string(), |p| p.id.clone()),
                completed_phase_ids: Vec::new(),
                current_phase_remaining: elapsed_total.unsigned_abs()
                    + first.map_or(0, |p| p.duration),
                is_last_phase: phases.len() <= 1,
                is_completed: false,
            };
        }

        let elapsed_total = elapsed_total as u64;
        let mut accumulated = 0u64;
        let mut current_index = 0usize;
        let mut remaining = 0u64;
        for (i, phase) in phases.iter().enumerate() {
            let phase_end = accumulated + phase.duration;
            // Half-open boundary: an instant exactly on a phase end belongs
            // to the next phase, never the one ending.
            if elapsed_total < phase_end {
                current_index = i;
                remaining = phase_end - elapsed_total;
                break;
            }
            accumulated = phase_end;
            // Past the end of the last phase: pin to it with nothing left.
            if i + 1 == phases.len() {
                current_index = i;
                remaining = 0;
            }
        }

        Self {
            current_phase_id: phases
                .get(current_index)
                .map_or_else(|| "0".to_string(), |p| p.id.clone()),
            completed_phase_ids: phases[..current_index]
                .iter()
                .map(|p| p.id.clone())
                .collect(),
            current_phase_remaining: remaining,
            is_last_phase: !phases.is_empty() && current_index + 1 == phases.len(),
            is_completed: elapsed_total >= timeline.total_duration(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Phase;

    fn timeline(durations: &[u64]) -> Timeline {
        let phases = durations
            .iter()
            .enumerate()
            .map(|(i, &duration)| Phase {
                id: i.to_string(),
                name: format!("phase {i}"),
                icon: None,
                duration,
            })
            .collect();
        Timeline::new(0, phases)
    }

    #[test]
    fn test_first_phase_mid_flight() {
        // A=60s, B=120s, C=60s at t=30s
        let snap = FlowSnapshot::compute(&timeline(&[60, 120, 60]), 30_000);
        assert_eq!(snap.current_phase_id, "0");
        assert!(snap.completed_phase_ids.is_empty());
        assert_eq!(snap.current_phase_remaining, 30);
        assert!(!snap.is_last_phase);
        assert!(!snap.is_completed);
    }

    #[test]
    fn test_second_phase_mid_flight() {
        // Same plan at t=95s: inside B (60..180), 85s left in it
        let snap = FlowSnapshot::compute(&timeline(&[60, 120, 60]), 95_000);
        assert_eq!(snap.current_phase_id, "1");
        assert_eq!(snap.completed_phase_ids, vec!["0".to_string()]);
        assert_eq!(snap.current_phase_remaining, 85);
        assert!(!snap.is_last_phase);
    }

    #[test]
    fn test_boundary_belongs_to_next_phase() {
        // Exactly at A's end the current phase is already B.
        let snap = FlowSnapshot::compute(&timeline(&[60, 120]), 60_000);
        assert_eq!(snap.current_phase_id, "1");
        assert_eq!(snap.completed_phase_ids, vec!["0".to_string()]);
        assert_eq!(snap.current_phase_remaining, 120);
    }

    #[test]
    fn test_not_yet_started() {
        let mut t = timeline(&[60, 120]);
        t.start_time = 40_000;
        let snap = FlowSnapshot::compute(&t, 0);
        assert_eq!(snap.current_phase_id, "0");
        assert!(snap.completed_phase_ids.is_empty());
        // 40s of pre-roll plus the whole first phase
        assert_eq!(snap.current_phase_remaining, 100);
        assert!(!snap.is_last_phase);
        assert!(!snap.is_completed);
    }

    #[test]
    fn test_not_yet_started_single_phase_is_last() {
        let mut t = timeline(&[60]);
        t.start_time = 10_000;
        let snap = FlowSnapshot::compute(&t, 0);
        assert!(snap.is_last_phase);
    }

    #[test]
    fn test_last_phase_pinned_after_end() {
        // Far past the grand total: last phase stays current, remaining 0,
        // and it never joins the completed set.
        let snap = FlowSnapshot::compute(&timeline(&[60, 120, 60]), 1_000_000);
        assert_eq!(snap.current_phase_id, "2");
        assert_eq!(
            snap.completed_phase_ids,
            vec!["0".to_string(), "1".to_string()]
        );
        assert_eq!(snap.current_phase_remaining, 0);
        assert!(snap.is_last_phase);
        assert!(snap.is_completed);
    }

    #[test]
    fn test_completion_is_independent_of_pinning() {
        // Exactly at the grand total the walk pins the last phase while the
        // completion check flips on its own.
        let snap = FlowSnapshot::compute(&timeline(&[60, 60]), 120_000);
        assert_eq!(snap.current_phase_id, "1");
        assert_eq!(snap.current_phase_remaining, 0);
        assert!(snap.is_completed);
        assert_eq!(snap.completed_phase_ids, vec!["0".to_string()]);
    }

    #[test]
    fn test_zero_duration_phase_is_skipped() {
        // B has no duration: its end equals its start, so it is never
        // current for any instant inside A or C.
        let t = timeline(&[60, 0, 60]);
        let snap = FlowSnapshot::compute(&t, 30_000);
        assert_eq!(snap.current_phase_id, "0");
        let snap = FlowSnapshot::compute(&t, 60_000);
        assert_eq!(snap.current_phase_id, "2");
        assert_eq!(
            snap.completed_phase_ids,
            vec!["0".to_string(), "1".to_string()]
        );
        let snap = FlowSnapshot::compute(&t, 90_000);
        assert_eq!(snap.current_phase_id, "2");
    }

    #[test]
    fn test_zero_duration_final_phase() {
        // A zero-duration phase can still be current when it is the last
        // one and everything before it is exhausted.
        let snap = FlowSnapshot::compute(&timeline(&[60, 0]), 60_000);
        assert_eq!(snap.current_phase_id, "1");
        assert_eq!(snap.current_phase_remaining, 0);
        assert!(snap.is_last_phase);
        assert!(snap.is_completed);
    }

    #[test]
    fn test_empty_timeline() {
        let snap = FlowSnapshot::compute(&timeline(&[]), 5_000);
        assert_eq!(snap.current_phase_id, "0");
        assert!(snap.completed_phase_ids.is_empty());
        assert!(!snap.is_last_phase);
        assert!(snap.is_completed);

        let mut t = timeline(&[]);
        t.start_time = 10_000;
        let snap = FlowSnapshot::compute(&t, 0);
        assert_eq!(snap.current_phase_id, "0");
        assert_eq!(snap.current_phase_remaining, 10);
        assert!(snap.is_last_phase);
        assert!(!snap.is_completed);
    }

    #[test]
    fn test_monotonic_progression() {
        // As time only moves forward, the completed set only grows and the
        // current index only advances.
        let t = timeline(&[30, 0, 45, 60]);
        let mut last_completed = 0;
        let mut last_index = 0;
        for now in (-20_000..200_000).step_by(1_000) {
            let snap = FlowSnapshot::compute(&t, now);
            let index: usize = snap.current_phase_id.parse().unwrap();
            assert!(snap.completed_phase_ids.len() >= last_completed);
            assert!(index >= last_index);
            last_completed = snap.completed_phase_ids.len();
            last_index = index;
        }
    }

    #[test]
    fn test_idempotent() {
        let t = timeline(&[60, 120, 60]);
        assert_eq!(
            FlowSnapshot::compute(&t, 95_000),
            FlowSnapshot::compute(&t, 95_000)
        );
    }
}
