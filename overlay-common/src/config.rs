//! Query-parameter parsing into a timeline configuration.
//!
//! Parsing never fails: overlays run unattended mid-broadcast, so malformed
//! or missing values degrade to the documented defaults with a warning
//! instead of surfacing an error state.

use log::warn;

use crate::core::{Phase, Timeline};

/// Total planned seconds when no duration parameter is supplied.
pub const DEFAULT_TOTAL_DURATION: u64 = 7200;
/// Seconds per phase when the `durations` list has no usable entry.
pub const FALLBACK_PHASE_DURATION: u64 = 600;

const DEFAULT_PHASE_NAMES: [&str; 3] = ["开始", "进行中", "结束"];

/// Query parameters as an ordered key/value list.
///
/// The browser client fills this from `URLSearchParams`; tests build it
/// from literals. Lookups return the first occurrence of a key.
#[derive(Debug, Clone, Default)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Build the immutable timeline configuration from query parameters.
///
/// `now_ms` resolves the `startTime=now` token (and any absent or
/// malformed start time) to the instant of parsing. Phase ids are assigned
/// `"0"`, `"1"`, … by position; `icons` entries are matched to phases by
/// position as well.
pub fn parse_timeline(params: &Params, now_ms: i64) -> Timeline {
    let start_time = match params.get("startTime") {
        None | Some("now") => now_ms,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("ignoring unparseable startTime {raw:?}, using the current instant");
            now_ms
        }),
    };

    let names: Vec<String> = match params.get("phases") {
        Some(raw) => raw.split(',').map(|s| s.trim().to_string()).collect(),
        None => DEFAULT_PHASE_NAMES.iter().map(|s| s.to_string()).collect(),
    };

    let durations = phase_durations(params, names.len());

    let icons: Vec<&str> = params
        .get("icons")
        .map(|raw| raw.split(',').map(str::trim).collect())
        .unwrap_or_default();

    let phases = names
        .into_iter()
        .enumerate()
        .map(|(i, name)| Phase {
            id: i.to_string(),
            name,
            icon: icons
                .get(i)
                .filter(|icon| !icon.is_empty())
                .map(|icon| icon.to_string()),
            duration: durations[i],
        })
        .collect();

    Timeline::new(start_time, phases)
}

/// Seconds per phase: from the `durations` minutes list when present
/// (trailing phases reuse the last listed value), otherwise an even split
/// of the `duration` total. The split floors, so the resulting total can
/// undershoot the requested one.
fn phase_durations(params: &Params, phase_count: usize) -> Vec<u64> {
    if let Some(raw) = params.get("durations") {
        let listed: Vec<u64> = raw
            .split(',')
            .filter_map(|token| {
                let token = token.trim();
                match token.parse::<u64>() {
                    Ok(minutes) => Some(minutes * 60),
                    Err(_) => {
                        warn!("ignoring unparseable durations entry {token:?}");
                        None
                    }
                }
            })
            .collect();
        return match listed.last().copied() {
            None => vec![FALLBACK_PHASE_DURATION; phase_count],
            Some(last) => (0..phase_count)
                .map(|i| listed.get(i).copied().unwrap_or(last))
                .collect(),
        };
    }

    let total = params
        .get("duration")
        .and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(total) => Some(total),
            Err(_) => {
                warn!("ignoring unparseable duration {raw:?}");
                None
            }
        })
        .unwrap_or(DEFAULT_TOTAL_DURATION);
    vec![total / phase_count as u64; phase_count]
}
