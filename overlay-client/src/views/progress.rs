//! Stream progress overlay: overall time bar plus the phase flow timeline.
//!
//! Both sections are repainted from fresh snapshots on every tick; nothing
//! about the phase state is stored between ticks except the immutable
//! timeline configuration and the last externally synchronized clock
//! sample.

use std::cell::RefCell;
use std::rc::Rc;

use overlay_common::config::{self, Params};
use overlay_common::core::{FlowSnapshot, TimeProgress, Timeline, format_compact, format_hms};
use overlay_common::live::LiveEvent;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement};

use crate::dom;
use crate::net::{DataSource, SourceMode};
use crate::tick::{Interval, now_ms};
use crate::views::TICK_MS;

/// The countdown turns red inside the last 30 seconds of a phase.
const URGENT_THRESHOLD: u64 = 30;

const COLOR_COMPLETED: &str = "#22c55e";
const COLOR_CURRENT: &str = "#3b82f6";
const COLOR_URGENT: &str = "#ef4444";
const COLOR_PENDING: &str = "#6b7280";

/// Which sections are painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DisplayMode {
    Combined,
    Time,
    Flow,
}

impl DisplayMode {
    fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("time") => Self::Time,
            Some("flow") => Self::Flow,
            _ => Self::Combined,
        }
    }

    fn shows_time(self) -> bool {
        matches!(self, Self::Combined | Self::Time)
    }

    fn shows_flow(self) -> bool {
        matches!(self, Self::Combined | Self::Flow)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum PhaseStatus {
    Completed,
    Current,
    Pending,
}

struct TimeBar {
    elapsed_el: HtmlElement,
    total_el: HtmlElement,
    fill_el: HtmlElement,
    percent_el: HtmlElement,
}

struct FlowNode {
    circle_el: HtmlElement,
    name_el: HtmlElement,
    countdown_el: HtmlElement,
    /// Connector towards the next node; the last node has none.
    connector_el: Option<HtmlElement>,
    icon: Option<String>,
}

struct ProgressState {
    timeline: Timeline,
    time_bar: Option<TimeBar>,
    nodes: Vec<FlowNode>,
    /// Latest externally synchronized clock sample, epoch ms.
    current_time: Option<i64>,
    source: Option<DataSource>,
}

impl ProgressState {
    fn paint(&self, now: i64) {
        if let Some(bar) = &self.time_bar {
            let progress = TimeProgress::compute(
                self.timeline.start_time,
                self.timeline.total_duration(),
                self.current_time,
                now,
            );
            bar.elapsed_el
                .set_text_content(Some(&format_hms(progress.elapsed as i64)));
            let _ = bar.elapsed_el.style().set_property(
                "color",
                if progress.overtime { COLOR_URGENT } else { "#fff" },
            );
            bar.total_el.set_text_content(Some(&format_hms(
                self.timeline.total_duration() as i64,
            )));
            let _ = bar
                .fill_el
                .style()
                .set_property("width", &format!("{:.2}%", progress.percent));
            let _ = bar.fill_el.style().set_property(
                "background",
                if progress.overtime {
                    COLOR_URGENT
                } else {
                    "linear-gradient(to right, #2563eb, #60a5fa)"
                },
            );
            bar.percent_el
                .set_text_content(Some(&format!("{}%", progress.percent.round() as i64)));
        }

        if !self.nodes.is_empty() {
            // The flow walk always follows local wall-clock; only the time
            // bar honors the synchronized sample.
            let snapshot = FlowSnapshot::compute(&self.timeline, now);
            let urgent = snapshot.current_phase_remaining <= URGENT_THRESHOLD
                && snapshot.current_phase_remaining > 0;

            for (node, phase) in self.nodes.iter().zip(&self.timeline.phases) {
                let status = if phase.id == snapshot.current_phase_id {
                    PhaseStatus::Current
                } else if snapshot.completed_phase_ids.contains(&phase.id) {
                    PhaseStatus::Completed
                } else {
                    PhaseStatus::Pending
                };
                node.apply(status, &snapshot, urgent);
            }
        }
    }
}

impl FlowNode {
    fn apply(&self, status: PhaseStatus, snapshot: &FlowSnapshot, urgent: bool) {
        let accent = match status {
            PhaseStatus::Completed => COLOR_COMPLETED,
            PhaseStatus::Current if urgent => COLOR_URGENT,
            PhaseStatus::Current => COLOR_CURRENT,
            PhaseStatus::Pending => COLOR_PENDING,
        };

        let glyph = match status {
            PhaseStatus::Completed => "✓",
            PhaseStatus::Current => self.icon.as_deref().unwrap_or("●"),
            PhaseStatus::Pending => "○",
        };
        self.circle_el.set_text_content(Some(glyph));
        let style = self.circle_el.style();
        match status {
            PhaseStatus::Pending => {
                let _ = style.set_property("background", "transparent");
                let _ = style.set_property("color", COLOR_PENDING);
            }
            _ => {
                let _ = style.set_property("background", accent);
                let _ = style.set_property("color", "#fff");
            }
        }
        let _ = style.set_property("border-color", accent);

        let _ = self.name_el.style().set_property("color", accent);
        let _ = self.name_el.style().set_property(
            "font-weight",
            if status == PhaseStatus::Current {
                "bold"
            } else {
                "normal"
            },
        );

        // Only the current node shows its countdown.
        if status == PhaseStatus::Current {
            self.countdown_el.set_text_content(Some(&format_compact(
                snapshot.current_phase_remaining as i64,
            )));
            let _ = self.countdown_el.style().set_property("color", accent);
            let _ = self
                .countdown_el
                .style()
                .set_property("visibility", "visible");
        } else {
            let _ = self
                .countdown_el
                .style()
                .set_property("visibility", "hidden");
        }

        if let Some(connector) = &self.connector_el {
            let _ = connector.style().set_property(
                "background",
                if status == PhaseStatus::Completed {
                    COLOR_COMPLETED
                } else {
                    COLOR_PENDING
                },
            );
        }
    }
}

/// Stream progress view; configured from `mode`, `startTime`, `duration`,
/// `durations`, `phases` and `icons` parameters.
#[wasm_bindgen]
pub struct ProgressView {
    root: Element,
    state: Rc<RefCell<ProgressState>>,
    _interval: Interval,
}

#[wasm_bindgen]
impl ProgressView {
    #[wasm_bindgen(constructor)]
    pub fn new(root_id: &str) -> Result<ProgressView, JsValue> {
        console_error_panic_hook::set_once();
        let params = dom::query_params()?;
        Self::with_params(root_id, &params)
    }

    /// Connect a live source; `time` events override the local clock for
    /// the time bar.
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

impl ProgressView {
    pub fn with_params(root_id: &str, params: &Params) -> Result<ProgressView, JsValue> {
        let mode = DisplayMode::parse(params.get("mode"));
        let timeline = config::parse_timeline(params, now_ms());

        let root = dom::root(root_id)?;
        root.set_inner_html("");
        let container = dom::overlay_container(&root, "min-width:300px;max-width:800px;")?;

        let time_bar = if mode.shows_time() {
            Some(build_time_bar(&container)?)
        } else {
            None
        };
        let nodes = if mode.shows_flow() {
            build_flow_nodes(&container, &timeline)?
        } else {
            Vec::new()
        };

        let state = Rc::new(RefCell::new(ProgressState {
            timeline,
            time_bar,
            nodes,
            current_time: None,
            source: None,
        }));
        state.borrow().paint(now_ms());

        let interval = {
            let state = Rc::clone(&state);
            Interval::new(TICK_MS, move || {
                let mut state = state.borrow_mut();
                let events = state
                    .source
                    .as_ref()
                    .map(|source| source.drain())
                    .unwrap_or_default();
                for event in events {
                    if let LiveEvent::Time(sync) = event {
                        state.current_time = Some(sync.current_time);
                    }
                }
                state.paint(now_ms());
            })?
        };

        Ok(ProgressView {
            root,
            state,
            _interval: interval,
        })
    }
}

impl Drop for ProgressView {
    fn drop(&mut self) {
        self.root.set_inner_html("");
    }
}

fn build_time_bar(container: &HtmlElement) -> Result<TimeBar, JsValue> {
    let row = dom::styled_child(
        container,
        "div",
        "display:flex;align-items:center;gap:16px;",
    )?;

    let labels = dom::styled_child(
        &row,
        "div",
        "display:flex;align-items:center;gap:8px;\
         font-family:monospace;font-size:14px;flex-shrink:0;",
    )?;
    let elapsed_el = dom::styled_child(&labels, "span", "color:#fff;")?;
    let sep = dom::styled_child(&labels, "span", "color:rgba(255,255,255,0.5);")?;
    sep.set_text_content(Some("/"));
    let total_el = dom::styled_child(&labels, "span", "color:rgba(255,255,255,0.7);")?;

    let track = dom::styled_child(
        &row,
        "div",
        "flex:1;height:8px;background:rgba(255,255,255,0.1);\
         border-radius:9999px;overflow:hidden;",
    )?;
    let fill_el = dom::styled_child(
        &track,
        "div",
        "height:100%;border-radius:9999px;width:0%;\
         transition:width 1s linear;",
    )?;

    let percent_el = dom::styled_child(
        &row,
        "span",
        "font-family:monospace;font-size:14px;\
         color:rgba(255,255,255,0.7);flex-shrink:0;",
    )?;

    Ok(TimeBar {
        elapsed_el,
        total_el,
        fill_el,
        percent_el,
    })
}

fn build_flow_nodes(container: &HtmlElement, timeline: &Timeline) -> Result<Vec<FlowNode>, JsValue> {
    let row = dom::styled_child(
        container,
        "div",
        "display:flex;align-items:flex-start;justify-content:center;\
         flex-wrap:wrap;row-gap:16px;",
    )?;

    let mut nodes = Vec::with_capacity(timeline.phases.len());
    for (i, phase) in timeline.phases.iter().enumerate() {
        let item = dom::styled_child(&row, "div", "display:flex;align-items:flex-start;")?;
        let column = dom::styled_child(
            &item,
            "div",
            "display:flex;flex-direction:column;align-items:center;gap:4px;",
        )?;
        let circle_el = dom::styled_child(
            &column,
            "div",
            "width:32px;height:32px;border-radius:9999px;\
             display:flex;align-items:center;justify-content:center;\
             font-size:14px;border:2px solid transparent;",
        )?;
        let name_el = dom::styled_child(&column, "span", "font-size:12px;white-space:nowrap;")?;
        name_el.set_text_content(Some(&phase.name));
        let countdown_el = dom::styled_child(
            &column,
            "span",
            "font-family:monospace;font-size:14px;font-weight:bold;\
             visibility:hidden;",
        )?;

        let connector_el = if i + 1 < timeline.phases.len() {
            Some(dom::styled_child(
                &item,
                "div",
                "width:40px;height:2px;margin:15px 4px 0;",
            )?)
        } else {
            None
        };

        nodes.push(FlowNode {
            circle_el,
            name_el,
            countdown_el,
            connector_el,
            icon: phase.icon.clone(),
        });
    }
    Ok(nodes)
}
