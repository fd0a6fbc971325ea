use serde::{Deserialize, Serialize};

use crate::core::{Interval, Viewport, VisibleRange};
use crate::interaction::TooltipPhase;

/// Read-only state snapshot passed to listener hooks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ListenerContext {
    pub viewport: Viewport,
    pub visible_range: Option<VisibleRange>,
    pub dataset_len: usize,
    pub interval: Interval,
    pub loading: bool,
    pub mini: bool,
    pub expanded: bool,
    pub tooltip_phase: TooltipPhase,
}

/// Outbound signals of the chart container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ChartEvent {
    DataUpdated { points_len: usize, marks_len: usize },
    RangeChanged(VisibleRange),
    IntervalSwitchRequested(Interval),
    SnapshotRequested,
    LoadingChanged { loading: bool },
    ModeChanged { mini: bool, expanded: bool },
}

/// Observer of chart events.
///
/// Listeners see the engine state after the change that produced the event
/// and cannot mutate the engine.
pub trait ChartListener {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: ChartEvent, context: ListenerContext);
}
