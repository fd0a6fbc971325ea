use serde::{Deserialize, Serialize};
use tracing::trace;

use super::hit_test::HitTestFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TooltipPhase {
    Idle,
    HoveringPoint,
    HoveringMark,
    /// Pointer left a marker; the mark tooltip survives until the hide timer fires.
    PendingHide,
}

/// Identity of one armed timer; a restarted timer gets a fresh handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HideTimer {
    pub handle: TimerHandle,
    pub deadline_ms: u64,
}

/// Mark tooltip anchor: which mark, and where the pointer entered it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoveredMark {
    pub mark_index: usize,
    pub x: f64,
    pub y: f64,
}

/// Public tooltip/crosshair state exposed to host applications.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TooltipState {
    /// Index into the visible slice of the point under the crosshair.
    pub hovered_point: Option<usize>,
    pub hovered_mark: Option<HoveredMark>,
    pub pointer_x: Option<f64>,
    pub pointer_y: Option<f64>,
    pub is_over_mark: bool,
    pub hide_timer: Option<HideTimer>,
}

impl TooltipState {
    #[must_use]
    pub fn crosshair(&self) -> Option<(f64, f64)> {
        self.pointer_x.zip(self.pointer_y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipConfig {
    pub hit_radius_px: f64,
    pub hide_delay_ms: u64,
    pub touch_crosshair_linger_ms: u64,
    /// Mark tooltips stay open after the pointer leaves and close only on
    /// explicit dismissal (docked mobile presentation).
    pub sticky_marks: bool,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            hit_radius_px: 12.0,
            hide_delay_ms: 300,
            touch_crosshair_linger_ms: 2_000,
            sticky_marks: false,
        }
    }
}

/// Crosshair and tooltip reducer.
///
/// All transitions are driven by explicit calls; time only advances through
/// the `now_ms` arguments and [`tick`](Self::tick).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TooltipMachine {
    config: TooltipConfig,
    state: TooltipState,
    linger_deadline_ms: Option<u64>,
    next_timer: u64,
    /// Timestamp of the latest input; hide timers armed outside an input
    /// event start from here.
    last_input_ms: u64,
}

impl TooltipMachine {
    #[must_use]
    pub fn new(config: TooltipConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn config(&self) -> TooltipConfig {
        self.config
    }

    pub fn set_config(&mut self, config: TooltipConfig) {
        self.config = config;
    }

    #[must_use]
    pub fn state(&self) -> TooltipState {
        self.state
    }

    #[must_use]
    pub fn phase(&self) -> TooltipPhase {
        if self.state.hide_timer.is_some() {
            TooltipPhase::PendingHide
        } else if self.state.hovered_mark.is_some() {
            TooltipPhase::HoveringMark
        } else if self.state.hovered_point.is_some() {
            TooltipPhase::HoveringPoint
        } else {
            TooltipPhase::Idle
        }
    }

    #[must_use]
    pub fn linger_deadline_ms(&self) -> Option<u64> {
        self.linger_deadline_ms
    }

    /// Handles a pointer move in outer coordinates. Returns `true` on any state change.
    pub fn pointer_move(
        &mut self,
        x: f64,
        y: f64,
        now_ms: u64,
        dragging: bool,
        frame: HitTestFrame<'_>,
    ) -> bool {
        let before = self.state;
        self.linger_deadline_ms = None;
        self.last_input_ms = now_ms;

        if !frame.plot.contains(x, y) {
            self.clear_crosshair();
            if self.state.is_over_mark {
                self.leave_mark(now_ms);
            }
            return self.state != before;
        }
        if dragging || frame.slice.is_empty() {
            return false;
        }

        self.state.pointer_x = Some(x);
        self.state.pointer_y = Some(y);
        self.state.hovered_point = frame.point_at(x);

        match frame.marker_at(x, y, self.config.hit_radius_px) {
            Some(anchor) => self.enter_mark(anchor.mark_index, x, y),
            None if self.state.is_over_mark => self.leave_mark(now_ms),
            None => {}
        }
        self.state != before
    }

    /// Touch contact at `(x, y)`: the crosshair follows the finger even while
    /// it drags, and touching a marker opens its tooltip.
    pub fn touch_point(&mut self, x: f64, y: f64, now_ms: u64, frame: HitTestFrame<'_>) -> bool {
        let before = self.state;
        self.linger_deadline_ms = None;
        self.last_input_ms = now_ms;
        if !frame.plot.contains(x, y) || frame.slice.is_empty() {
            return false;
        }
        self.state.pointer_x = Some(x);
        self.state.pointer_y = Some(y);
        self.state.hovered_point = frame.point_at(x);
        match frame.marker_at(x, y, self.config.hit_radius_px) {
            Some(anchor) => self.enter_mark(anchor.mark_index, x, y),
            None if self.state.is_over_mark => self.leave_mark(now_ms),
            None => {}
        }
        self.state != before
    }

    /// Pointer left the plot. The crosshair clears at once; an open mark
    /// tooltip follows its own grace period.
    pub fn pointer_leave(&mut self, now_ms: u64) -> bool {
        let before = self.state;
        self.linger_deadline_ms = None;
        self.last_input_ms = now_ms;
        self.clear_crosshair();
        if self.state.is_over_mark {
            self.leave_mark(now_ms);
        }
        self.state != before
    }

    /// Pointer entered the floating mark tooltip; a pending hide is cancelled.
    pub fn tooltip_enter(&mut self) -> bool {
        self.cancel_hide_timer()
    }

    /// Pointer left the floating mark tooltip; it hides immediately.
    pub fn tooltip_leave(&mut self) -> bool {
        self.dismiss_mark()
    }

    /// Closes the mark tooltip regardless of phase.
    pub fn dismiss_mark(&mut self) -> bool {
        let before = self.state;
        self.state.hide_timer = None;
        self.state.hovered_mark = None;
        self.state.is_over_mark = false;
        self.state != before
    }

    /// Touch ended: keep the crosshair for the linger period.
    pub fn touch_end(&mut self, now_ms: u64) {
        self.last_input_ms = now_ms;
        if self.state.crosshair().is_some() {
            self.linger_deadline_ms =
                Some(now_ms.saturating_add(self.config.touch_crosshair_linger_ms));
        }
    }

    /// Fires expired timers. Returns `true` when visible state changed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let mut changed = false;
        self.last_input_ms = self.last_input_ms.max(now_ms);
        if let Some(timer) = self.state.hide_timer
            && now_ms >= timer.deadline_ms
        {
            trace!(handle = timer.handle.0, "mark tooltip hide timer expired");
            self.state.hide_timer = None;
            self.state.hovered_mark = None;
            changed = true;
        }
        if let Some(deadline) = self.linger_deadline_ms
            && now_ms >= deadline
        {
            self.linger_deadline_ms = None;
            self.clear_crosshair();
            changed = true;
        }
        changed
    }

    /// Drops all hover state and pending timers.
    pub fn reset(&mut self) -> bool {
        let before = self.state;
        self.state = TooltipState::default();
        self.linger_deadline_ms = None;
        self.state != before
    }

    /// Re-derives hover state after the visible slice changed underneath it.
    ///
    /// The hovered point and the marker under a stationary pointer are looked
    /// up again from the pointer position; a mark tooltip whose mark is no
    /// longer laid out is dropped. Marker proximity is left alone while the
    /// pointer drags.
    pub fn revalidate(&mut self, frame: HitTestFrame<'_>, dragging: bool) -> bool {
        let before = self.state;
        if let Some(mark) = self.state.hovered_mark
            && !frame
                .anchors
                .iter()
                .any(|anchor| anchor.mark_index == mark.mark_index)
        {
            self.dismiss_mark();
        }

        if frame.slice.is_empty() {
            self.clear_crosshair();
        } else if let Some((x, y)) = self.state.crosshair() {
            self.state.hovered_point = frame.point_at(x);
            if !dragging {
                match frame.marker_at(x, y, self.config.hit_radius_px) {
                    Some(anchor) => self.enter_mark(anchor.mark_index, x, y),
                    None if self.state.is_over_mark => self.leave_mark(self.last_input_ms),
                    None => {}
                }
            }
        } else {
            self.state.hovered_point = None;
        }
        self.state != before
    }

    fn enter_mark(&mut self, mark_index: usize, x: f64, y: f64) {
        self.cancel_hide_timer();
        let same_mark = self
            .state
            .hovered_mark
            .is_some_and(|mark| mark.mark_index == mark_index);
        if !(same_mark && self.state.is_over_mark) {
            self.state.hovered_mark = Some(HoveredMark { mark_index, x, y });
        }
        self.state.is_over_mark = true;
    }

    fn leave_mark(&mut self, now_ms: u64) {
        self.state.is_over_mark = false;
        if self.state.hovered_mark.is_none() || self.config.sticky_marks {
            return;
        }
        self.next_timer += 1;
        let timer = HideTimer {
            handle: TimerHandle(self.next_timer),
            deadline_ms: now_ms.saturating_add(self.config.hide_delay_ms),
        };
        trace!(
            handle = timer.handle.0,
            deadline_ms = timer.deadline_ms,
            "mark tooltip hide timer started"
        );
        self.state.hide_timer = Some(timer);
    }

    fn cancel_hide_timer(&mut self) -> bool {
        match self.state.hide_timer.take() {
            Some(timer) => {
                trace!(handle = timer.handle.0, "mark tooltip hide timer cancelled");
                true
            }
            None => false,
        }
    }

    fn clear_crosshair(&mut self) {
        self.state.pointer_x = None;
        self.state.pointer_y = None;
        self.state.hovered_point = None;
    }
}
