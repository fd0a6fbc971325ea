use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{PlotArea, RangeIntent, VisibleRange};

/// Classification of the continuous gesture in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GestureKind {
    #[default]
    None,
    Pan,
    Zoom,
}

/// Tuning for gesture classification and delta conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Wheel events further apart than this start a new gesture.
    pub idle_ms: u64,
    /// Two single-contact taps within this window reset the view.
    pub double_tap_ms: u64,
    /// Pinch distance ratio changes below this are treated as jitter.
    pub pinch_noise_ratio: f64,
    /// Multiplier applied to horizontal wheel deltas.
    pub wheel_pan_damping: f64,
    /// Per-event zoom step; zoom-in scales the count by `1 - ratio`, zoom-out by `1 + ratio`.
    pub zoom_step_ratio: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            idle_ms: 100,
            double_tap_ms: 300,
            pinch_noise_ratio: 0.05,
            wheel_pan_damping: 0.5,
            zoom_step_ratio: 0.1,
        }
    }
}

impl GestureConfig {
    #[must_use]
    pub fn zoom_in_factor(self) -> f64 {
        1.0 - self.zoom_step_ratio
    }

    #[must_use]
    pub fn zoom_out_factor(self) -> f64 {
        1.0 + self.zoom_step_ratio
    }
}

/// One wheel/trackpad event in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelInput {
    pub x: f64,
    pub y: f64,
    pub delta_x: f64,
    pub delta_y: f64,
    pub time_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// One active touch contact in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchContact {
    pub x: f64,
    pub y: f64,
}

impl TouchContact {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Live view the interpreter converts pixel deltas against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureContext {
    pub range: Option<VisibleRange>,
    pub plot: PlotArea,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragCapture {
    start_x: f64,
    origin: VisibleRange,
}

/// Turns raw wheel, pointer and touch streams into range intents.
///
/// State is scoped to one chart instance and discarded by [`cancel`](Self::cancel)
/// whenever the dataset or the pointer context goes away.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GestureInterpreter {
    config: GestureConfig,
    kind: GestureKind,
    last_event_ms: Option<u64>,
    drag: Option<DragCapture>,
    pinch_distance: Option<f64>,
    last_tap_ms: Option<u64>,
}

impl GestureInterpreter {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn config(&self) -> GestureConfig {
        self.config
    }

    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }

    #[must_use]
    pub fn kind(&self) -> GestureKind {
        self.kind
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    #[must_use]
    pub fn is_pinching(&self) -> bool {
        self.pinch_distance.is_some()
    }

    /// Drops every piece of in-flight state, including captured ranges.
    pub fn cancel(&mut self) {
        self.kind = GestureKind::None;
        self.last_event_ms = None;
        self.drag = None;
        self.pinch_distance = None;
        self.last_tap_ms = None;
    }

    /// Expires the wheel gesture once the idle window has elapsed.
    ///
    /// Returns `true` when the gesture went back to [`GestureKind::None`].
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if self.kind == GestureKind::None {
            return false;
        }
        if self.is_idle_at(now_ms) {
            trace!(kind = ?self.kind, "wheel gesture expired");
            self.kind = GestureKind::None;
            return true;
        }
        false
    }

    fn is_idle_at(&self, now_ms: u64) -> bool {
        self.last_event_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= self.config.idle_ms)
    }

    /// Interprets one wheel event.
    ///
    /// A new gesture is classified by the dominant axis of its first event and
    /// keeps that classification until the idle window elapses, so a single
    /// swipe cannot flip between pan and zoom.
    pub fn on_wheel(&mut self, input: WheelInput, ctx: GestureContext) -> Option<RangeIntent> {
        if !input.delta_x.is_finite() || !input.delta_y.is_finite() {
            return None;
        }
        if input.delta_x == 0.0 && input.delta_y == 0.0 {
            return None;
        }

        if self.kind == GestureKind::None || self.is_idle_at(input.time_ms) {
            self.kind = if input.delta_x.abs() > input.delta_y.abs() {
                GestureKind::Pan
            } else {
                GestureKind::Zoom
            };
            trace!(kind = ?self.kind, "wheel gesture classified");
        }
        self.last_event_ms = Some(input.time_ms);

        let range = ctx.range?;
        match self.kind {
            GestureKind::Pan => {
                let delta = wheel_pan_delta(
                    input.delta_x,
                    range.count(),
                    ctx.plot.width,
                    self.config.wheel_pan_damping,
                );
                (delta != 0).then_some(RangeIntent::PanBy(delta))
            }
            GestureKind::Zoom => {
                if input.delta_y == 0.0 {
                    return None;
                }
                let factor = if input.delta_y < 0.0 {
                    self.config.zoom_in_factor()
                } else {
                    self.config.zoom_out_factor()
                };
                Some(RangeIntent::ZoomAt {
                    focal: ctx.plot.normalized_x(input.x),
                    factor,
                })
            }
            GestureKind::None => None,
        }
    }

    /// Starts a drag; only the primary button pans.
    pub fn on_pointer_down(&mut self, x: f64, button: PointerButton, ctx: GestureContext) -> bool {
        if button != PointerButton::Primary || !x.is_finite() {
            return false;
        }
        self.begin_drag(x, ctx)
    }

    /// Converts cumulative drag displacement into a pan of the captured range.
    pub fn on_pointer_move(&mut self, x: f64, ctx: GestureContext) -> Option<RangeIntent> {
        let capture = self.drag?;
        if !x.is_finite() {
            return None;
        }
        let moved = drag_index_delta(x - capture.start_x, capture.origin.count(), ctx.plot.width);
        // Dragging right reveals earlier items.
        Some(RangeIntent::PanFrom {
            origin: capture.origin,
            delta: -moved,
        })
    }

    pub fn on_pointer_up(&mut self) {
        self.drag = None;
    }

    /// Pointer left the chart surface; in-flight gestures are abandoned.
    pub fn on_pointer_leave(&mut self) {
        self.drag = None;
        self.pinch_distance = None;
    }

    /// Handles a new touch contact set.
    ///
    /// Returns [`RangeIntent::Reset`] for a single-contact double tap.
    pub fn on_touch_start(
        &mut self,
        contacts: &[TouchContact],
        now_ms: u64,
        ctx: GestureContext,
    ) -> Option<RangeIntent> {
        if contacts.len() == 1
            && self
                .last_tap_ms
                .is_some_and(|last| now_ms.saturating_sub(last) < self.config.double_tap_ms)
        {
            trace!("double tap reset");
            self.last_tap_ms = None;
            self.drag = None;
            self.pinch_distance = None;
            return Some(RangeIntent::Reset);
        }
        self.last_tap_ms = Some(now_ms);

        match contacts {
            [single] => {
                self.pinch_distance = None;
                self.begin_drag(single.x, ctx);
            }
            [first, second, ..] => {
                self.drag = None;
                self.pinch_distance = Some(contact_distance(*first, *second));
            }
            [] => {}
        }
        None
    }

    /// Single contact drags; two contacts pinch-zoom around the range midpoint.
    pub fn on_touch_move(
        &mut self,
        contacts: &[TouchContact],
        ctx: GestureContext,
    ) -> Option<RangeIntent> {
        match contacts {
            [single] if self.drag.is_some() => self.on_pointer_move(single.x, ctx),
            [first, second, ..] => {
                let previous = self.pinch_distance?;
                let current = contact_distance(*first, *second);
                if !(previous.is_finite() && previous > 0.0) || !current.is_finite() {
                    self.pinch_distance = Some(current);
                    return None;
                }
                let ratio = current / previous;
                if (ratio - 1.0).abs() < self.config.pinch_noise_ratio {
                    return None;
                }
                self.pinch_distance = Some(current);
                ctx.range?;
                let factor = if ratio > 1.0 {
                    self.config.zoom_in_factor()
                } else {
                    self.config.zoom_out_factor()
                };
                Some(RangeIntent::ZoomAt { focal: 0.5, factor })
            }
            _ => None,
        }
    }

    pub fn on_touch_end(&mut self) {
        self.drag = None;
        self.pinch_distance = None;
    }

    fn begin_drag(&mut self, x: f64, ctx: GestureContext) -> bool {
        let Some(origin) = ctx.range else {
            return false;
        };
        self.drag = Some(DragCapture { start_x: x, origin });
        true
    }
}

fn wheel_pan_delta(delta_x: f64, visible_count: usize, inner_width: f64, damping: f64) -> i64 {
    if inner_width <= 0.0 {
        return 0;
    }
    let items = (delta_x * visible_count as f64 / inner_width * damping).round();
    if items.is_finite() { items as i64 } else { 0 }
}

fn drag_index_delta(delta_px: f64, visible_count: usize, inner_width: f64) -> i64 {
    if inner_width <= 0.0 {
        return 0;
    }
    let items = (delta_px * visible_count as f64 / inner_width).round();
    if items.is_finite() { items as i64 } else { 0 }
}

fn contact_distance(first: TouchContact, second: TouchContact) -> f64 {
    (first.x - second.x).hypot(first.y - second.y)
}

#[cfg(test)]
mod tests {
    use super::{
        GestureContext, GestureInterpreter, GestureKind, PointerButton, TouchContact, WheelInput,
    };
    use crate::core::{Margin, PlotArea, RangeIntent, Viewport, VisibleRange};

    fn ctx() -> GestureContext {
        // 100 px inner width
        GestureContext {
            range: Some(VisibleRange::new(100, 149)),
            plot: PlotArea::from_viewport(Viewport::new(180, 200), Margin::default()),
        }
    }

    fn wheel(delta_x: f64, delta_y: f64, time_ms: u64) -> WheelInput {
        WheelInput {
            x: 70.0,
            y: 50.0,
            delta_x,
            delta_y,
            time_ms,
        }
    }

    #[test]
    fn dominant_horizontal_delta_pans_with_damping() {
        let mut gestures = GestureInterpreter::default();
        let intent = gestures.on_wheel(wheel(40.0, 5.0, 0), ctx());
        // 40 * 50 / 100 * 0.5 = 10
        assert_eq!(intent, Some(RangeIntent::PanBy(10)));
        assert_eq!(gestures.kind(), GestureKind::Pan);
    }

    #[test]
    fn classification_persists_within_idle_window() {
        let mut gestures = GestureInterpreter::default();
        gestures.on_wheel(wheel(40.0, 0.0, 0), ctx());
        let intent = gestures.on_wheel(wheel(4.0, -30.0, 50), ctx());
        assert_eq!(gestures.kind(), GestureKind::Pan);
        assert_eq!(intent, Some(RangeIntent::PanBy(1)));

        let intent = gestures.on_wheel(wheel(4.0, -30.0, 200), ctx());
        assert_eq!(gestures.kind(), GestureKind::Zoom);
        assert!(matches!(intent, Some(RangeIntent::ZoomAt { factor, .. }) if factor < 1.0));
    }

    #[test]
    fn tick_expires_gesture() {
        let mut gestures = GestureInterpreter::default();
        gestures.on_wheel(wheel(0.0, 10.0, 1_000), ctx());
        assert!(!gestures.tick(1_050));
        assert!(gestures.tick(1_100));
        assert_eq!(gestures.kind(), GestureKind::None);
    }

    #[test]
    fn scroll_down_zooms_out_at_pointer() {
        let mut gestures = GestureInterpreter::default();
        let intent = gestures.on_wheel(wheel(0.0, 10.0, 0), ctx());
        assert_eq!(
            intent,
            Some(RangeIntent::ZoomAt {
                focal: 0.5,
                factor: 1.1
            })
        );
    }

    #[test]
    fn drag_pans_captured_range_by_cumulative_displacement() {
        let mut gestures = GestureInterpreter::default();
        assert!(gestures.on_pointer_down(50.0, PointerButton::Primary, ctx()));
        let moved_ctx = GestureContext {
            range: Some(VisibleRange::new(0, 49)),
            ..ctx()
        };
        let intent = gestures.on_pointer_move(70.0, moved_ctx);
        assert_eq!(
            intent,
            Some(RangeIntent::PanFrom {
                origin: VisibleRange::new(100, 149),
                delta: -10
            })
        );
        gestures.on_pointer_up();
        assert_eq!(gestures.on_pointer_move(90.0, ctx()), None);
    }

    #[test]
    fn secondary_button_does_not_drag() {
        let mut gestures = GestureInterpreter::default();
        assert!(!gestures.on_pointer_down(50.0, PointerButton::Secondary, ctx()));
        assert!(!gestures.is_dragging());
    }

    #[test]
    fn double_tap_within_window_resets() {
        let mut gestures = GestureInterpreter::default();
        let tap = [TouchContact::new(60.0, 60.0)];
        assert_eq!(gestures.on_touch_start(&tap, 1_000, ctx()), None);
        gestures.on_touch_end();
        assert_eq!(
            gestures.on_touch_start(&tap, 1_250, ctx()),
            Some(RangeIntent::Reset)
        );
        // Third tap starts a fresh sequence instead of resetting again.
        assert_eq!(gestures.on_touch_start(&tap, 1_300, ctx()), None);
    }

    #[test]
    fn slow_taps_do_not_reset() {
        let mut gestures = GestureInterpreter::default();
        let tap = [TouchContact::new(60.0, 60.0)];
        gestures.on_touch_start(&tap, 0, ctx());
        assert_eq!(gestures.on_touch_start(&tap, 300, ctx()), None);
    }

    #[test]
    fn pinch_ignores_jitter_and_zooms_around_midpoint() {
        let mut gestures = GestureInterpreter::default();
        let start = [TouchContact::new(0.0, 0.0), TouchContact::new(100.0, 0.0)];
        gestures.on_touch_start(&start, 0, ctx());
        assert!(gestures.is_pinching());

        let jitter = [TouchContact::new(0.0, 0.0), TouchContact::new(103.0, 0.0)];
        assert_eq!(gestures.on_touch_move(&jitter, ctx()), None);

        let spread = [TouchContact::new(0.0, 0.0), TouchContact::new(120.0, 0.0)];
        assert_eq!(
            gestures.on_touch_move(&spread, ctx()),
            Some(RangeIntent::ZoomAt {
                focal: 0.5,
                factor: 0.9
            })
        );

        let pinch = [TouchContact::new(0.0, 0.0), TouchContact::new(60.0, 0.0)];
        assert_eq!(
            gestures.on_touch_move(&pinch, ctx()),
            Some(RangeIntent::ZoomAt {
                focal: 0.5,
                factor: 1.1
            })
        );
    }

    #[test]
    fn cancel_discards_captured_state() {
        let mut gestures = GestureInterpreter::default();
        gestures.on_pointer_down(50.0, PointerButton::Primary, ctx());
        gestures.on_wheel(wheel(10.0, 0.0, 0), ctx());
        gestures.cancel();
        assert!(!gestures.is_dragging());
        assert_eq!(gestures.kind(), GestureKind::None);
        assert_eq!(gestures.on_pointer_move(80.0, ctx()), None);
    }
}
