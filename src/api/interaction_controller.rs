use tracing::trace;

use crate::core::RangeIntent;
use crate::interaction::{PointerButton, TouchContact, WheelInput};
use crate::render::Renderer;

use super::ChartEngine;
use super::engine::slice_of;

impl<R: Renderer> ChartEngine<R> {
    /// Wheel or trackpad scroll. Returns `true` when the visible range changed.
    pub fn wheel(&mut self, input: WheelInput) -> bool {
        if self.navigation_locked() {
            return false;
        }
        let context = self.view_projection().gesture_context();
        match self.gestures.on_wheel(input, context) {
            Some(intent) => self.apply_range_intent(intent),
            None => false,
        }
    }

    /// Starts a drag. Returns `true` when a drag was captured.
    pub fn pointer_down(&mut self, x: f64, button: PointerButton) -> bool {
        if self.navigation_locked() {
            return false;
        }
        let context = self.view_projection().gesture_context();
        self.gestures.on_pointer_down(x, button, context)
    }

    /// Pointer move in viewport coordinates: drags pan, otherwise the
    /// crosshair and tooltips follow.
    pub fn pointer_move(&mut self, x: f64, y: f64, now_ms: u64) -> bool {
        if self.mode.mini {
            return false;
        }
        let mut changed = false;
        if self.gestures.is_dragging() && !self.is_loading() {
            let context = self.view_projection().gesture_context();
            if let Some(intent) = self.gestures.on_pointer_move(x, context) {
                changed |= self.apply_range_intent(intent);
            }
        }

        let dragging = self.gestures.is_dragging();
        let projection = self.view_projection();
        let slice = slice_of(&self.dataset, projection.range);
        changed |= self
            .tooltip
            .pointer_move(x, y, now_ms, dragging, projection.hit_frame(slice));
        changed
    }

    pub fn pointer_up(&mut self) {
        self.gestures.on_pointer_up();
    }

    /// Pointer left the chart: the drag ends and the crosshair clears.
    pub fn pointer_leave(&mut self, now_ms: u64) -> bool {
        self.gestures.on_pointer_leave();
        self.tooltip.pointer_leave(now_ms)
    }

    /// New touch contact set. A single-contact double tap clears every
    /// tooltip and resets the visible range.
    pub fn touch_start(&mut self, contacts: &[TouchContact], now_ms: u64) -> bool {
        if self.mode.mini {
            return false;
        }
        let intent = if self.navigation_locked() {
            None
        } else {
            let context = self.view_projection().gesture_context();
            self.gestures.on_touch_start(contacts, now_ms, context)
        };
        if intent == Some(RangeIntent::Reset) {
            trace!("double tap clears tooltips and resets range");
            let cleared = self.tooltip.reset();
            return self.apply_range_intent(RangeIntent::Reset) || cleared;
        }

        match contacts {
            [single] => self.touch_crosshair(*single, now_ms),
            _ => false,
        }
    }

    /// One contact drags (crosshair follows the finger), two contacts pinch-zoom.
    pub fn touch_move(&mut self, contacts: &[TouchContact], now_ms: u64) -> bool {
        if self.mode.mini {
            return false;
        }
        let mut changed = false;
        if !self.navigation_locked() {
            let context = self.view_projection().gesture_context();
            if let Some(intent) = self.gestures.on_touch_move(contacts, context) {
                changed |= self.apply_range_intent(intent);
            }
        }
        if let [single] = contacts {
            changed |= self.touch_crosshair(*single, now_ms);
        }
        changed
    }

    /// All contacts lifted; the crosshair lingers briefly.
    pub fn touch_end(&mut self, now_ms: u64) {
        self.gestures.on_touch_end();
        self.tooltip.touch_end(now_ms);
    }

    /// Advances gesture and tooltip timers. Returns `true` when anything visible changed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        self.gestures.tick(now_ms);
        self.tooltip.tick(now_ms)
    }

    /// Pointer entered the floating mark tooltip.
    pub fn tooltip_enter(&mut self) -> bool {
        self.tooltip.tooltip_enter()
    }

    /// Pointer left the floating mark tooltip; it closes immediately.
    pub fn tooltip_leave(&mut self) -> bool {
        self.tooltip.tooltip_leave()
    }

    /// Closes the mark tooltip (the close button of the docked presentation).
    pub fn dismiss_mark_tooltip(&mut self) -> bool {
        self.tooltip.dismiss_mark()
    }

    fn touch_crosshair(&mut self, contact: TouchContact, now_ms: u64) -> bool {
        let projection = self.view_projection();
        let slice = slice_of(&self.dataset, projection.range);
        self.tooltip
            .touch_point(contact.x, contact.y, now_ms, projection.hit_frame(slice))
    }
}
