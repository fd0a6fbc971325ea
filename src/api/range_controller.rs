use tracing::trace;

use crate::core::{RangeIntent, StepDirection};
use crate::render::Renderer;

use super::ChartEngine;

impl<R: Renderer> ChartEngine<R> {
    /// Toolbar step: widen, narrow, shift or reset by `step_items`.
    ///
    /// Returns `true` when the visible range changed.
    pub fn step_range(&mut self, direction: StepDirection) -> bool {
        if self.navigation_locked() {
            trace!(?direction, "range step ignored while navigation is locked");
            return false;
        }
        let step_items = self.config.tuning.step_items;
        if self.range.step(direction, step_items) {
            self.emit_range_changed();
            return true;
        }
        false
    }

    /// Sets an explicit window; out-of-bounds requests are clamped.
    pub fn set_visible_range(&mut self, start_index: usize, end_index: usize) -> bool {
        if self.navigation_locked() {
            return false;
        }
        if self.range.set_range(start_index, end_index) {
            self.emit_range_changed();
            return true;
        }
        false
    }

    /// Back to the trailing default window.
    pub fn reset_range(&mut self) -> bool {
        self.apply_range_intent(RangeIntent::Reset)
    }

    pub(super) fn apply_range_intent(&mut self, intent: RangeIntent) -> bool {
        if self.navigation_locked() {
            return false;
        }
        if self.range.apply(intent) {
            self.emit_range_changed();
            return true;
        }
        false
    }

    /// Pan and zoom are inert while a reload is pending or the plot is hidden.
    pub(super) fn navigation_locked(&self) -> bool {
        self.is_loading() || self.mode.mini
    }
}
