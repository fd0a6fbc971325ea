use tracing::{debug, trace};

use crate::extensions::{ChartEvent, ListenerContext};
use crate::render::Renderer;

use super::{ChartEngine, ChartMode};

impl<R: Renderer> ChartEngine<R> {
    pub(super) fn listener_context(&self) -> ListenerContext {
        ListenerContext {
            viewport: self.viewport(),
            visible_range: self.range.range(),
            dataset_len: self.dataset.len(),
            interval: self.interval,
            loading: self.is_loading(),
            mini: self.mode.mini,
            expanded: self.mode.expanded,
            tooltip_phase: self.tooltip.phase(),
        }
    }

    pub(super) fn emit_event(&mut self, event: ChartEvent) {
        trace!(?event, listeners = self.listeners.len(), "emit chart event");
        let context = self.listener_context();
        for listener in &mut self.listeners {
            listener.on_event(event, context);
        }
    }

    /// Emits `RangeChanged` and re-derives tooltip state for the new slice.
    pub(super) fn emit_range_changed(&mut self) {
        self.revalidate_tooltip();
        if let Some(range) = self.range.range() {
            debug!(
                start = range.start_index,
                end = range.end_index,
                "visible range changed"
            );
            self.emit_event(ChartEvent::RangeChanged(range));
        }
    }

    pub(super) fn emit_loading_changed(&mut self) {
        let loading = self.is_loading();
        self.emit_event(ChartEvent::LoadingChanged { loading });
    }

    pub(super) fn emit_mode_changed(&mut self) {
        let ChartMode { mini, expanded } = self.mode;
        debug!(mini, expanded, "chart mode changed");
        self.emit_event(ChartEvent::ModeChanged { mini, expanded });
    }
}
