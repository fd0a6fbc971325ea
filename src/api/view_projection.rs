use crate::core::{ChartScales, OhlcPoint, PlotArea, VisibleRange, candle_body_width};
use crate::extensions::{MarkerAnchor, layout_markers};
use crate::interaction::{GestureContext, HitTestFrame};
use crate::render::Renderer;

use super::ChartEngine;
use super::engine::slice_of;

/// Scales and marker layout of the current visible slice.
///
/// Shared by rendering and pointer hit-testing so both see identical geometry.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct ViewProjection {
    pub(super) plot: PlotArea,
    pub(super) range: Option<VisibleRange>,
    pub(super) scales: ChartScales,
    pub(super) candle_width: f64,
    pub(super) anchors: Vec<MarkerAnchor>,
}

impl ViewProjection {
    pub(super) fn hit_frame<'a>(&'a self, slice: &'a [OhlcPoint]) -> HitTestFrame<'a> {
        HitTestFrame {
            plot: self.plot,
            slice,
            scales: &self.scales,
            anchors: &self.anchors,
        }
    }

    pub(super) fn gesture_context(&self) -> GestureContext {
        GestureContext {
            range: self.range,
            plot: self.plot,
        }
    }
}

impl<R: Renderer> ChartEngine<R> {
    pub(super) fn view_projection(&self) -> ViewProjection {
        let plot = self.plot_area();
        let range = self.range.range();
        let slice = slice_of(&self.dataset, range);
        let scales = ChartScales::from_slice(slice, plot.width, plot.height);
        let candle_width = candle_body_width(plot.width, slice.len());
        let anchors = layout_markers(slice, &self.marks, &scales, candle_width, self.config.markers);
        ViewProjection {
            plot,
            range,
            scales,
            candle_width,
            anchors,
        }
    }

    /// Re-derives tooltip state after the slice or layout changed.
    pub(super) fn revalidate_tooltip(&mut self) {
        let projection = self.view_projection();
        let slice = slice_of(&self.dataset, projection.range);
        let dragging = self.gestures.is_dragging();
        self.tooltip.revalidate(projection.hit_frame(slice), dragging);
    }
}
