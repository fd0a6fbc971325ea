use serde::{Deserialize, Serialize};

use crate::core::{Interval, OhlcPoint, PlotArea, Viewport, ViewportRangeStore, VisibleRange};
use crate::error::ChartResult;
use crate::extensions::{ChartListener, MarkPoint};
use crate::interaction::{GestureInterpreter, GestureKind, TooltipMachine, TooltipPhase, TooltipState};
use crate::render::Renderer;

use super::{ChartEngineConfig, FullscreenCapability, PriceReadout, ReloadTicket, RenderStyle};

/// Presentation toggles driven by the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChartMode {
    /// Plot hidden, toolbar only.
    pub mini: bool,
    /// Fullscreen; the chart height follows the container.
    pub expanded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(super) struct ReloadState {
    pub(super) latest_token: u64,
    pub(super) pending: Option<ReloadTicket>,
}

/// One chart instance: dataset, visible window, gestures, tooltips and layout.
///
/// Every timer and cache is owned here; hosts drive time through the `now_ms`
/// arguments and [`tick`](Self::tick).
pub struct ChartEngine<R: Renderer> {
    pub(super) renderer: R,
    pub(super) config: ChartEngineConfig,
    pub(super) container: Viewport,
    pub(super) dataset: Vec<OhlcPoint>,
    pub(super) marks: Vec<MarkPoint>,
    pub(super) dataset_generation: u64,
    pub(super) interval: Interval,
    pub(super) range: ViewportRangeStore,
    pub(super) gestures: GestureInterpreter,
    pub(super) tooltip: TooltipMachine,
    pub(super) reload: ReloadState,
    pub(super) mode: ChartMode,
    pub(super) fullscreen: Option<Box<dyn FullscreenCapability>>,
    pub(super) listeners: Vec<Box<dyn ChartListener>>,
}

impl<R: Renderer> ChartEngine<R> {
    #[must_use]
    pub fn config(&self) -> &ChartEngineConfig {
        &self.config
    }

    #[must_use]
    pub fn render_style(&self) -> RenderStyle {
        self.config.style
    }

    pub fn set_render_style(&mut self, style: RenderStyle) -> ChartResult<()> {
        style.validate()?;
        self.config.style = style;
        Ok(())
    }

    /// Size of the chart surface. Width follows the container; height is the
    /// profile height, or the container height minus the toolbar when expanded.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        let height = if self.mode.expanded {
            self.container
                .height
                .saturating_sub(self.config.layout.expanded_toolbar_px)
                .max(1)
        } else {
            self.config.layout.height_for(self.config.profile)
        };
        Viewport::new(self.container.width, height)
    }

    #[must_use]
    pub fn container(&self) -> Viewport {
        self.container
    }

    #[must_use]
    pub fn plot_area(&self) -> PlotArea {
        PlotArea::from_viewport(self.viewport(), self.config.layout.margin)
    }

    #[must_use]
    pub fn dataset(&self) -> &[OhlcPoint] {
        &self.dataset
    }

    #[must_use]
    pub fn marks(&self) -> &[MarkPoint] {
        &self.marks
    }

    /// Bumped on every dataset replacement.
    #[must_use]
    pub fn dataset_generation(&self) -> u64 {
        self.dataset_generation
    }

    #[must_use]
    pub fn interval(&self) -> Interval {
        self.interval
    }

    #[must_use]
    pub fn intervals(&self) -> &[Interval] {
        &self.config.intervals
    }

    #[must_use]
    pub fn visible_range(&self) -> Option<VisibleRange> {
        self.range.range()
    }

    #[must_use]
    pub fn visible_slice(&self) -> &[OhlcPoint] {
        slice_of(&self.dataset, self.range.range())
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.reload.pending.is_some()
    }

    #[must_use]
    pub fn pending_reload(&self) -> Option<ReloadTicket> {
        self.reload.pending
    }

    #[must_use]
    pub fn mode(&self) -> ChartMode {
        self.mode
    }

    #[must_use]
    pub fn gesture_kind(&self) -> GestureKind {
        self.gestures.kind()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.gestures.is_dragging()
    }

    #[must_use]
    pub fn tooltip_state(&self) -> TooltipState {
        self.tooltip.state()
    }

    #[must_use]
    pub fn tooltip_phase(&self) -> TooltipPhase {
        self.tooltip.phase()
    }

    /// Point under the crosshair, if any.
    #[must_use]
    pub fn hovered_point(&self) -> Option<OhlcPoint> {
        self.tooltip
            .state()
            .hovered_point
            .and_then(|index| self.visible_slice().get(index).copied())
    }

    /// Mark whose tooltip is open, if any.
    #[must_use]
    pub fn hovered_mark(&self) -> Option<&MarkPoint> {
        self.tooltip
            .state()
            .hovered_mark
            .and_then(|mark| self.marks.get(mark.mark_index))
    }

    /// OHLC header readout for the hovered point.
    #[must_use]
    pub fn price_readout(&self) -> Option<PriceReadout> {
        self.hovered_point()
            .map(|point| PriceReadout::from_point(point, &self.config.style))
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}

pub(super) fn slice_of(dataset: &[OhlcPoint], range: Option<VisibleRange>) -> &[OhlcPoint] {
    range
        .and_then(|range| dataset.get(range.start_index..=range.end_index))
        .unwrap_or(&[])
}
