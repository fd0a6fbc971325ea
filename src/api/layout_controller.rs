use tracing::{debug, warn};

use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::extensions::{ChartEvent, MarkPoint};
use crate::render::Renderer;

use super::{ChartEngine, DeviceProfile};

/// Host fullscreen integration (browser fullscreen API, window manager, ...).
pub trait FullscreenCapability {
    fn enter(&mut self) -> ChartResult<()>;
    fn exit(&mut self) -> ChartResult<()>;
    fn is_active(&self) -> bool;
}

/// Where the mark tooltip is presented.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkTooltipPlacement {
    /// Next to the marker, offset up and left of the entry point.
    Floating { left: f64, top: f64 },
    /// Docked below the chart with a close button.
    Docked,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkTooltip<'a> {
    pub mark: &'a MarkPoint,
    pub placement: MarkTooltipPlacement,
}

const MARK_TOOLTIP_OFFSET_PX: f64 = 5.0;

impl<R: Renderer> ChartEngine<R> {
    pub fn set_fullscreen_capability(&mut self, capability: Box<dyn FullscreenCapability>) {
        self.fullscreen = Some(capability);
    }

    /// Container resize. Width always follows; height matters only while expanded.
    pub fn resize(&mut self, width: u32, height: u32) -> ChartResult<()> {
        let container = Viewport::new(width, height);
        if !container.is_valid() {
            return Err(ChartError::InvalidViewport { width, height });
        }
        if container == self.container {
            return Ok(());
        }
        self.container = container;
        debug!(width, height, "container resized");
        self.revalidate_tooltip();
        Ok(())
    }

    /// Enters or leaves fullscreen. Without a capability this is a no-op that
    /// returns `Ok(false)`.
    pub fn toggle_expanded(&mut self) -> ChartResult<bool> {
        let Some(capability) = self.fullscreen.as_mut() else {
            debug!("fullscreen toggle ignored without capability");
            return Ok(false);
        };
        if self.mode.expanded {
            capability.exit()?;
        } else {
            capability.enter()?;
        }
        self.mode.expanded = !self.mode.expanded;
        self.gestures.cancel();
        self.revalidate_tooltip();
        self.emit_mode_changed();
        Ok(true)
    }

    /// Re-reads the capability state, e.g. after the host left fullscreen on its own.
    ///
    /// Returns `true` when the expanded flag changed.
    pub fn sync_fullscreen(&mut self) -> bool {
        let active = self
            .fullscreen
            .as_ref()
            .is_some_and(|capability| capability.is_active());
        if active == self.mode.expanded {
            return false;
        }
        if !active {
            warn!("fullscreen exited outside the chart");
        }
        self.mode.expanded = active;
        self.revalidate_tooltip();
        self.emit_mode_changed();
        true
    }

    /// Hides or shows the plot. Hidden charts keep their data and range.
    pub fn toggle_mini(&mut self) -> bool {
        self.mode.mini = !self.mode.mini;
        self.gestures.cancel();
        self.tooltip.reset();
        self.emit_mode_changed();
        self.mode.mini
    }

    /// Asks listeners to capture an image of the chart.
    pub fn request_snapshot(&mut self) {
        debug!("snapshot requested");
        self.emit_event(ChartEvent::SnapshotRequested);
    }

    /// Drops transient state before the host disposes of the chart.
    ///
    /// Pending timers and gestures are cancelled and a pending reload is
    /// forgotten, so a late response is discarded.
    pub fn teardown(&mut self) {
        self.gestures.cancel();
        self.tooltip.reset();
        if let Some(ticket) = self.reload.pending.take() {
            debug!(token = ticket.token, "pending reload abandoned on teardown");
        }
    }

    /// Mark tooltip to present, if any: floating beside the marker on
    /// desktop, docked on mobile.
    #[must_use]
    pub fn mark_tooltip(&self) -> Option<MarkTooltip<'_>> {
        let hovered = self.tooltip.state().hovered_mark?;
        let mark = self.marks.get(hovered.mark_index)?;
        let placement = match self.config.profile {
            DeviceProfile::Mobile => MarkTooltipPlacement::Docked,
            DeviceProfile::Desktop => MarkTooltipPlacement::Floating {
                left: hovered.x - MARK_TOOLTIP_OFFSET_PX,
                top: hovered.y - MARK_TOOLTIP_OFFSET_PX,
            },
        };
        Some(MarkTooltip { mark, placement })
    }
}
