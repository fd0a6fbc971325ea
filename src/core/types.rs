use serde::{Deserialize, Serialize};

/// Outer pixel size of the chart surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Pixel gutters between the viewport edge and the plot area.
///
/// The right gutter hosts the price axis, the bottom gutter the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 10.0,
            right: 60.0,
            bottom: 50.0,
            left: 20.0,
        }
    }
}

impl Margin {
    #[must_use]
    pub fn is_valid(self) -> bool {
        [self.top, self.right, self.bottom, self.left]
            .into_iter()
            .all(|value| value.is_finite() && value >= 0.0)
    }
}

/// Inner drawing rectangle of the chart, in outer (viewport) pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    /// Derives the plot rectangle; collapses to a 1px area instead of going negative.
    #[must_use]
    pub fn from_viewport(viewport: Viewport, margin: Margin) -> Self {
        let width = (f64::from(viewport.width) - margin.left - margin.right).max(1.0);
        let height = (f64::from(viewport.height) - margin.top - margin.bottom).max(1.0);
        Self {
            left: margin.left,
            top: margin.top,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.top + self.height
    }

    /// Returns `true` when an outer-coordinate point lies inside the plot (edges inclusive).
    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        x.is_finite()
            && y.is_finite()
            && x >= self.left
            && x <= self.right()
            && y >= self.top
            && y <= self.bottom()
    }

    /// Converts an outer x coordinate into plot-local space.
    #[must_use]
    pub fn local_x(self, x: f64) -> f64 {
        x - self.left
    }

    #[must_use]
    pub fn local_y(self, y: f64) -> f64 {
        y - self.top
    }

    /// Normalized horizontal position in `[0, 1]`, used as a zoom focal point.
    #[must_use]
    pub fn normalized_x(self, x: f64) -> f64 {
        if !x.is_finite() {
            return 0.5;
        }
        (self.local_x(x) / self.width).clamp(0.0, 1.0)
    }
}
