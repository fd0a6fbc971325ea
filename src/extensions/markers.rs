use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{ChartScales, OhlcPoint};
use crate::error::{ChartError, ChartResult};

/// Annotation (news, event, signal) joined to the series by timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkPoint {
    pub timestamp: i64,
    /// Short glyph text drawn inside the marker circle.
    pub kind: String,
    pub title: String,
    pub body: String,
}

impl MarkPoint {
    #[must_use]
    pub fn new(timestamp: i64, kind: impl Into<String>) -> Self {
        Self {
            timestamp,
            kind: kind.into(),
            title: String::new(),
            body: String::new(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerLayoutConfig {
    pub min_radius_px: f64,
    pub max_radius_px: f64,
    /// Gap between the wick top and the lowest marker of a stack.
    pub wick_offset_px: f64,
    /// Extra gap between stacked markers on top of one diameter.
    pub stack_gap_px: f64,
}

impl Default for MarkerLayoutConfig {
    fn default() -> Self {
        Self {
            min_radius_px: 3.0,
            max_radius_px: 10.0,
            wick_offset_px: 10.0,
            stack_gap_px: 2.0,
        }
    }
}

impl MarkerLayoutConfig {
    pub fn validate(self) -> ChartResult<Self> {
        for (value, name) in [
            (self.min_radius_px, "min_radius_px"),
            (self.max_radius_px, "max_radius_px"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "marker layout `{name}` must be finite and > 0"
                )));
            }
        }
        for (value, name) in [
            (self.wick_offset_px, "wick_offset_px"),
            (self.stack_gap_px, "stack_gap_px"),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "marker layout `{name}` must be finite and >= 0"
                )));
            }
        }
        if self.min_radius_px > self.max_radius_px {
            return Err(ChartError::InvalidConfig(
                "marker layout `min_radius_px` must not exceed `max_radius_px`".to_owned(),
            ));
        }
        Ok(self)
    }

    /// Marker radius follows the candle width within the configured bounds.
    #[must_use]
    pub fn radius_for(self, candle_width: f64) -> f64 {
        let half = if candle_width.is_finite() {
            candle_width / 2.0
        } else {
            self.min_radius_px
        };
        half.clamp(self.min_radius_px, self.max_radius_px)
    }

    #[must_use]
    pub fn stack_spacing(self, radius: f64) -> f64 {
        radius * 2.0 + self.stack_gap_px
    }
}

/// Resolved marker glyph position in plot-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerAnchor {
    /// Index into the mark list the layout was computed from.
    pub mark_index: usize,
    /// Index into the visible slice of the candle the mark is attached to.
    pub point_index: usize,
    /// Position within the stack of marks sharing one timestamp, bottom first.
    pub stack_index: usize,
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
}

impl MarkerAnchor {
    #[must_use]
    pub fn distance_to(self, x: f64, y: f64) -> f64 {
        (self.center_x - x).hypot(self.center_y - y)
    }
}

type MarkStack = SmallVec<[usize; 4]>;

/// Places every mark whose timestamp exists in `slice` above its candle.
///
/// Marks that share a timestamp stack upward in their input order. Marks with
/// no matching candle are dropped.
#[must_use]
pub fn layout_markers(
    slice: &[OhlcPoint],
    marks: &[MarkPoint],
    scales: &ChartScales,
    candle_width: f64,
    config: MarkerLayoutConfig,
) -> Vec<MarkerAnchor> {
    if slice.is_empty() || marks.is_empty() {
        return Vec::new();
    }

    let by_timestamp: IndexMap<i64, usize> = slice
        .iter()
        .enumerate()
        .map(|(index, point)| (point.timestamp, index))
        .collect();

    let mut stacks: IndexMap<usize, MarkStack> = IndexMap::new();
    for (mark_index, mark) in marks.iter().enumerate() {
        if let Some(&point_index) = by_timestamp.get(&mark.timestamp) {
            stacks.entry(point_index).or_default().push(mark_index);
        }
    }
    stacks.sort_unstable_keys();

    let radius = config.radius_for(candle_width);
    let spacing = config.stack_spacing(radius);
    let mut anchors = Vec::with_capacity(stacks.values().map(SmallVec::len).sum());
    for (point_index, stack) in stacks {
        let point = slice[point_index];
        let center_x = scales.time_to_x(point.timestamp);
        let wick_top = scales.price_to_y(point.high);
        for (stack_index, mark_index) in stack.into_iter().enumerate() {
            anchors.push(MarkerAnchor {
                mark_index,
                point_index,
                stack_index,
                center_x,
                center_y: wick_top - config.wick_offset_px - radius - spacing * stack_index as f64,
                radius,
            });
        }
    }
    anchors
}
