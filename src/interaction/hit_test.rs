use ordered_float::OrderedFloat;

use crate::core::{ChartScales, OhlcPoint, PlotArea};
use crate::extensions::MarkerAnchor;

/// Everything a pointer lookup needs from the current render pass.
#[derive(Debug, Clone, Copy)]
pub struct HitTestFrame<'a> {
    pub plot: PlotArea,
    pub slice: &'a [OhlcPoint],
    pub scales: &'a ChartScales,
    /// Marker glyphs in plot-local coordinates.
    pub anchors: &'a [MarkerAnchor],
}

impl HitTestFrame<'_> {
    /// Slice index nearest to an outer-coordinate x.
    #[must_use]
    pub fn point_at(&self, x: f64) -> Option<usize> {
        if self.slice.is_empty() {
            return None;
        }
        let target = self.scales.x_to_time(self.plot.local_x(x));
        nearest_point_index(self.slice, target)
    }

    #[must_use]
    pub fn marker_at(&self, x: f64, y: f64, radius: f64) -> Option<MarkerAnchor> {
        nearest_marker_within(
            self.anchors,
            self.plot.local_x(x),
            self.plot.local_y(y),
            radius,
        )
    }
}

/// Index of the point whose timestamp is closest to `target_time`.
///
/// Ties resolve to the first point encountered.
#[must_use]
pub fn nearest_point_index(slice: &[OhlcPoint], target_time: f64) -> Option<usize> {
    if !target_time.is_finite() {
        return None;
    }
    let mut best: Option<(usize, f64)> = None;
    for (index, point) in slice.iter().enumerate() {
        let distance = (point.timestamp as f64 - target_time).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((index, distance)),
        }
    }
    best.map(|(index, _)| index)
}

/// Closest marker whose center lies within `radius` pixels of `(x, y)`.
#[must_use]
pub fn nearest_marker_within(
    anchors: &[MarkerAnchor],
    x: f64,
    y: f64,
    radius: f64,
) -> Option<MarkerAnchor> {
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    anchors
        .iter()
        .map(|anchor| (*anchor, anchor.distance_to(x, y)))
        .filter(|(_, distance)| distance.is_finite() && *distance <= radius)
        .min_by_key(|(_, distance)| OrderedFloat(*distance))
        .map(|(anchor, _)| anchor)
}

#[cfg(test)]
mod tests {
    use super::{nearest_marker_within, nearest_point_index};
    use crate::core::OhlcPoint;
    use crate::extensions::MarkerAnchor;

    fn anchor(mark_index: usize, center_x: f64, center_y: f64) -> MarkerAnchor {
        MarkerAnchor {
            mark_index,
            point_index: 0,
            stack_index: 0,
            center_x,
            center_y,
            radius: 5.0,
        }
    }

    #[test]
    fn nearest_point_prefers_first_on_tie() {
        let slice: Vec<OhlcPoint> = [0, 10, 20]
            .into_iter()
            .map(|ts| OhlcPoint::new(ts, 1.0, 1.0, 1.0, 1.0, 0.0))
            .collect();
        assert_eq!(nearest_point_index(&slice, 5.0), Some(0));
        assert_eq!(nearest_point_index(&slice, 16.0), Some(2));
        assert_eq!(nearest_point_index(&slice, -100.0), Some(0));
        assert_eq!(nearest_point_index(&slice, f64::NAN), None);
        assert_eq!(nearest_point_index(&[], 5.0), None);
    }

    #[test]
    fn marker_capture_is_inclusive_and_picks_closest() {
        let anchors = [anchor(0, 0.0, 0.0), anchor(1, 20.0, 0.0)];
        assert_eq!(
            nearest_marker_within(&anchors, 12.0, 0.0, 12.0).map(|a| a.mark_index),
            Some(1)
        );
        assert_eq!(
            nearest_marker_within(&anchors, -12.0, 0.0, 12.0).map(|a| a.mark_index),
            Some(0)
        );
        assert_eq!(nearest_marker_within(&anchors, -12.5, 0.0, 12.0), None);
    }
}
