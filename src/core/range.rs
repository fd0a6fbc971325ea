use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

/// Inclusive window `[start_index, end_index]` over the full dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisibleRange {
    pub start_index: usize,
    pub end_index: usize,
}

impl VisibleRange {
    #[must_use]
    pub fn new(start_index: usize, end_index: usize) -> Self {
        Self {
            start_index,
            end_index,
        }
    }

    /// Number of items in the window.
    #[must_use]
    pub fn count(self) -> usize {
        self.end_index.saturating_sub(self.start_index) + 1
    }

    #[must_use]
    pub fn contains(self, index: usize) -> bool {
        index >= self.start_index && index <= self.end_index
    }
}

/// Window sizing limits shared by every range mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeLimits {
    pub default_visible_items: usize,
    pub min_visible_items: usize,
}

impl Default for RangeLimits {
    fn default() -> Self {
        Self {
            default_visible_items: 50,
            min_visible_items: 5,
        }
    }
}

/// Discrete toolbar adjustments.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StepDirection {
    /// Show `step` more items on each side.
    Widen,
    /// Show `step` fewer items on each side, around the current center.
    Narrow,
    ShiftLeft,
    ShiftRight,
    /// Back to the default trailing window.
    Reset,
}

/// Range mutation requested by gesture interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RangeIntent {
    /// Shift the live range by a signed item count.
    PanBy(i64),
    /// Shift a range captured at gesture start; the live range is ignored.
    PanFrom { origin: VisibleRange, delta: i64 },
    /// Rescale the visible count by `factor`, keeping the item under `focal` in place.
    ZoomAt { focal: f64, factor: f64 },
    Reset,
}

/// Returns the trailing default window for a dataset of `len` items.
#[must_use]
pub fn default_window(len: usize, limits: RangeLimits) -> Option<VisibleRange> {
    if len == 0 {
        return None;
    }
    let count = limits.default_visible_items.max(1);
    Some(settle(len as i64 - count as i64, count, len, limits))
}

/// Clamps a requested window into the dataset.
///
/// The count is bounded by `[min_visible_items, len]` first, then the start
/// is pinned so the window fits; a window that hits an edge therefore grows
/// away from that edge. Datasets smaller than the minimum are shown whole.
fn settle(start: i64, count: usize, len: usize, limits: RangeLimits) -> VisibleRange {
    let floor = limits.min_visible_items.max(1).min(len);
    let count = count.clamp(floor, len);
    let max_start = (len - count) as i64;
    let start = start.clamp(0, max_start) as usize;
    VisibleRange::new(start, start + count - 1)
}

/// Owner of the visible window over the current dataset.
///
/// Every mutation is a total function: out-of-range requests are clamped,
/// never rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportRangeStore {
    limits: RangeLimits,
    dataset_len: usize,
    range: Option<VisibleRange>,
}

impl ViewportRangeStore {
    #[must_use]
    pub fn new(limits: RangeLimits) -> Self {
        Self {
            limits,
            dataset_len: 0,
            range: None,
        }
    }

    #[must_use]
    pub fn limits(&self) -> RangeLimits {
        self.limits
    }

    #[must_use]
    pub fn dataset_len(&self) -> usize {
        self.dataset_len
    }

    /// Current window, `None` while the dataset is empty.
    #[must_use]
    pub fn range(&self) -> Option<VisibleRange> {
        self.range
    }

    /// Re-initializes to the default trailing window over a new dataset.
    pub fn reset_for_dataset(&mut self, len: usize) -> Option<VisibleRange> {
        self.dataset_len = len;
        self.range = default_window(len, self.limits);
        self.range
    }

    /// Restores the default trailing window. Returns `true` when the range changed.
    pub fn reset(&mut self) -> bool {
        self.replace(default_window(self.dataset_len, self.limits))
    }

    /// Shifts both bounds by `delta` items, preserving the window width.
    pub fn pan(&mut self, delta: i64) -> bool {
        let Some(current) = self.range else {
            return false;
        };
        self.pan_from(current, delta)
    }

    /// Shifts `origin` (typically captured at drag start) by `delta` items.
    pub fn pan_from(&mut self, origin: VisibleRange, delta: i64) -> bool {
        if self.dataset_len == 0 {
            return false;
        }
        let start = (origin.start_index as i64).saturating_add(delta);
        let next = settle(start, origin.count(), self.dataset_len, self.limits);
        self.replace(Some(next))
    }

    /// Scales the visible count by `factor` around a normalized focal point.
    ///
    /// The item under `focal` stays visually stationary unless an edge clamp
    /// interferes. Non-finite or non-positive factors are ignored.
    pub fn zoom(&mut self, focal: f64, factor: f64) -> bool {
        let Some(current) = self.range else {
            return false;
        };
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        let focal = if focal.is_finite() {
            focal.clamp(0.0, 1.0)
        } else {
            0.5
        };

        let old_count = current.count();
        let floor = self.limits.min_visible_items.max(1).min(self.dataset_len);
        let requested = (old_count as f64 * factor).round();
        let new_count = if requested.is_finite() && requested > 0.0 {
            (requested as usize).clamp(floor, self.dataset_len)
        } else {
            floor
        };

        let center = current.start_index as f64 + (focal * old_count as f64).floor();
        let new_start = (center - focal * new_count as f64).floor() as i64;
        let next = settle(new_start, new_count, self.dataset_len, self.limits);
        self.replace(Some(next))
    }

    /// Applies a toolbar step of `step_size` items.
    pub fn step(&mut self, direction: StepDirection, step_size: usize) -> bool {
        let Some(current) = self.range else {
            return false;
        };
        let len = self.dataset_len;
        let step = step_size as i64;
        let start = current.start_index as i64;
        let end = current.end_index as i64;

        let next = match direction {
            StepDirection::Widen => {
                let new_start = (start - step).max(0);
                let new_end = (end + step).min(len as i64 - 1);
                settle(new_start, (new_end - new_start + 1) as usize, len, self.limits)
            }
            StepDirection::Narrow => {
                let count = current.count();
                if count <= self.limits.min_visible_items {
                    current
                } else {
                    let target = count
                        .saturating_sub(step_size.saturating_mul(2))
                        .max(self.limits.min_visible_items);
                    let trimmed = ((count - target) / 2) as i64;
                    settle(start + trimmed, target, len, self.limits)
                }
            }
            StepDirection::ShiftLeft => settle(start - step, current.count(), len, self.limits),
            StepDirection::ShiftRight => settle(start + step, current.count(), len, self.limits),
            StepDirection::Reset => return self.reset(),
        };
        self.replace(Some(next))
    }

    /// Sets an explicit window; inverted or out-of-bounds input is clamped.
    pub fn set_range(&mut self, start_index: usize, end_index: usize) -> bool {
        if self.dataset_len == 0 {
            return false;
        }
        let (lo, hi) = if start_index <= end_index {
            (start_index, end_index)
        } else {
            (end_index, start_index)
        };
        let hi = hi.min(self.dataset_len - 1);
        let lo = lo.min(hi);
        let next = settle(
            lo.min(i64::MAX as usize) as i64,
            hi - lo + 1,
            self.dataset_len,
            self.limits,
        );
        self.replace(Some(next))
    }

    /// Routes a gesture intent to the matching operation.
    pub fn apply(&mut self, intent: RangeIntent) -> bool {
        match intent {
            RangeIntent::PanBy(delta) => self.pan(delta),
            RangeIntent::PanFrom { origin, delta } => self.pan_from(origin, delta),
            RangeIntent::ZoomAt { focal, factor } => self.zoom(focal, factor),
            RangeIntent::Reset => self.reset(),
        }
    }

    fn replace(&mut self, next: Option<VisibleRange>) -> bool {
        if self.range == next {
            return false;
        }
        self.range = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{RangeLimits, StepDirection, ViewportRangeStore, VisibleRange, default_window};

    fn store(len: usize) -> ViewportRangeStore {
        let mut store = ViewportRangeStore::new(RangeLimits::default());
        store.reset_for_dataset(len);
        store
    }

    #[test]
    fn default_window_trails_dataset() {
        assert_eq!(
            default_window(300, RangeLimits::default()),
            Some(VisibleRange::new(250, 299))
        );
        assert_eq!(
            default_window(20, RangeLimits::default()),
            Some(VisibleRange::new(0, 19))
        );
        assert_eq!(default_window(0, RangeLimits::default()), None);
    }

    #[test]
    fn pan_clamps_at_left_edge_preserving_width() {
        let mut store = store(100);
        store.set_range(3, 12);
        assert!(store.pan(-10));
        assert_eq!(store.range(), Some(VisibleRange::new(0, 9)));
        assert!(!store.pan(-1));
    }

    #[test]
    fn pan_clamps_at_right_edge_preserving_width() {
        let mut store = store(100);
        store.set_range(80, 89);
        assert!(store.pan(50));
        assert_eq!(store.range(), Some(VisibleRange::new(90, 99)));
    }

    #[test]
    fn zoom_keeps_focal_item_in_place() {
        let mut store = store(1_000);
        store.set_range(100, 199);
        store.zoom(0.5, 0.5);
        // center = 100 + 50 = 150, new start = 150 - 25 = 125
        assert_eq!(store.range(), Some(VisibleRange::new(125, 174)));
    }

    #[test]
    fn zoom_out_is_capped_by_dataset() {
        let mut store = store(60);
        store.zoom(0.5, 10.0);
        assert_eq!(store.range(), Some(VisibleRange::new(0, 59)));
    }

    #[test]
    fn zoom_ignores_invalid_factor() {
        let mut store = store(100);
        assert!(!store.zoom(0.5, 0.0));
        assert!(!store.zoom(0.5, f64::NAN));
    }

    #[test]
    fn narrow_stops_at_minimum() {
        let mut store = store(100);
        store.set_range(40, 51);
        store.step(StepDirection::Narrow, 10);
        let range = store.range().expect("range");
        assert_eq!(range.count(), 5);
        assert!(range.start_index >= 40 && range.end_index <= 51);
        assert!(!store.step(StepDirection::Narrow, 10));
    }

    #[test]
    fn widen_grows_from_unpinned_side() {
        let mut store = store(100);
        store.set_range(0, 9);
        store.step(StepDirection::Widen, 10);
        assert_eq!(store.range(), Some(VisibleRange::new(0, 19)));
    }

    #[test]
    fn tiny_dataset_is_shown_whole() {
        let mut store = store(3);
        assert_eq!(store.range(), Some(VisibleRange::new(0, 2)));
        store.zoom(0.5, 0.1);
        assert_eq!(store.range(), Some(VisibleRange::new(0, 2)));
        store.step(StepDirection::Narrow, 10);
        assert_eq!(store.range(), Some(VisibleRange::new(0, 2)));
    }

    #[test]
    fn inverted_explicit_range_is_normalized() {
        let mut store = store(100);
        store.set_range(30, 20);
        assert_eq!(store.range(), Some(VisibleRange::new(20, 30)));
        store.set_range(98, 99);
        assert_eq!(store.range(), Some(VisibleRange::new(95, 99)));
    }

    #[test]
    fn explicit_range_clamps_extreme_bounds() {
        let mut store = store(100);
        assert!(store.set_range(0, usize::MAX));
        assert_eq!(store.range(), Some(VisibleRange::new(0, 99)));
        store.set_range(usize::MAX, usize::MAX - 1);
        assert_eq!(store.range(), Some(VisibleRange::new(95, 99)));
    }

    #[test]
    fn empty_dataset_ignores_mutations() {
        let mut store = store(0);
        assert!(!store.pan(3));
        assert!(!store.zoom(0.5, 0.5));
        assert!(!store.step(StepDirection::Widen, 10));
        assert_eq!(store.range(), None);
    }
}
