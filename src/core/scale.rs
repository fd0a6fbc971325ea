use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Linear map from a data domain onto a pixel range, and back.
///
/// The range may be inverted (`range_start > range_end`), which is how price
/// axes put larger values higher on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        if !domain.0.is_finite() || !domain.1.is_finite() || domain.0 == domain.1 {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(ChartError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_start: domain.0,
            domain_end: domain.1,
            range_start: range.0,
            range_end: range.1,
        })
    }

    /// Builds a scale, widening a degenerate domain by `min_span` around its center.
    ///
    /// Falls back to `fallback_domain` when the input is not finite, so callers
    /// on interactive paths always get a usable mapping.
    #[must_use]
    pub fn fitted(
        domain: (f64, f64),
        range: (f64, f64),
        min_span: f64,
        fallback_domain: (f64, f64),
    ) -> Self {
        let domain = normalize_domain(domain.0, domain.1, min_span).unwrap_or(fallback_domain);
        let range = if range.0.is_finite() && range.1.is_finite() {
            range
        } else {
            (0.0, 1.0)
        };
        Self {
            domain_start: domain.0,
            domain_end: domain.1,
            range_start: range.0,
            range_end: range.1,
        }
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    /// Maps a domain value to pixels. Non-finite input maps to the range start.
    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.range_start;
        }
        let normalized = (value - self.domain_start) / (self.domain_end - self.domain_start);
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    /// Maps a pixel back into the domain. A collapsed range maps to the domain start.
    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let span = self.range_end - self.range_start;
        if !pixel.is_finite() || span == 0.0 {
            return self.domain_start;
        }
        let normalized = (pixel - self.range_start) / span;
        self.domain_start + normalized * (self.domain_end - self.domain_start)
    }
}

fn normalize_domain(start: f64, end: f64, min_span: f64) -> Option<(f64, f64)> {
    if !start.is_finite() || !end.is_finite() {
        return None;
    }

    if start == end {
        let half = if min_span.is_finite() && min_span > 0.0 {
            min_span / 2.0
        } else {
            0.5
        };
        return Some((start - half, end + half));
    }

    Some((start.min(end), start.max(end)))
}
