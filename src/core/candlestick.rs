use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

use crate::core::ChartScales;
use crate::core::primitives::{datetime_to_unix_millis, decimal_to_f64};
use crate::error::ChartResult;

/// One candle of the price series.
///
/// `low <= min(open, close)` and `high >= max(open, close)` are expected from
/// upstream but not enforced: projection and hit-testing tolerate
/// violations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcPoint {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcPoint {
    #[must_use]
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Converts strongly-typed temporal/decimal input into a point.
    pub fn from_decimal(
        time: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> ChartResult<Self> {
        Ok(Self::new(
            datetime_to_unix_millis(time),
            decimal_to_f64(open, "open")?,
            decimal_to_f64(high, "high")?,
            decimal_to_f64(low, "low")?,
            decimal_to_f64(close, "close")?,
            decimal_to_f64(volume, "volume")?,
        ))
    }

    /// Rising candle: strictly `close > open`. Flat candles count as falling.
    #[must_use]
    pub fn is_increasing(self) -> bool {
        self.close > self.open
    }
}

/// Projected candle geometry in plot-local pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandleGeometry {
    pub center_x: f64,
    pub body_left: f64,
    pub body_right: f64,
    pub body_top: f64,
    pub body_bottom: f64,
    pub wick_top: f64,
    pub wick_bottom: f64,
    pub is_increasing: bool,
}

/// Projected volume bar in plot-local pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeBarGeometry {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub is_increasing: bool,
}

/// Body width for `slice_len` candles sharing `inner_width` pixels.
///
/// Each candle gets 60% of its band, never less than one pixel.
#[must_use]
pub fn candle_body_width(inner_width: f64, slice_len: usize) -> f64 {
    let band = inner_width / slice_len.max(1) as f64;
    if band.is_finite() {
        (band * 0.6).max(1.0)
    } else {
        1.0
    }
}

/// Projects candles into deterministic render geometry.
///
/// Pure and side-effect free so it serves both rendering and regression tests.
#[must_use]
pub fn project_candles(
    points: &[OhlcPoint],
    scales: &ChartScales,
    body_width_px: f64,
) -> Vec<CandleGeometry> {
    #[cfg(feature = "parallel-projection")]
    {
        points
            .par_iter()
            .map(|point| project_single_candle(*point, scales, body_width_px))
            .collect()
    }

    #[cfg(not(feature = "parallel-projection"))]
    {
        points
            .iter()
            .map(|point| project_single_candle(*point, scales, body_width_px))
            .collect()
    }
}

fn project_single_candle(
    point: OhlcPoint,
    scales: &ChartScales,
    body_width_px: f64,
) -> CandleGeometry {
    let half = body_width_px / 2.0;
    let center_x = scales.time_to_x(point.timestamp);
    let open_y = scales.price_to_y(point.open);
    let close_y = scales.price_to_y(point.close);
    let high_y = scales.price_to_y(point.high);
    let low_y = scales.price_to_y(point.low);

    CandleGeometry {
        center_x,
        body_left: center_x - half,
        body_right: center_x + half,
        body_top: open_y.min(close_y),
        body_bottom: open_y.max(close_y),
        wick_top: high_y.min(low_y),
        wick_bottom: high_y.max(low_y),
        is_increasing: point.is_increasing(),
    }
}

/// Projects volume bars into the bottom band of the plot.
#[must_use]
pub fn project_volume_bars(
    points: &[OhlcPoint],
    scales: &ChartScales,
    body_width_px: f64,
) -> Vec<VolumeBarGeometry> {
    let baseline = scales.volume_baseline_y();
    points
        .iter()
        .map(|point| {
            let top = scales.volume_to_y(point.volume.max(0.0));
            VolumeBarGeometry {
                left: scales.time_to_x(point.timestamp) - body_width_px / 2.0,
                top,
                width: body_width_px,
                height: (baseline - top).max(0.0),
                is_increasing: point.is_increasing(),
            }
        })
        .collect()
}
