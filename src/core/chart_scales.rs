use serde::{Deserialize, Serialize};

use crate::core::{LinearScale, OhlcPoint};

const EMPTY_TIME_DOMAIN: (f64, f64) = (0.0, 1.0);
const EMPTY_PRICE_DOMAIN: (f64, f64) = (0.0, 100.0);
const EMPTY_VOLUME_DOMAIN: (f64, f64) = (0.0, 100.0);

const PRICE_FLOOR_RATIO: f64 = 0.99;
const PRICE_CEIL_RATIO: f64 = 1.01;
const VOLUME_HEADROOM_RATIO: f64 = 1.1;
/// Volume bars are confined to the bottom 20% of the plot.
const VOLUME_BAND_RATIO: f64 = 0.2;

/// Time, price and volume scales derived from one visible slice.
///
/// All coordinates are plot-local: `x` in `[0, width]`, `y` in `[0, height]`
/// with `y = 0` at the top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartScales {
    x: LinearScale,
    price: LinearScale,
    volume: LinearScale,
    width: f64,
    height: f64,
    empty: bool,
}

impl ChartScales {
    /// Builds scales for `slice` inside a `width` x `height` plot.
    ///
    /// The time domain is padded by half a candle bucket on both sides so the
    /// first and last candles are not clipped. An empty slice yields default
    /// scales instead of failing.
    #[must_use]
    pub fn from_slice(slice: &[OhlcPoint], width: f64, height: f64) -> Self {
        if slice.is_empty() {
            return Self::empty(width, height);
        }

        let mut min_ts = i64::MAX;
        let mut max_ts = i64::MIN;
        let mut min_low = f64::INFINITY;
        let mut max_high = f64::NEG_INFINITY;
        let mut max_volume = f64::NEG_INFINITY;
        for point in slice {
            min_ts = min_ts.min(point.timestamp);
            max_ts = max_ts.max(point.timestamp);
            min_low = min_low.min(point.low);
            max_high = max_high.max(point.high);
            max_volume = max_volume.max(point.volume);
        }

        let min_ts = min_ts as f64;
        let max_ts = max_ts as f64;
        let half_bucket = (max_ts - min_ts) / (2.0 * slice.len() as f64);
        let x = LinearScale::fitted(
            (min_ts - half_bucket, max_ts + half_bucket),
            (0.0, width),
            1.0,
            EMPTY_TIME_DOMAIN,
        );

        let price = LinearScale::fitted(
            (min_low * PRICE_FLOOR_RATIO, max_high * PRICE_CEIL_RATIO),
            (height, 0.0),
            1.0,
            EMPTY_PRICE_DOMAIN,
        );

        let volume_domain = if max_volume.is_finite() && max_volume > 0.0 {
            (0.0, max_volume * VOLUME_HEADROOM_RATIO)
        } else {
            (0.0, 1.0)
        };
        let volume = LinearScale::fitted(
            volume_domain,
            (height, height * (1.0 - VOLUME_BAND_RATIO)),
            1.0,
            EMPTY_VOLUME_DOMAIN,
        );

        Self {
            x,
            price,
            volume,
            width,
            height,
            empty: false,
        }
    }

    /// Default scales used while no data is visible (e.g. between reloads).
    #[must_use]
    pub fn empty(width: f64, height: f64) -> Self {
        Self {
            x: LinearScale::fitted(EMPTY_TIME_DOMAIN, (0.0, width), 1.0, EMPTY_TIME_DOMAIN),
            price: LinearScale::fitted(EMPTY_PRICE_DOMAIN, (height, 0.0), 1.0, EMPTY_PRICE_DOMAIN),
            volume: LinearScale::fitted(
                EMPTY_VOLUME_DOMAIN,
                (height, height * (1.0 - VOLUME_BAND_RATIO)),
                1.0,
                EMPTY_VOLUME_DOMAIN,
            ),
            width,
            height,
            empty: true,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn x_scale(&self) -> LinearScale {
        self.x
    }

    #[must_use]
    pub fn price_scale(&self) -> LinearScale {
        self.price
    }

    #[must_use]
    pub fn volume_scale(&self) -> LinearScale {
        self.volume
    }

    #[must_use]
    pub fn time_to_x(&self, timestamp_ms: i64) -> f64 {
        self.x.map(timestamp_ms as f64)
    }

    /// Inverts a plot-local x back into (fractional) epoch milliseconds.
    #[must_use]
    pub fn x_to_time(&self, x: f64) -> f64 {
        self.x.invert(x)
    }

    #[must_use]
    pub fn price_to_y(&self, price: f64) -> f64 {
        self.price.map(price)
    }

    #[must_use]
    pub fn y_to_price(&self, y: f64) -> f64 {
        self.price.invert(y)
    }

    #[must_use]
    pub fn volume_to_y(&self, volume: f64) -> f64 {
        self.volume.map(volume)
    }

    /// Plot-local y of zero volume (the plot bottom).
    #[must_use]
    pub fn volume_baseline_y(&self) -> f64 {
        self.height
    }
}
