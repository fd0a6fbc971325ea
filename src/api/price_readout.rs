use serde::{Deserialize, Serialize};

use crate::core::OhlcPoint;
use crate::render::Color;

use super::RenderStyle;

/// OHLC header readout for the hovered candle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceReadout {
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    /// Volume in thousands, e.g. `"12K"`.
    pub volume: String,
    pub increasing: bool,
    pub color: Color,
}

impl PriceReadout {
    #[must_use]
    pub fn from_point(point: OhlcPoint, style: &RenderStyle) -> Self {
        let increasing = point.is_increasing();
        Self {
            open: format!("{:.2}", point.open),
            high: format!("{:.2}", point.high),
            low: format!("{:.2}", point.low),
            close: format!("{:.2}", point.close),
            volume: format!("{:.0}K", point.volume / 1_000.0),
            increasing,
            color: style.direction_color(increasing),
        }
    }

    /// Label/value pairs in display order.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, &str); 5] {
        [
            ("O", self.open.as_str()),
            ("H", self.high.as_str()),
            ("L", self.low.as_str()),
            ("C", self.close.as_str()),
            ("Volume", self.volume.as_str()),
        ]
    }
}
