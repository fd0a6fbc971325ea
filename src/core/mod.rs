pub mod candlestick;
pub mod chart_scales;
pub mod interval;
pub mod primitives;
pub mod range;
pub mod scale;
pub mod types;

pub use candlestick::{
    CandleGeometry, OhlcPoint, VolumeBarGeometry, candle_body_width, project_candles,
    project_volume_bars,
};
pub use chart_scales::ChartScales;
pub use interval::{Interval, TimeAxisFormat};
pub use range::{
    RangeIntent, RangeLimits, StepDirection, ViewportRangeStore, VisibleRange, default_window,
};
pub use scale::LinearScale;
pub use types::{Margin, PlotArea, Viewport};
