//! Optional layers drawn on top of the candle series, and host observers.

pub mod listeners;
pub mod markers;

pub use listeners::{ChartEvent, ChartListener, ListenerContext};
pub use markers::{MarkPoint, MarkerAnchor, MarkerLayoutConfig, layout_markers};
