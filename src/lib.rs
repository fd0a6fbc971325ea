//! candle-viewport: headless viewport and interaction engine for candlestick charts.
//!
//! The engine owns the dataset, the visible index window, gesture and tooltip
//! state, and turns them into backend-agnostic render frames. Hosts feed it
//! input events with explicit timestamps and draw the frames it produces.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartEngine, ChartEngineConfig};
pub use error::{ChartError, ChartResult};
