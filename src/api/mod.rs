//! Public chart engine: dataset, visible window, interaction and frame building.
//!
//! `ChartEngine` is split across controller files, each adding one concern as
//! an `impl` block over the shared state declared in `engine`.

mod axis_ticks;
mod data_controller;
mod data_provider;
mod engine;
mod engine_config;
mod engine_init;
mod interaction_controller;
mod layout_controller;
mod listener_dispatch;
mod listener_registry;
mod price_readout;
mod range_controller;
mod render_frame_builder;
mod render_style;
mod view_projection;

pub use axis_ticks::{
    PriceTick, TimeTick, nice_ticks, price_ticks, select_time_tick_indices, time_ticks,
};
pub use data_provider::{DataProvider, ReloadOutcome, ReloadResponse, ReloadTicket, fetch_reload};
pub use engine::{ChartEngine, ChartMode};
pub use engine_config::{ChartEngineConfig, DeviceProfile, InteractionTuning, LayoutConfig};
pub use layout_controller::{FullscreenCapability, MarkTooltip, MarkTooltipPlacement};
pub use price_readout::PriceReadout;
pub use render_style::RenderStyle;
