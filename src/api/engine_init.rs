use tracing::debug;

use crate::core::ViewportRangeStore;
use crate::error::ChartResult;
use crate::interaction::{GestureInterpreter, TooltipMachine};
use crate::render::Renderer;

use super::{ChartEngine, ChartEngineConfig, ChartMode, engine::ReloadState};

impl<R: Renderer> ChartEngine<R> {
    /// Creates an engine with an empty dataset after validating `config`.
    pub fn new(renderer: R, config: ChartEngineConfig) -> ChartResult<Self> {
        config.validate()?;

        let tuning = config.tuning;
        debug!(
            width = config.viewport.width,
            height = config.viewport.height,
            profile = ?config.profile,
            interval = %config.initial_interval,
            "chart engine created"
        );
        Ok(Self {
            renderer,
            container: config.viewport,
            dataset: Vec::new(),
            marks: Vec::new(),
            dataset_generation: 0,
            interval: config.initial_interval,
            range: ViewportRangeStore::new(tuning.range_limits()),
            gestures: GestureInterpreter::new(tuning.gesture_config()),
            tooltip: TooltipMachine::new(tuning.tooltip_config(config.profile)),
            reload: ReloadState::default(),
            mode: ChartMode::default(),
            fullscreen: None,
            listeners: Vec::new(),
            config,
        })
    }
}
