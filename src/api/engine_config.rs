use serde::{Deserialize, Serialize};

use crate::core::{Interval, Margin, RangeLimits, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::extensions::MarkerLayoutConfig;
use crate::interaction::{GestureConfig, TooltipConfig};

use super::RenderStyle;

/// Host device class; drives default chart height and mark tooltip presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceProfile {
    #[default]
    Desktop,
    Mobile,
}

/// Interaction constants shared by the range store, gestures and tooltips.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionTuning {
    pub default_visible_items: usize,
    pub min_visible_items: usize,
    pub zoom_step_ratio: f64,
    /// Item count moved or added per toolbar step.
    pub step_items: usize,
    pub gesture_idle_ms: u64,
    pub double_tap_ms: u64,
    pub pinch_noise_ratio: f64,
    pub wheel_pan_damping: f64,
    pub mark_hit_radius_px: f64,
    pub hide_delay_ms: u64,
    pub touch_crosshair_linger_ms: u64,
}

impl Default for InteractionTuning {
    fn default() -> Self {
        Self {
            default_visible_items: 50,
            min_visible_items: 5,
            zoom_step_ratio: 0.1,
            step_items: 10,
            gesture_idle_ms: 100,
            double_tap_ms: 300,
            pinch_noise_ratio: 0.05,
            wheel_pan_damping: 0.5,
            mark_hit_radius_px: 12.0,
            hide_delay_ms: 300,
            touch_crosshair_linger_ms: 2_000,
        }
    }
}

impl InteractionTuning {
    pub fn validate(self) -> ChartResult<Self> {
        for (value, name) in [
            (self.default_visible_items, "default_visible_items"),
            (self.min_visible_items, "min_visible_items"),
            (self.step_items, "step_items"),
        ] {
            if value == 0 {
                return Err(ChartError::InvalidConfig(format!(
                    "tuning `{name}` must be > 0"
                )));
            }
        }
        if self.min_visible_items > self.default_visible_items {
            return Err(ChartError::InvalidConfig(
                "tuning `min_visible_items` must not exceed `default_visible_items`".to_owned(),
            ));
        }
        if !self.zoom_step_ratio.is_finite()
            || self.zoom_step_ratio <= 0.0
            || self.zoom_step_ratio >= 1.0
        {
            return Err(ChartError::InvalidConfig(
                "tuning `zoom_step_ratio` must be finite and in (0, 1)".to_owned(),
            ));
        }
        for (value, name) in [
            (self.pinch_noise_ratio, "pinch_noise_ratio"),
            (self.wheel_pan_damping, "wheel_pan_damping"),
            (self.mark_hit_radius_px, "mark_hit_radius_px"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "tuning `{name}` must be finite and > 0"
                )));
            }
        }
        for (value, name) in [
            (self.gesture_idle_ms, "gesture_idle_ms"),
            (self.double_tap_ms, "double_tap_ms"),
            (self.hide_delay_ms, "hide_delay_ms"),
        ] {
            if value == 0 {
                return Err(ChartError::InvalidConfig(format!(
                    "tuning `{name}` must be > 0"
                )));
            }
        }
        Ok(self)
    }

    #[must_use]
    pub fn range_limits(self) -> RangeLimits {
        RangeLimits {
            default_visible_items: self.default_visible_items,
            min_visible_items: self.min_visible_items,
        }
    }

    #[must_use]
    pub fn gesture_config(self) -> GestureConfig {
        GestureConfig {
            idle_ms: self.gesture_idle_ms,
            double_tap_ms: self.double_tap_ms,
            pinch_noise_ratio: self.pinch_noise_ratio,
            wheel_pan_damping: self.wheel_pan_damping,
            zoom_step_ratio: self.zoom_step_ratio,
        }
    }

    #[must_use]
    pub fn tooltip_config(self, profile: DeviceProfile) -> TooltipConfig {
        TooltipConfig {
            hit_radius_px: self.mark_hit_radius_px,
            hide_delay_ms: self.hide_delay_ms,
            touch_crosshair_linger_ms: self.touch_crosshair_linger_ms,
            sticky_marks: profile == DeviceProfile::Mobile,
        }
    }
}

/// Pixel layout of the chart container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub margin: Margin,
    pub desktop_height_px: u32,
    pub mobile_height_px: u32,
    /// Toolbar height subtracted from the container while expanded.
    pub expanded_toolbar_px: u32,
    /// Minimum horizontal room per time-axis label.
    pub min_label_width_px: f64,
    /// Target number of horizontal grid lines / price labels.
    pub price_tick_count: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: Margin::default(),
            desktop_height_px: 500,
            mobile_height_px: 300,
            expanded_toolbar_px: 50,
            min_label_width_px: 80.0,
            price_tick_count: 10,
        }
    }
}

impl LayoutConfig {
    #[must_use]
    pub fn height_for(self, profile: DeviceProfile) -> u32 {
        match profile {
            DeviceProfile::Desktop => self.desktop_height_px,
            DeviceProfile::Mobile => self.mobile_height_px,
        }
    }

    pub fn validate(self) -> ChartResult<Self> {
        if !self.margin.is_valid() {
            return Err(ChartError::InvalidConfig(
                "layout margins must be finite and >= 0".to_owned(),
            ));
        }
        if self.desktop_height_px == 0 || self.mobile_height_px == 0 {
            return Err(ChartError::InvalidConfig(
                "layout heights must be > 0".to_owned(),
            ));
        }
        if !self.min_label_width_px.is_finite() || self.min_label_width_px <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "layout `min_label_width_px` must be finite and > 0".to_owned(),
            ));
        }
        if self.price_tick_count == 0 {
            return Err(ChartError::InvalidConfig(
                "layout `price_tick_count` must be > 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Public engine bootstrap configuration.
///
/// This type is serializable so host applications can persist/load chart setup
/// without inventing their own ad-hoc format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartEngineConfig {
    /// Initial container size; the chart height itself follows the layout.
    pub viewport: Viewport,
    #[serde(default)]
    pub profile: DeviceProfile,
    #[serde(default)]
    pub initial_interval: Interval,
    #[serde(default = "default_intervals")]
    pub intervals: Vec<Interval>,
    #[serde(default)]
    pub tuning: InteractionTuning,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub style: RenderStyle,
    #[serde(default)]
    pub markers: MarkerLayoutConfig,
}

impl ChartEngineConfig {
    /// Creates a desktop config with default tuning and style.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            profile: DeviceProfile::default(),
            initial_interval: Interval::default(),
            intervals: default_intervals(),
            tuning: InteractionTuning::default(),
            layout: LayoutConfig::default(),
            style: RenderStyle::default(),
            markers: MarkerLayoutConfig::default(),
        }
    }

    #[must_use]
    pub fn with_profile(mut self, profile: DeviceProfile) -> Self {
        self.profile = profile;
        self
    }

    #[must_use]
    pub fn with_initial_interval(mut self, interval: Interval) -> Self {
        self.initial_interval = interval;
        self
    }

    /// Sets the intervals offered by the toolbar.
    #[must_use]
    pub fn with_intervals(mut self, intervals: Vec<Interval>) -> Self {
        self.intervals = intervals;
        self
    }

    #[must_use]
    pub fn with_tuning(mut self, tuning: InteractionTuning) -> Self {
        self.tuning = tuning;
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.layout.margin = margin;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_markers(mut self, markers: MarkerLayoutConfig) -> Self {
        self.markers = markers;
        self
    }

    /// Checks every section; the engine constructor calls this.
    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        if self.intervals.is_empty() {
            return Err(ChartError::InvalidConfig(
                "interval list must not be empty".to_owned(),
            ));
        }
        if !self.intervals.contains(&self.initial_interval) {
            return Err(ChartError::InvalidConfig(format!(
                "initial interval `{}` is not in the interval list",
                self.initial_interval
            )));
        }
        self.tuning.validate()?;
        self.layout.validate()?;
        self.markers.validate()?;
        self.style.validate()
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to serialize config: {e}")))
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse config: {e}")))
    }
}

fn default_intervals() -> Vec<Interval> {
    vec![
        Interval::OneMinute,
        Interval::FiveMinutes,
        Interval::FifteenMinutes,
        Interval::ThirtyMinutes,
        Interval::OneHour,
        Interval::FourHours,
        Interval::OneDay,
        Interval::ThreeDays,
        Interval::OneWeek,
        Interval::OneMonth,
    ]
}

#[cfg(test)]
mod tests {
    use super::{ChartEngineConfig, DeviceProfile, InteractionTuning};
    use crate::core::{Interval, Viewport};

    #[test]
    fn json_without_optional_sections_uses_defaults() {
        let config = ChartEngineConfig::from_json_str(
            r#"{ "viewport": { "width": 800, "height": 600 }, "profile": "mobile" }"#,
        )
        .expect("parse");
        assert_eq!(config.profile, DeviceProfile::Mobile);
        assert_eq!(config.initial_interval, Interval::FifteenMinutes);
        assert_eq!(config.tuning, InteractionTuning::default());
        assert_eq!(config.layout.height_for(config.profile), 300);
        config.validate().expect("valid");
    }

    #[test]
    fn json_round_trip_preserves_tuning() {
        let config = ChartEngineConfig::new(Viewport::new(640, 480)).with_tuning(InteractionTuning {
            step_items: 25,
            ..InteractionTuning::default()
        });
        let json = config.to_json_pretty().expect("serialize");
        let parsed = ChartEngineConfig::from_json_str(&json).expect("parse");
        assert_eq!(parsed.tuning, config.tuning);
        assert_eq!(parsed.intervals, config.intervals);
        assert_eq!(parsed.layout.margin, config.layout.margin);
    }

    #[test]
    fn validate_rejects_bad_tuning_and_interval_list() {
        let base = ChartEngineConfig::new(Viewport::new(640, 480));
        let zero_zoom = base.clone().with_tuning(InteractionTuning {
            zoom_step_ratio: 0.0,
            ..InteractionTuning::default()
        });
        assert!(zero_zoom.validate().is_err());

        let missing_initial = base
            .clone()
            .with_initial_interval(Interval::OneSecond);
        assert!(missing_initial.validate().is_err());

        assert!(ChartEngineConfig::from_json_str("{").is_err());
    }
}
