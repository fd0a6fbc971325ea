use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::render::{Color, LineStrokeStyle};

/// Style contract for the render frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    pub increase_color: Color,
    pub decrease_color: Color,
    /// Readout color when no point is hovered.
    pub neutral_color: Color,
    pub grid_line_color: Color,
    pub grid_line_style: LineStrokeStyle,
    pub axis_line_color: Color,
    pub axis_label_color: Color,
    pub axis_label_font_size_px: f64,
    /// Vertical distance between the two lines of a split time label.
    pub axis_label_line_height_px: f64,
    pub wick_width_px: f64,
    pub body_border_width_px: f64,
    pub volume_opacity: f64,
    pub marker_fill_color: Color,
    pub marker_stroke_color: Color,
    pub marker_stroke_width_px: f64,
    pub marker_label_color: Color,
    pub marker_label_font_size_px: f64,
    pub crosshair_line_color: Color,
    pub crosshair_line_style: LineStrokeStyle,
    pub crosshair_label_fill_color: Color,
    pub crosshair_label_text_color: Color,
    pub crosshair_label_font_size_px: f64,
    pub crosshair_label_height_px: f64,
    pub crosshair_label_corner_radius_px: f64,
    /// Width estimate per character of the time readout box.
    pub crosshair_time_char_width_px: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            increase_color: Color::from_rgb8(0x4c, 0xaf, 0x50),
            decrease_color: Color::from_rgb8(0xff, 0x57, 0x22),
            neutral_color: Color::from_rgb8(0x38, 0x38, 0x38),
            grid_line_color: Color::from_rgb8(0xe0, 0xe0, 0xe0),
            grid_line_style: LineStrokeStyle::Dashed(3),
            axis_line_color: Color::rgba(0.0, 0.0, 0.0, 0.1),
            axis_label_color: Color::rgba(0.0, 0.0, 0.0, 0.6),
            axis_label_font_size_px: 10.0,
            axis_label_line_height_px: 12.0,
            wick_width_px: 2.0,
            body_border_width_px: 1.0,
            volume_opacity: 0.3,
            marker_fill_color: Color::rgb(0.0, 0.0, 1.0),
            marker_stroke_color: Color::rgb(1.0, 1.0, 1.0),
            marker_stroke_width_px: 1.0,
            marker_label_color: Color::rgb(1.0, 1.0, 1.0),
            marker_label_font_size_px: 7.0,
            crosshair_line_color: Color::rgba(0.0, 0.0, 0.0, 0.3),
            crosshair_line_style: LineStrokeStyle::Dashed(3),
            crosshair_label_fill_color: Color::rgba(0.0, 0.0, 0.0, 0.7),
            crosshair_label_text_color: Color::rgb(1.0, 1.0, 1.0),
            crosshair_label_font_size_px: 10.0,
            crosshair_label_height_px: 20.0,
            crosshair_label_corner_radius_px: 3.0,
            crosshair_time_char_width_px: 6.0,
        }
    }
}

impl RenderStyle {
    /// Candle, wick and volume color for a point direction.
    #[must_use]
    pub fn direction_color(&self, increasing: bool) -> Color {
        if increasing {
            self.increase_color
        } else {
            self.decrease_color
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        for color in [
            self.increase_color,
            self.decrease_color,
            self.neutral_color,
            self.grid_line_color,
            self.axis_line_color,
            self.axis_label_color,
            self.marker_fill_color,
            self.marker_stroke_color,
            self.marker_label_color,
            self.crosshair_line_color,
            self.crosshair_label_fill_color,
            self.crosshair_label_text_color,
        ] {
            color.validate()?;
        }
        for (value, name) in [
            (self.axis_label_font_size_px, "axis_label_font_size_px"),
            (self.axis_label_line_height_px, "axis_label_line_height_px"),
            (self.wick_width_px, "wick_width_px"),
            (self.marker_label_font_size_px, "marker_label_font_size_px"),
            (self.crosshair_label_font_size_px, "crosshair_label_font_size_px"),
            (self.crosshair_label_height_px, "crosshair_label_height_px"),
            (self.crosshair_time_char_width_px, "crosshair_time_char_width_px"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "render style `{name}` must be finite and > 0"
                )));
            }
        }
        for (value, name) in [
            (self.body_border_width_px, "body_border_width_px"),
            (self.marker_stroke_width_px, "marker_stroke_width_px"),
            (
                self.crosshair_label_corner_radius_px,
                "crosshair_label_corner_radius_px",
            ),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "render style `{name}` must be finite and >= 0"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.volume_opacity) {
            return Err(ChartError::InvalidConfig(
                "render style `volume_opacity` must be in [0, 1]".to_owned(),
            ));
        }
        Ok(())
    }
}
