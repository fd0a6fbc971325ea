use tracing::trace;

use crate::core::primitives::format_timestamp;
use crate::core::{OhlcPoint, PlotArea, project_candles, project_volume_bars};
use crate::error::ChartResult;
use crate::render::{
    CirclePrimitive, LinePrimitive, RectPrimitive, RenderFrame, Renderer, TextHAlign,
    TextPrimitive,
};

use super::ChartEngine;
use super::axis_ticks::{TimeTick, price_ticks, time_ticks};
use super::engine::slice_of;
use super::view_projection::ViewProjection;

const CROSSHAIR_TIME_PATTERN: &str = "%Y/%m/%d %H:%M:%S";
const AXIS_LABEL_GAP_PX: f64 = 6.0;
const CROSSHAIR_LINE_WIDTH_PX: f64 = 1.0;
const AXIS_LINE_WIDTH_PX: f64 = 1.0;
const GRID_LINE_WIDTH_PX: f64 = 1.0;

impl<R: Renderer> ChartEngine<R> {
    /// Materializes the current view into backend-agnostic primitives.
    ///
    /// Coordinates are viewport pixels. A hidden (mini) chart yields an empty frame.
    #[must_use]
    pub fn build_render_frame(&self) -> RenderFrame {
        let mut frame = RenderFrame::new(self.viewport());
        if self.mode.mini {
            return frame;
        }

        let projection = self.view_projection();
        let slice = slice_of(&self.dataset, projection.range);

        self.push_grid(&mut frame, &projection, slice);
        self.push_volume_bars(&mut frame, &projection, slice);
        self.push_candles(&mut frame, &projection, slice);
        self.push_markers(&mut frame, &projection);
        self.push_price_axis(&mut frame, &projection);
        self.push_time_axis(&mut frame, &projection, slice);
        self.push_crosshair(&mut frame, &projection, slice);

        trace!(
            rects = frame.rects.len(),
            lines = frame.lines.len(),
            circles = frame.circles.len(),
            texts = frame.texts.len(),
            "render frame built"
        );
        frame
    }

    /// Builds the current frame and hands it to the renderer.
    pub fn render(&mut self) -> ChartResult<()> {
        let frame = self.build_render_frame();
        frame.validate()?;
        self.renderer.render(&frame)
    }

    fn push_grid(&self, frame: &mut RenderFrame, projection: &ViewProjection, slice: &[OhlcPoint]) {
        let style = &self.config.style;
        let plot = projection.plot;
        let scales = &projection.scales;

        for tick in price_ticks(scales.price_scale().domain(), self.config.layout.price_tick_count) {
            let y = plot.top + scales.price_to_y(tick.price);
            frame.lines.push(
                LinePrimitive::new(
                    plot.left,
                    y,
                    plot.right(),
                    y,
                    GRID_LINE_WIDTH_PX,
                    style.grid_line_color,
                )
                .with_stroke_style(style.grid_line_style),
            );
        }
        for tick in self.visible_time_ticks(plot, slice) {
            let x = plot.left + scales.time_to_x(tick.timestamp);
            frame.lines.push(
                LinePrimitive::new(
                    x,
                    plot.top,
                    x,
                    plot.bottom(),
                    GRID_LINE_WIDTH_PX,
                    style.grid_line_color,
                )
                .with_stroke_style(style.grid_line_style),
            );
        }
    }

    fn push_volume_bars(
        &self,
        frame: &mut RenderFrame,
        projection: &ViewProjection,
        slice: &[OhlcPoint],
    ) {
        let style = &self.config.style;
        let plot = projection.plot;
        for bar in project_volume_bars(slice, &projection.scales, projection.candle_width) {
            if bar.height <= 0.0 {
                continue;
            }
            let color = style
                .direction_color(bar.is_increasing)
                .with_alpha(style.volume_opacity);
            frame.rects.push(RectPrimitive::new(
                plot.left + bar.left,
                plot.top + bar.top,
                bar.width,
                bar.height,
                color,
            ));
        }
    }

    fn push_candles(
        &self,
        frame: &mut RenderFrame,
        projection: &ViewProjection,
        slice: &[OhlcPoint],
    ) {
        let style = &self.config.style;
        let plot = projection.plot;
        for candle in project_candles(slice, &projection.scales, projection.candle_width) {
            let color = style.direction_color(candle.is_increasing);
            let x = plot.left + candle.center_x;
            frame.lines.push(LinePrimitive::new(
                x,
                plot.top + candle.wick_top,
                x,
                plot.top + candle.wick_bottom,
                style.wick_width_px,
                color,
            ));
            frame.rects.push(
                RectPrimitive::new(
                    plot.left + candle.body_left,
                    plot.top + candle.body_top,
                    candle.body_right - candle.body_left,
                    candle.body_bottom - candle.body_top,
                    color,
                )
                .with_border(style.body_border_width_px, color),
            );
        }
    }

    fn push_markers(&self, frame: &mut RenderFrame, projection: &ViewProjection) {
        let style = &self.config.style;
        let plot = projection.plot;
        for anchor in &projection.anchors {
            let x = plot.left + anchor.center_x;
            let y = plot.top + anchor.center_y;
            frame.circles.push(
                CirclePrimitive::new(x, y, anchor.radius, style.marker_fill_color)
                    .with_stroke(style.marker_stroke_width_px, style.marker_stroke_color),
            );
            let Some(mark) = self.marks.get(anchor.mark_index) else {
                continue;
            };
            if mark.kind.is_empty() {
                continue;
            }
            frame.texts.push(
                TextPrimitive::new(
                    mark.kind.clone(),
                    x,
                    y,
                    style.marker_label_font_size_px,
                    style.marker_label_color,
                    TextHAlign::Center,
                )
                .bold(),
            );
        }
    }

    fn push_price_axis(&self, frame: &mut RenderFrame, projection: &ViewProjection) {
        let style = &self.config.style;
        let plot = projection.plot;
        let scales = &projection.scales;
        let axis_x = plot.right();
        frame.lines.push(LinePrimitive::new(
            axis_x,
            plot.top,
            axis_x,
            plot.bottom(),
            AXIS_LINE_WIDTH_PX,
            style.axis_line_color,
        ));
        for tick in price_ticks(scales.price_scale().domain(), self.config.layout.price_tick_count) {
            frame.texts.push(TextPrimitive::new(
                tick.label,
                axis_x + AXIS_LABEL_GAP_PX,
                plot.top + scales.price_to_y(tick.price),
                style.axis_label_font_size_px,
                style.axis_label_color,
                TextHAlign::Left,
            ));
        }
    }

    fn push_time_axis(
        &self,
        frame: &mut RenderFrame,
        projection: &ViewProjection,
        slice: &[OhlcPoint],
    ) {
        let style = &self.config.style;
        let plot = projection.plot;
        let axis_y = plot.bottom();
        frame.lines.push(LinePrimitive::new(
            plot.left,
            axis_y,
            plot.right(),
            axis_y,
            AXIS_LINE_WIDTH_PX,
            style.axis_line_color,
        ));
        for tick in self.visible_time_ticks(plot, slice) {
            let x = plot.left + projection.scales.time_to_x(tick.timestamp);
            for (line_index, line) in tick.lines().enumerate() {
                let y = axis_y
                    + AXIS_LABEL_GAP_PX
                    + style.axis_label_font_size_px / 2.0
                    + line_index as f64 * style.axis_label_line_height_px;
                frame.texts.push(TextPrimitive::new(
                    line,
                    x,
                    y,
                    style.axis_label_font_size_px,
                    style.axis_label_color,
                    TextHAlign::Center,
                ));
            }
        }
    }

    /// Dashed crosshair plus the price readout box on the right axis and the
    /// time readout box on the bottom axis.
    fn push_crosshair(
        &self,
        frame: &mut RenderFrame,
        projection: &ViewProjection,
        slice: &[OhlcPoint],
    ) {
        let state = self.tooltip.state();
        let Some((x, y)) = state.crosshair() else {
            return;
        };
        let plot = projection.plot;
        if !plot.contains(x, y) {
            return;
        }
        let style = &self.config.style;
        let margin = self.config.layout.margin;

        frame.lines.push(
            LinePrimitive::new(
                plot.left,
                y,
                plot.right(),
                y,
                CROSSHAIR_LINE_WIDTH_PX,
                style.crosshair_line_color,
            )
            .with_stroke_style(style.crosshair_line_style),
        );
        frame.lines.push(
            LinePrimitive::new(
                x,
                plot.top,
                x,
                plot.bottom(),
                CROSSHAIR_LINE_WIDTH_PX,
                style.crosshair_line_color,
            )
            .with_stroke_style(style.crosshair_line_style),
        );

        let box_height = style.crosshair_label_height_px;
        let price = projection.scales.y_to_price(plot.local_y(y));
        if margin.right > 0.0 && price.is_finite() {
            frame.rects.push(
                RectPrimitive::new(
                    plot.right(),
                    y - box_height / 2.0,
                    margin.right,
                    box_height,
                    style.crosshair_label_fill_color,
                )
                .with_corner_radius(style.crosshair_label_corner_radius_px),
            );
            frame.texts.push(TextPrimitive::new(
                format!("{price:.2}"),
                plot.right() + margin.right / 2.0,
                y,
                style.crosshair_label_font_size_px,
                style.crosshair_label_text_color,
                TextHAlign::Center,
            ));
        }

        let Some(point) = state.hovered_point.and_then(|index| slice.get(index)) else {
            return;
        };
        let label = format_timestamp(point.timestamp, CROSSHAIR_TIME_PATTERN);
        let box_width = label.chars().count() as f64 * style.crosshair_time_char_width_px;
        frame.rects.push(
            RectPrimitive::new(
                x - box_width / 2.0,
                plot.bottom(),
                box_width,
                box_height,
                style.crosshair_label_fill_color,
            )
            .with_corner_radius(style.crosshair_label_corner_radius_px),
        );
        frame.texts.push(TextPrimitive::new(
            label,
            x,
            plot.bottom() + box_height / 2.0,
            style.crosshair_label_font_size_px,
            style.crosshair_label_text_color,
            TextHAlign::Center,
        ));
    }

    fn visible_time_ticks(&self, plot: PlotArea, slice: &[OhlcPoint]) -> Vec<TimeTick> {
        time_ticks(
            slice,
            plot.width,
            self.config.layout.min_label_width_px,
            self.interval.time_axis_format(),
        )
    }
}
