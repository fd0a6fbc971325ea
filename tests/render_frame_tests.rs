use approx::assert_relative_eq;
use candle_viewport::api::{ChartEngine, ChartEngineConfig, RenderStyle, price_ticks, time_ticks};
use candle_viewport::core::{ChartScales, OhlcPoint, Viewport};
use candle_viewport::extensions::MarkPoint;
use candle_viewport::render::{LineStrokeStyle, NullRenderer, TextHAlign};

// 2024-03-05 00:00:00 UTC
const MARCH_5: i64 = 1_709_596_800_000;
const MINUTE: i64 = 60_000;

fn series(count: usize) -> Vec<OhlcPoint> {
    (0..count)
        .map(|i| {
            let open = 200.0 + (i % 5) as f64;
            let close = if i % 3 == 0 { open - 1.0 } else { open + 1.0 };
            OhlcPoint::new(
                MARCH_5 + i as i64 * MINUTE,
                open,
                open + 3.0,
                open - 3.0,
                close,
                2_000.0,
            )
        })
        .collect()
}

fn build_engine() -> ChartEngine<NullRenderer> {
    let config = ChartEngineConfig::new(Viewport::new(800, 600));
    let mut engine = ChartEngine::new(NullRenderer::default(), config).expect("engine init");
    engine.set_dataset(series(300), Vec::new());
    engine
}

struct ExpectedTicks {
    price: usize,
    time: usize,
    time_lines: usize,
}

fn expected_ticks(engine: &ChartEngine<NullRenderer>) -> ExpectedTicks {
    let plot = engine.plot_area();
    let slice = engine.visible_slice();
    let scales = ChartScales::from_slice(slice, plot.width, plot.height);
    let price = price_ticks(
        scales.price_scale().domain(),
        engine.config().layout.price_tick_count,
    );
    let time = time_ticks(
        slice,
        plot.width,
        engine.config().layout.min_label_width_px,
        engine.interval().time_axis_format(),
    );
    ExpectedTicks {
        price: price.len(),
        time: time.len(),
        time_lines: time.iter().map(|tick| tick.lines().count()).sum(),
    }
}

#[test]
fn frame_contains_grid_candles_volume_and_axes() {
    let engine = build_engine();
    let frame = engine.build_render_frame();
    let ticks = expected_ticks(&engine);
    assert!(ticks.price > 0);
    assert!(ticks.time > 0);

    assert_eq!(frame.viewport, Viewport::new(800, 500));
    assert_eq!(frame.rects.len(), 100);
    assert_eq!(frame.lines.len(), ticks.price + ticks.time + 50 + 2);
    assert_eq!(frame.texts.len(), ticks.price + ticks.time_lines);
    assert!(frame.circles.is_empty());
    frame.validate().expect("valid frame");

    let grid = &frame.lines[0];
    assert_eq!(grid.stroke_style, LineStrokeStyle::Dashed(3));
    assert!(frame.texts.iter().any(|text| text.text.starts_with('$')));
}

#[test]
fn candle_and_volume_colors_follow_direction() {
    let engine = build_engine();
    let frame = engine.build_render_frame();
    let style = RenderStyle::default();
    let first = engine.visible_slice()[0];

    let volume = frame.rects[0];
    assert_relative_eq!(volume.fill_color.alpha, 0.3);
    let body = frame.rects[50];
    assert_eq!(body.fill_color, style.direction_color(first.is_increasing()));
    assert_relative_eq!(body.border_width, 1.0);

    let plot = engine.plot_area();
    for rect in &frame.rects {
        assert!(rect.x >= plot.left - 10.0 && rect.x + rect.width <= plot.right() + 10.0);
        assert!(rect.y >= plot.top - 1e-9 && rect.y + rect.height <= plot.bottom() + 1e-9);
    }
}

#[test]
fn markers_draw_a_circle_and_bold_label() {
    let mut engine = build_engine();
    let slice = engine.visible_slice().to_vec();
    engine.set_marks(vec![
        MarkPoint::new(slice[3].timestamp, "B"),
        MarkPoint::new(slice[3].timestamp, "S"),
        MarkPoint::new(slice[0].timestamp - 1, "X"),
    ]);
    let frame = engine.build_render_frame();

    assert_eq!(frame.circles.len(), 2);
    let lower = frame.circles[0];
    let upper = frame.circles[1];
    assert_relative_eq!(lower.center_x, upper.center_x);
    assert!(upper.center_y < lower.center_y);
    assert_relative_eq!(
        lower.center_y - upper.center_y,
        lower.radius * 2.0 + 2.0,
        epsilon = 1e-9
    );

    let labels: Vec<_> = frame.texts.iter().filter(|text| text.bold).collect();
    assert_eq!(labels.len(), 2);
    assert_eq!(labels[0].text, "B");
    assert_eq!(labels[0].h_align, TextHAlign::Center);
}

#[test]
fn crosshair_adds_guides_and_readout_boxes() {
    let mut engine = build_engine();
    let before = engine.build_render_frame();
    let plot = engine.plot_area();
    let scales = ChartScales::from_slice(engine.visible_slice(), plot.width, plot.height);
    let target = engine.visible_slice()[10];
    let x = plot.left + scales.time_to_x(target.timestamp);
    let y = plot.top + 200.0;

    assert!(engine.pointer_move(x, y, 0));
    let frame = engine.build_render_frame();
    assert_eq!(frame.lines.len(), before.lines.len() + 2);
    assert_eq!(frame.rects.len(), before.rects.len() + 2);
    assert_eq!(frame.texts.len(), before.texts.len() + 2);

    let horizontal = frame.lines[frame.lines.len() - 2];
    assert_relative_eq!(horizontal.y1, y);
    assert_eq!(horizontal.stroke_style, LineStrokeStyle::Dashed(3));

    let price_box = frame.rects[frame.rects.len() - 2];
    assert_relative_eq!(price_box.x, plot.right());
    assert_relative_eq!(price_box.width, 60.0);
    assert_relative_eq!(price_box.corner_radius, 3.0);

    let price_text = &frame.texts[frame.texts.len() - 2];
    let expected_price = scales.y_to_price(200.0);
    assert_eq!(price_text.text, format!("{expected_price:.2}"));

    let time_text = &frame.texts[frame.texts.len() - 1];
    assert_eq!(time_text.text, "2024/03/05 04:20:00");
    let time_box = frame.rects[frame.rects.len() - 1];
    assert_relative_eq!(time_box.width, 19.0 * 6.0);
    assert_relative_eq!(time_box.x + time_box.width / 2.0, x, epsilon = 1e-9);
}

#[test]
fn render_hands_the_frame_to_the_backend() {
    let mut engine = build_engine();
    engine.render().expect("render");
    engine.render().expect("render");
    let renderer = engine.renderer();
    assert_eq!(renderer.frames_rendered, 2);
    assert_eq!(renderer.last_rect_count, 100);
    assert!(renderer.last_line_count > 52);
}
