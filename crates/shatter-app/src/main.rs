//! Shatter 演示程序入口
//! 用指针事件在画布上绘制示例图形，选中全部图形构建平面图，
//! 最后把渲染帧摘要以 JSON 输出到标准输出。
//!
//! 用法：`shatter [config.json]`

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use shatter_core::config::SketchConfig;
use shatter_core::math::Point2;
use shatter_ui::{Canvas, CanvasMode, Modifiers, MouseButton, RenderFrame};

const VIEWPORT_WIDTH: u32 = 1400;
const VIEWPORT_HEIGHT: u32 = 900;

/// 输出的帧摘要
#[derive(Debug, Serialize)]
struct FrameSummary<'a> {
    mode: &'static str,
    status: &'a str,
    world_window: (f64, f64, f64, f64),
    shapes: Vec<ShapeSummary>,
    intersections: &'a [Point2],
    graph_nodes: &'a [Point2],
    graph_edges: usize,
}

#[derive(Debug, Serialize)]
struct ShapeSummary {
    id: u64,
    kind: String,
    tessellated_points: usize,
    selected: bool,
}

impl<'a> FrameSummary<'a> {
    fn new(frame: &'a RenderFrame) -> Self {
        Self {
            mode: frame.mode.name(),
            status: &frame.status_message,
            world_window: frame.world_window,
            shapes: frame
                .shapes
                .iter()
                .map(|s| ShapeSummary {
                    id: s.id.0,
                    kind: s.kind.to_string(),
                    tessellated_points: s.points.len(),
                    selected: s.selected,
                })
                .collect(),
            intersections: &frame.intersections,
            graph_nodes: &frame.graph_nodes,
            graph_edges: frame.graph_edges.len(),
        }
    }
}

fn load_config() -> Result<SketchConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {}", path))?;
            let config = serde_json::from_str(&text)
                .with_context(|| format!("Invalid config: {}", path))?;
            info!("Loaded config from: {}", path);
            Ok(config)
        }
        None => Ok(SketchConfig::default()),
    }
}

/// 在世界坐标处单击
fn click(canvas: &mut Canvas, x: f64, y: f64) {
    let screen = canvas.viewport().world_to_screen(Point2::new(x, y));
    canvas.pointer_move(screen);
    canvas.pointer_down(screen, MouseButton::Left, Modifiers::NONE);
    canvas.pointer_up(MouseButton::Left);
}

fn draw(canvas: &mut Canvas, mode: CanvasMode, points: &[(f64, f64)]) {
    canvas.change_mode(mode);
    for &(x, y) in points {
        click(canvas, x, y);
    }
}

fn create_demo_content(canvas: &mut Canvas) {
    // 三条竖线
    for i in 0..3 {
        let x = -300.0 + i as f64 * 300.0;
        draw(canvas, CanvasMode::CreateLine, &[(x, -500.0), (x, 500.0)]);
    }

    // 圆：圆心 + 圆周上一点
    draw(canvas, CanvasMode::CreateCircle, &[(0.0, 0.0), (400.0, 0.0)]);

    // 三点圆弧：起点、终点、弧上一点
    draw(
        canvas,
        CanvasMode::CreateArc,
        &[(-600.0, 200.0), (600.0, 200.0), (0.0, 700.0)],
    );

    // 二次贝塞尔：起点、终点、控制点
    draw(
        canvas,
        CanvasMode::CreateQuadBezier,
        &[(-600.0, -300.0), (600.0, -300.0), (0.0, 300.0)],
    );

    // 三次贝塞尔：起点、终点、两个控制点
    draw(
        canvas,
        CanvasMode::CreateCubicBezier,
        &[(-600.0, -450.0), (600.0, -450.0), (-200.0, 100.0), (200.0, -900.0)],
    );

    // 多段线，右键结束
    draw(
        canvas,
        CanvasMode::CreatePolyline,
        &[(-700.0, -100.0), (-100.0, 100.0), (100.0, -100.0), (700.0, 100.0)],
    );
    let anchor = canvas.viewport().world_to_screen(Point2::new(700.0, 100.0));
    canvas.pointer_down(anchor, MouseButton::Right, Modifiers::NONE);

    info!("Created {} demo shapes", canvas.model().len());
}

fn main() -> Result<()> {
    // 初始化日志
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_max_level(Level::INFO)
            .with_writer(std::io::stderr)
            .finish(),
    )?;

    info!("Starting Shatter...");

    let config = load_config()?;
    let mut canvas = Canvas::new(config, VIEWPORT_WIDTH, VIEWPORT_HEIGHT);

    create_demo_content(&mut canvas);
    canvas.fit_to_view();

    canvas.change_mode(CanvasMode::Select);
    canvas.select_all();
    canvas.build_graph()?;

    // 悬停在原点附近，输出拾取结果
    let probe = canvas.viewport().world_to_screen(Point2::new(10.0, 10.0));
    canvas.pointer_move(probe);
    if let Some(hit) = canvas.hover().hit() {
        info!(
            "Hovering {} at ({:.3}, {:.3})",
            hit.shape, hit.point.x, hit.point.y
        );
    }

    let frame = canvas.render_frame();
    let summary = FrameSummary::new(&frame);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
