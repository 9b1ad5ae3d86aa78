//! 画布状态管理
//!
//! `Canvas` 接收指针、滚轮和命令事件，驱动模型、悬停拾取和视口，
//! 并输出与绘图后端无关的 [`RenderFrame`]。指针位置一律使用屏幕像素坐标。

use crate::render::{PreviewGeometry, RenderFrame, ShapeDraw};
use crate::viewport::Viewport;
use serde::{Deserialize, Serialize};
use shatter_core::config::SketchConfig;
use shatter_core::error::SketchError;
use shatter_core::geometry::{
    Circle, CircleArc, CubicBezier, PrimitiveKind, QuadBezier, Shape, ShapeKind,
};
use shatter_core::hover::HoverManager;
use shatter_core::math::Point2;
use shatter_core::model::Model;
use tracing::{info, warn};

/// 画布模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CanvasMode {
    Pan,
    Select,
    CreateLine,
    CreatePolyline,
    CreateCircle,
    CreateArc,
    CreateQuadBezier,
    CreateCubicBezier,
}

impl CanvasMode {
    pub fn name(&self) -> &'static str {
        match self {
            CanvasMode::Pan => "Pan",
            CanvasMode::Select => "Select",
            CanvasMode::CreateLine => "Line",
            CanvasMode::CreatePolyline => "Polyline",
            CanvasMode::CreateCircle => "Circle",
            CanvasMode::CreateArc => "Arc",
            CanvasMode::CreateQuadBezier => "Quad Bezier",
            CanvasMode::CreateCubicBezier => "Cubic Bezier",
        }
    }

    pub fn shortcut(&self) -> Option<&'static str> {
        match self {
            CanvasMode::Pan => Some("H"),
            CanvasMode::Select => Some("Space"),
            CanvasMode::CreateLine => Some("L"),
            CanvasMode::CreatePolyline => Some("P"),
            CanvasMode::CreateCircle => Some("C"),
            CanvasMode::CreateArc => Some("A"),
            CanvasMode::CreateQuadBezier => Some("Q"),
            CanvasMode::CreateCubicBezier => None,
        }
    }

    /// 是否为创建图形的模式
    pub fn is_creation(&self) -> bool {
        !matches!(self, CanvasMode::Pan | CanvasMode::Select)
    }
}

/// 鼠标按键
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// 键盘修饰键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        shift: false,
    };
}

/// 图形创建状态
#[derive(Debug, Clone, Default)]
pub struct CreationState {
    /// 已点击的点（世界坐标）
    pub points: Vec<Point2>,
    /// 跟随鼠标的预览点
    pub preview: Option<Point2>,
}

impl CreationState {
    pub fn clear(&mut self) {
        self.points.clear();
        self.preview = None;
    }

    pub fn is_active(&self) -> bool {
        !self.points.is_empty()
    }
}

/// 交互画布
#[derive(Debug)]
pub struct Canvas {
    model: Model,
    hover: HoverManager,
    viewport: Viewport,
    mode: CanvasMode,
    creation: CreationState,
    /// 平移拖动的上一个屏幕位置
    pan_anchor: Option<Point2>,
    config: SketchConfig,

    /// 状态栏消息
    pub status_message: String,
}

impl Canvas {
    pub fn new(config: SketchConfig, width: u32, height: u32) -> Self {
        let mut canvas = Self {
            model: Model::new(),
            hover: HoverManager::new(config.hover.pixel_box_size),
            viewport: Viewport::new(width, height),
            mode: CanvasMode::Pan,
            creation: CreationState::default(),
            pan_anchor: None,
            config,
            status_message: "Ready".to_string(),
        };
        canvas.sync_hover_box();
        canvas
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    pub fn hover(&self) -> &HoverManager {
        &self.hover
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn mode(&self) -> CanvasMode {
        self.mode
    }

    pub fn creation(&self) -> &CreationState {
        &self.creation
    }

    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    pub fn is_panning(&self) -> bool {
        self.pan_anchor.is_some()
    }

    /// 视图变化后同步拾取框大小
    fn sync_hover_box(&mut self) {
        self.hover
            .update_world_box_size(self.viewport.world_units_per_pixel());
    }

    // ---- 指针事件 ----

    pub fn pointer_move(&mut self, screen: Point2) {
        if let Some(anchor) = self.pan_anchor {
            self.viewport
                .pan_by_pixels(screen.x - anchor.x, screen.y - anchor.y);
            self.pan_anchor = Some(screen);
            self.sync_hover_box();
            return;
        }

        let world = self.viewport.screen_to_world(screen);
        match self.mode {
            CanvasMode::Select => {
                self.hover.update_hover(world, &self.model);
                self.creation.preview = None;
            }
            CanvasMode::Pan => {
                self.hover.clear();
                self.creation.preview = None;
            }
            _ => {
                self.hover.clear();
                self.creation.preview = Some(world);
            }
        }
    }

    pub fn pointer_down(&mut self, screen: Point2, button: MouseButton, modifiers: Modifiers) {
        if self.mode == CanvasMode::CreatePolyline && button == MouseButton::Right {
            if self.creation.points.len() > 1 {
                let points = std::mem::take(&mut self.creation.points);
                self.commit(ShapeKind::Polyline, &points);
            }
            self.creation.clear();
            return;
        }

        if button != MouseButton::Left {
            return;
        }

        match self.mode {
            CanvasMode::Pan => {
                self.pan_anchor = Some(screen);
            }
            CanvasMode::Select => self.click_select(modifiers),
            _ => {
                let world = self.viewport.screen_to_world(screen);
                self.creation.points.push(world);
                self.finalize_shape();
            }
        }
    }

    pub fn pointer_up(&mut self, button: MouseButton) {
        if button == MouseButton::Left {
            self.pan_anchor = None;
        }
    }

    /// 根据悬停图形更新选择集
    fn click_select(&mut self, modifiers: Modifiers) {
        match self.hover.hovered_shape() {
            Some(id) if modifiers.ctrl => {
                self.model.toggle_selection(id);
            }
            Some(id) => {
                if !self.model.is_selected(id) {
                    self.model.clear_selection();
                    self.model.add_to_selection(id);
                }
            }
            None if !modifiers.ctrl => self.model.clear_selection(),
            None => {}
        }
        self.status_message = format!("{} selected", self.model.selected_ids().len());
    }

    /// 点数足够时提交图形
    fn finalize_shape(&mut self) {
        let points = self.creation.points.as_slice();
        let ready = match (self.mode, points) {
            (CanvasMode::CreateLine, [_, _]) => Some((ShapeKind::Line, points.to_vec())),
            (CanvasMode::CreateCircle, [_, _]) => Some((ShapeKind::Circle, points.to_vec())),
            (CanvasMode::CreateArc, [_, _, _]) => Some((ShapeKind::CircleArc, points.to_vec())),
            // 点击顺序：起点、终点、控制点
            (CanvasMode::CreateQuadBezier, &[p0, p2, p1]) => {
                Some((ShapeKind::QuadBezier, vec![p0, p1, p2]))
            }
            // 点击顺序：起点、终点、两个控制点
            (CanvasMode::CreateCubicBezier, &[p0, p3, p1, p2]) => {
                Some((ShapeKind::CubicBezier, vec![p0, p1, p2, p3]))
            }
            _ => None,
        };

        if let Some((kind, control)) = ready {
            self.commit(kind, &control);
            self.creation.clear();
        }
    }

    fn commit(&mut self, kind: ShapeKind, points: &[Point2]) {
        match Shape::from_control_points(kind, points, &self.config.tessellation) {
            Ok(shape) => {
                let id = self.model.add_shape(shape);
                info!("Created {} {}", kind, id);
                self.status_message = format!("{} created", kind);
            }
            Err(e) => {
                warn!("Failed to create shape: {}", e);
                self.status_message = e.to_string();
            }
        }
    }

    // ---- 命令 ----

    pub fn change_mode(&mut self, mode: CanvasMode) {
        self.mode = mode;
        self.creation.clear();
        self.pan_anchor = None;

        if mode != CanvasMode::Select {
            self.hover.clear();
        }
        if mode.is_creation() {
            self.model.clear_selection();
        }

        info!("Canvas mode: {}", mode.name());
        self.status_message = format!("{} mode", mode.name());
    }

    /// 取消当前的创建操作
    pub fn cancel(&mut self) {
        self.creation.clear();
        self.status_message = "Cancelled".to_string();
    }

    /// 选中全部图形
    pub fn select_all(&mut self) {
        let ids: Vec<_> = self.model.shapes().iter().map(|e| e.id).collect();
        for id in ids {
            self.model.add_to_selection(id);
        }
        self.status_message = format!("{} selected", self.model.selected_ids().len());
    }

    /// 缩放到全部图形
    pub fn fit_to_view(&mut self) {
        let bbox = self.model.bounding_box();
        self.viewport.fit(&bbox);
        self.sync_hover_box();
    }

    /// 删除所有图形并重置视图
    pub fn clear_all(&mut self) {
        self.model.clear();
        self.creation.clear();
        self.hover.clear();
        self.fit_to_view();
        info!("Canvas cleared");
        self.status_message = "Cleared".to_string();
    }

    /// 由选择集构建平面图
    pub fn build_graph(&mut self) -> Result<(), SketchError> {
        match self.model.build_graph_from_selection(&self.config.graph) {
            Ok(graph) => {
                let message = format!(
                    "Graph built: {} nodes, {} edges",
                    graph.node_count(),
                    graph.edge_count()
                );
                info!("{}", message);
                self.status_message = message;
                Ok(())
            }
            Err(e) => {
                self.status_message = e.to_string();
                Err(e)
            }
        }
    }

    /// 滚轮缩放，`delta < 0` 缩小视图
    pub fn wheel(&mut self, delta: f64) {
        self.viewport.zoom_by_wheel(delta);
        self.sync_hover_box();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport.resize(width, height);
        self.fit_to_view();
    }

    // ---- 输出 ----

    /// 当前创建模式的预览几何，只在已有点且有预览点时生成
    pub fn previews(&self) -> Vec<PreviewGeometry> {
        let Some(cursor) = self.creation.preview else {
            return Vec::new();
        };
        let tess = &self.config.tessellation;

        match (self.mode, self.creation.points.as_slice()) {
            (CanvasMode::CreateLine, &[p0]) | (CanvasMode::CreateArc, &[p0]) => {
                vec![PreviewGeometry::solid(PrimitiveKind::Lines, vec![p0, cursor])]
            }
            (CanvasMode::CreatePolyline, points) if !points.is_empty() => {
                let mut strip = points.to_vec();
                strip.push(cursor);
                vec![PreviewGeometry::solid(PrimitiveKind::LineStrip, strip)]
            }
            (CanvasMode::CreateCircle, &[center]) => {
                let radius = (cursor - center).norm();
                let circle = Shape::Circle(Circle::with_steps(center, radius, tess.circle_steps));
                vec![shape_preview(&circle)]
            }
            (CanvasMode::CreateArc, &[start, end]) => {
                let arc =
                    Shape::CircleArc(CircleArc::with_steps(start, end, cursor, tess.arc_steps));
                vec![shape_preview(&arc)]
            }
            (CanvasMode::CreateQuadBezier, &[p0, p2]) => {
                let curve = Shape::QuadBezier(QuadBezier::with_steps(
                    p0,
                    cursor,
                    p2,
                    tess.quad_bezier_steps,
                ));
                bezier_preview(&curve)
            }
            (CanvasMode::CreateCubicBezier, &[p0, p3, p1]) => {
                let curve = Shape::CubicBezier(CubicBezier::with_steps(
                    p0,
                    p1,
                    cursor,
                    p3,
                    tess.cubic_bezier_steps,
                ));
                bezier_preview(&curve)
            }
            _ => Vec::new(),
        }
    }

    pub fn render_frame(&self) -> RenderFrame {
        let shapes = self
            .model
            .shapes()
            .iter()
            .map(|entity| ShapeDraw {
                id: entity.id,
                kind: entity.shape.kind(),
                primitive: entity.shape.primitive(),
                points: entity.shape.tessellated_points().to_vec(),
                control_points: entity.shape.control_points().to_vec(),
                selected: self.model.is_selected(entity.id),
            })
            .collect();

        let (hover_box, highlighted_point) = if self.mode == CanvasMode::Select {
            (
                self.hover.selection_box_points(),
                self.hover.closest_point(),
            )
        } else {
            (Vec::new(), None)
        };

        let (graph_nodes, graph_edges) = self
            .model
            .graph()
            .map(|g| (g.node_points(), g.edge_segments()))
            .unwrap_or_default();

        RenderFrame {
            mode: self.mode,
            world_window: self.viewport.extents(),
            shapes,
            creation_points: self.creation.points.clone(),
            previews: self.previews(),
            hover_box,
            highlighted_point,
            graph_nodes,
            graph_edges,
            intersections: self.model.intersection_points().to_vec(),
            status_message: self.status_message.clone(),
        }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(SketchConfig::default(), 800, 600)
    }
}

fn shape_preview(shape: &Shape) -> PreviewGeometry {
    PreviewGeometry::solid(shape.primitive(), shape.tessellated_points().to_vec())
}

/// 贝塞尔曲线预览：曲线本身加虚线控制多边形
fn bezier_preview(curve: &Shape) -> Vec<PreviewGeometry> {
    vec![
        shape_preview(curve),
        PreviewGeometry::dashed(curve.control_points().to_vec()),
    ]
}
