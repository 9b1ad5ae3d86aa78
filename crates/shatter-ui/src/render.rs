//! 渲染帧
//!
//! 把模型、创建预览、悬停状态和平面图整理成与绘图后端无关的数据，
//! 由宿主窗口按图元类型绘制。

use crate::state::CanvasMode;
use serde::{Deserialize, Serialize};
use shatter_core::entity::ShapeId;
use shatter_core::geometry::{PrimitiveKind, ShapeKind};
use shatter_core::math::Point2;

/// 已提交图形的绘制数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeDraw {
    pub id: ShapeId,
    pub kind: ShapeKind,
    pub primitive: PrimitiveKind,
    /// 离散点
    pub points: Vec<Point2>,
    pub control_points: Vec<Point2>,
    pub selected: bool,
}

/// 创建过程中的预览几何
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewGeometry {
    pub primitive: PrimitiveKind,
    pub points: Vec<Point2>,
    /// 虚线（贝塞尔控制多边形）
    pub dashed: bool,
}

impl PreviewGeometry {
    pub fn solid(primitive: PrimitiveKind, points: Vec<Point2>) -> Self {
        Self {
            primitive,
            points,
            dashed: false,
        }
    }

    pub fn dashed(points: Vec<Point2>) -> Self {
        Self {
            primitive: PrimitiveKind::LineStrip,
            points,
            dashed: true,
        }
    }
}

/// 一帧的全部绘制数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderFrame {
    pub mode: CanvasMode,
    /// 世界窗口 (left, right, bottom, top)
    pub world_window: (f64, f64, f64, f64),
    pub shapes: Vec<ShapeDraw>,
    /// 已点击的创建点
    pub creation_points: Vec<Point2>,
    pub previews: Vec<PreviewGeometry>,
    /// 拾取框角点（仅选择模式）
    pub hover_box: Vec<Point2>,
    /// 悬停图形上的最近点
    pub highlighted_point: Option<Point2>,
    pub graph_nodes: Vec<Point2>,
    pub graph_edges: Vec<(Point2, Point2)>,
    pub intersections: Vec<Point2>,
    pub status_message: String,
}

impl RenderFrame {
    pub fn selected_count(&self) -> usize {
        self.shapes.iter().filter(|s| s.selected).count()
    }
}
