//! 几何图元定义
//!
//! 支持的基本图元：
//! - 线段 (Line)
//! - 多段线 (Polyline)
//! - 二次贝塞尔曲线 (QuadBezier)
//! - 三次贝塞尔曲线 (CubicBezier)
//! - 圆 (Circle)
//! - 三点圆弧 (CircleArc)
//! - 多边形 (Polygon)，仅用作面的内部表示
//!
//! 每个图元在构造时立即完成离散化（tessellation），之后不可修改。
//! 控制点是编辑句柄，离散点是渲染与几何计算使用的折线。

use crate::config::TessellationConfig;
use crate::error::SketchError;
use crate::intersect::positive_angle_delta;
use crate::math::{point_to_segment_dist_sq, BoundingBox2, Point2, DETERMINANT_EPSILON};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// 图元种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Line,
    Polyline,
    QuadBezier,
    CubicBezier,
    Circle,
    CircleArc,
    Polygon,
}

impl ShapeKind {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Line => "Line",
            ShapeKind::Polyline => "Polyline",
            ShapeKind::QuadBezier => "Quadratic Bezier",
            ShapeKind::CubicBezier => "Cubic Bezier",
            ShapeKind::Circle => "Circle",
            ShapeKind::CircleArc => "Circle Arc",
            ShapeKind::Polygon => "Polygon",
        }
    }

    /// 创建该图元所需的点数说明
    fn expected_points(&self) -> &'static str {
        match self {
            ShapeKind::Line => "2",
            ShapeKind::Polyline => "at least 2",
            ShapeKind::QuadBezier => "3",
            ShapeKind::CubicBezier => "4",
            ShapeKind::Circle => "2 (center and rim)",
            ShapeKind::CircleArc => "3",
            ShapeKind::Polygon => "at least 3",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 绘制图元类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimitiveKind {
    /// 独立线段列表
    Lines,
    /// 连续折线
    LineStrip,
    /// 闭合折线
    LineLoop,
    /// 三角扇（填充多边形）
    TriangleFan,
}

impl PrimitiveKind {
    /// 是否首尾相连
    pub fn is_closed(&self) -> bool {
        matches!(self, PrimitiveKind::LineLoop | PrimitiveKind::TriangleFan)
    }
}

/// 最近点查询结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosestPoint {
    pub point: Point2,
    pub distance: f64,
}

/// 几何类型枚举
#[derive(Debug, Clone, Serialize)]
pub enum Shape {
    Line(Line),
    Polyline(Polyline),
    QuadBezier(QuadBezier),
    CubicBezier(CubicBezier),
    Circle(Circle),
    CircleArc(CircleArc),
    Polygon(Polygon),
}

impl Shape {
    /// 根据控制点创建图元
    ///
    /// 圆使用 `[圆心, 圆周上一点]`，其余图元直接使用控制点。
    /// 点数不符合要求时返回 `WrongPointCount`。
    pub fn from_control_points(
        kind: ShapeKind,
        points: &[Point2],
        config: &TessellationConfig,
    ) -> Result<Shape, SketchError> {
        let wrong = || SketchError::WrongPointCount {
            kind,
            expected: kind.expected_points(),
            found: points.len(),
        };

        let shape = match (kind, points) {
            (ShapeKind::Line, &[p1, p2]) => Shape::Line(Line::new(p1, p2)),
            (ShapeKind::Polyline, pts) if pts.len() >= 2 => {
                Shape::Polyline(Polyline::new(pts.to_vec()))
            }
            (ShapeKind::QuadBezier, &[p0, p1, p2]) => Shape::QuadBezier(QuadBezier::with_steps(
                p0,
                p1,
                p2,
                config.quad_bezier_steps,
            )),
            (ShapeKind::CubicBezier, &[p0, p1, p2, p3]) => Shape::CubicBezier(
                CubicBezier::with_steps(p0, p1, p2, p3, config.cubic_bezier_steps),
            ),
            (ShapeKind::Circle, &[center, rim]) => {
                let radius = (rim - center).norm();
                Shape::Circle(Circle::with_steps(center, radius, config.circle_steps))
            }
            (ShapeKind::CircleArc, &[start, end, on_arc]) => {
                Shape::CircleArc(CircleArc::with_steps(start, end, on_arc, config.arc_steps))
            }
            (ShapeKind::Polygon, pts) if pts.len() >= 3 => {
                Shape::Polygon(Polygon::new(pts.to_vec()))
            }
            _ => return Err(wrong()),
        };
        Ok(shape)
    }

    /// 获取图元种类
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Line(_) => ShapeKind::Line,
            Shape::Polyline(_) => ShapeKind::Polyline,
            Shape::QuadBezier(_) => ShapeKind::QuadBezier,
            Shape::CubicBezier(_) => ShapeKind::CubicBezier,
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::CircleArc(_) => ShapeKind::CircleArc,
            Shape::Polygon(_) => ShapeKind::Polygon,
        }
    }

    /// 获取几何的类型名称
    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    /// 控制点（编辑句柄）
    pub fn control_points(&self) -> &[Point2] {
        match self {
            Shape::Line(l) => &l.points,
            Shape::Polyline(pl) => &pl.points,
            Shape::QuadBezier(q) => &q.control,
            Shape::CubicBezier(c) => &c.control,
            Shape::Circle(c) => std::slice::from_ref(&c.center),
            Shape::CircleArc(a) => &a.control,
            Shape::Polygon(pg) => &pg.points,
        }
    }

    /// 离散后的折线点
    pub fn tessellated_points(&self) -> &[Point2] {
        match self {
            Shape::Line(l) => &l.points,
            Shape::Polyline(pl) => &pl.points,
            Shape::QuadBezier(q) => &q.tessellated,
            Shape::CubicBezier(c) => &c.tessellated,
            Shape::Circle(c) => &c.tessellated,
            Shape::CircleArc(a) => &a.tessellated,
            Shape::Polygon(pg) => &pg.points,
        }
    }

    /// 绘制图元类型
    pub fn primitive(&self) -> PrimitiveKind {
        match self {
            Shape::Line(_) => PrimitiveKind::Lines,
            Shape::Polyline(_)
            | Shape::QuadBezier(_)
            | Shape::CubicBezier(_)
            | Shape::CircleArc(_) => PrimitiveKind::LineStrip,
            Shape::Circle(_) => PrimitiveKind::LineLoop,
            Shape::Polygon(_) => PrimitiveKind::TriangleFan,
        }
    }

    /// 是否为闭合图形
    pub fn is_closed(&self) -> bool {
        self.primitive().is_closed()
    }

    /// 获取几何的包围盒
    ///
    /// 优先使用离散点，没有离散点时使用控制点。单个图形不做退化扩展。
    pub fn bounding_box(&self) -> BoundingBox2 {
        let points = self.tessellated_points();
        if !points.is_empty() {
            return BoundingBox2::from_points(points);
        }
        BoundingBox2::from_points(self.control_points())
    }

    /// 查找图形上距离 `query` 最近的点
    pub fn find_closest_point(&self, query: &Point2) -> Option<ClosestPoint> {
        match self {
            Shape::Circle(c) => Some(c.find_closest_point(query)),
            Shape::Polygon(pg) => closest_on_polyline(query, &pg.points, true),
            _ => closest_on_polyline(query, self.tessellated_points(), false),
        }
    }

    /// 按顺序拆分为线段，闭合图形包含首尾相连的线段
    pub fn segments(&self) -> Vec<(Point2, Point2)> {
        let points = self.tessellated_points();
        let mut segments: Vec<(Point2, Point2)> =
            points.windows(2).map(|w| (w[0], w[1])).collect();
        if self.is_closed() && points.len() >= 2 {
            segments.push((points[points.len() - 1], points[0]));
        }
        segments
    }
}

/// 在折线上查找最近点
fn closest_on_polyline(query: &Point2, points: &[Point2], is_loop: bool) -> Option<ClosestPoint> {
    match points {
        [] => None,
        [only] => Some(ClosestPoint {
            point: *only,
            distance: (query - only).norm(),
        }),
        _ => {
            let mut best: Option<(f64, Point2)> = None;
            let closing = if is_loop {
                Some((&points[points.len() - 1], &points[0]))
            } else {
                None
            };
            let pairs = points.windows(2).map(|w| (&w[0], &w[1])).chain(closing);
            for (a, b) in pairs {
                let (d2, projection) = point_to_segment_dist_sq(query, a, b);
                if best.map_or(true, |(best_d2, _)| d2 < best_d2) {
                    best = Some((d2, projection));
                }
            }
            best.map(|(d2, point)| ClosestPoint {
                point,
                distance: d2.sqrt(),
            })
        }
    }
}

/// 线段
#[derive(Debug, Clone, Serialize)]
pub struct Line {
    points: [Point2; 2],
}

impl Line {
    pub fn new(start: Point2, end: Point2) -> Self {
        Self {
            points: [start, end],
        }
    }

    pub fn start(&self) -> Point2 {
        self.points[0]
    }

    pub fn end(&self) -> Point2 {
        self.points[1]
    }

    /// 计算线段长度
    pub fn length(&self) -> f64 {
        (self.end() - self.start()).norm()
    }
}

/// 多段线（开放）
#[derive(Debug, Clone, Serialize)]
pub struct Polyline {
    points: Vec<Point2>,
}

impl Polyline {
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// 顶点数量
    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }
}

/// 二次贝塞尔曲线
#[derive(Debug, Clone, Serialize)]
pub struct QuadBezier {
    control: [Point2; 3],
    tessellated: Vec<Point2>,
}

impl QuadBezier {
    pub const DEFAULT_STEPS: usize = 20;

    pub fn new(p0: Point2, p1: Point2, p2: Point2) -> Self {
        Self::with_steps(p0, p1, p2, Self::DEFAULT_STEPS)
    }

    pub fn with_steps(p0: Point2, p1: Point2, p2: Point2, steps: usize) -> Self {
        let control = [p0, p1, p2];
        let tessellated = sample_uniform(steps, |t| quad_point(&control, t));
        Self {
            control,
            tessellated,
        }
    }

    /// 计算参数 t ∈ [0, 1] 处的点
    pub fn point_at(&self, t: f64) -> Point2 {
        quad_point(&self.control, t)
    }
}

fn quad_point(c: &[Point2; 3], t: f64) -> Point2 {
    let inv_t = 1.0 - t;
    let b0 = inv_t * inv_t;
    let b1 = 2.0 * inv_t * t;
    let b2 = t * t;
    Point2::new(
        b0 * c[0].x + b1 * c[1].x + b2 * c[2].x,
        b0 * c[0].y + b1 * c[1].y + b2 * c[2].y,
    )
}

/// 三次贝塞尔曲线
#[derive(Debug, Clone, Serialize)]
pub struct CubicBezier {
    control: [Point2; 4],
    tessellated: Vec<Point2>,
}

impl CubicBezier {
    pub const DEFAULT_STEPS: usize = 30;

    pub fn new(p0: Point2, p1: Point2, p2: Point2, p3: Point2) -> Self {
        Self::with_steps(p0, p1, p2, p3, Self::DEFAULT_STEPS)
    }

    pub fn with_steps(p0: Point2, p1: Point2, p2: Point2, p3: Point2, steps: usize) -> Self {
        let control = [p0, p1, p2, p3];
        let tessellated = sample_uniform(steps, |t| cubic_point(&control, t));
        Self {
            control,
            tessellated,
        }
    }

    /// 计算参数 t ∈ [0, 1] 处的点
    pub fn point_at(&self, t: f64) -> Point2 {
        cubic_point(&self.control, t)
    }
}

fn cubic_point(c: &[Point2; 4], t: f64) -> Point2 {
    let inv_t = 1.0 - t;
    let b0 = inv_t * inv_t * inv_t;
    let b1 = 3.0 * inv_t * inv_t * t;
    let b2 = 3.0 * inv_t * t * t;
    let b3 = t * t * t;
    Point2::new(
        b0 * c[0].x + b1 * c[1].x + b2 * c[2].x + b3 * c[3].x,
        b0 * c[0].y + b1 * c[1].y + b2 * c[2].y + b3 * c[3].y,
    )
}

/// 在 `steps + 1` 个均匀参数处采样
fn sample_uniform(steps: usize, eval: impl Fn(f64) -> Point2) -> Vec<Point2> {
    let steps = steps.max(1);
    (0..=steps)
        .map(|i| eval(i as f64 / steps as f64))
        .collect()
}

/// 圆
#[derive(Debug, Clone, Serialize)]
pub struct Circle {
    center: Point2,
    radius: f64,
    tessellated: Vec<Point2>,
}

impl Circle {
    pub const DEFAULT_STEPS: usize = 40;

    pub fn new(center: Point2, radius: f64) -> Self {
        Self::with_steps(center, radius, Self::DEFAULT_STEPS)
    }

    /// 由圆心和圆周上一点创建
    pub fn from_center_and_rim(center: Point2, rim: Point2) -> Self {
        Self::new(center, (rim - center).norm())
    }

    pub fn with_steps(center: Point2, radius: f64, steps: usize) -> Self {
        let tessellated = sample_uniform(steps, |t| {
            let angle = 2.0 * PI * t;
            Point2::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        });
        Self {
            center,
            radius,
            tessellated,
        }
    }

    pub fn center(&self) -> Point2 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// 解析计算最近点，查询点与圆心重合时返回圆周上任意一点
    pub fn find_closest_point(&self, query: &Point2) -> ClosestPoint {
        let offset = query - self.center;
        let dist_to_center = offset.norm();

        if dist_to_center == 0.0 {
            return ClosestPoint {
                point: Point2::new(self.center.x + self.radius, self.center.y),
                distance: self.radius,
            };
        }

        ClosestPoint {
            point: self.center + offset * (self.radius / dist_to_center),
            distance: (dist_to_center - self.radius).abs(),
        }
    }
}

/// 三点圆弧：起点、终点、弧上一点
#[derive(Debug, Clone, Serialize)]
pub struct CircleArc {
    control: [Point2; 3],
    /// 外接圆，三点共线时为 `None`
    circle: Option<(Point2, f64)>,
    tessellated: Vec<Point2>,
}

impl CircleArc {
    pub const DEFAULT_STEPS: usize = 40;

    pub fn new(start: Point2, end: Point2, on_arc: Point2) -> Self {
        Self::with_steps(start, end, on_arc, Self::DEFAULT_STEPS)
    }

    pub fn with_steps(start: Point2, end: Point2, on_arc: Point2, steps: usize) -> Self {
        let control = [start, end, on_arc];

        let Some((center, radius)) = circumcircle(&start, &end, &on_arc) else {
            // 三点共线，退化为线段
            return Self {
                control,
                circle: None,
                tessellated: vec![start, end],
            };
        };

        let angle_of = |p: &Point2| (p.y - center.y).atan2(p.x - center.x);
        let mut start_angle = angle_of(&start);
        let end_angle = angle_of(&end);
        let on_arc_angle = angle_of(&on_arc);

        let mut sweep = positive_angle_delta(end_angle, start_angle);
        let on_arc_sweep = positive_angle_delta(on_arc_angle, start_angle);

        // 弧上点不在 start→end 逆时针范围内时，改为从 end 逆时针绕到 start
        if on_arc_sweep > sweep {
            start_angle = end_angle;
            sweep = positive_angle_delta(angle_of(&start), start_angle);
        }

        let tessellated = sample_uniform(steps, |t| {
            let angle = start_angle + sweep * t;
            Point2::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        });

        Self {
            control,
            circle: Some((center, radius)),
            tessellated,
        }
    }

    pub fn start(&self) -> Point2 {
        self.control[0]
    }

    pub fn end(&self) -> Point2 {
        self.control[1]
    }

    pub fn on_arc(&self) -> Point2 {
        self.control[2]
    }

    /// 圆心，三点共线时为 `None`
    pub fn center(&self) -> Option<Point2> {
        self.circle.map(|(c, _)| c)
    }

    /// 半径，三点共线时为 `None`
    pub fn radius(&self) -> Option<f64> {
        self.circle.map(|(_, r)| r)
    }

    /// 三点共线退化为线段
    pub fn is_degenerate(&self) -> bool {
        self.circle.is_none()
    }
}

/// 三点外接圆（圆心, 半径），三点共线时返回 `None`
fn circumcircle(p1: &Point2, p2: &Point2, p3: &Point2) -> Option<(Point2, f64)> {
    let d = 2.0 * (p1.x * (p2.y - p3.y) + p2.x * (p3.y - p1.y) + p3.x * (p1.y - p2.y));
    if d.abs() < DETERMINANT_EPSILON {
        return None;
    }

    let sq1 = p1.x * p1.x + p1.y * p1.y;
    let sq2 = p2.x * p2.x + p2.y * p2.y;
    let sq3 = p3.x * p3.x + p3.y * p3.y;
    let ux = (sq1 * (p2.y - p3.y) + sq2 * (p3.y - p1.y) + sq3 * (p1.y - p2.y)) / d;
    let uy = (sq1 * (p3.x - p2.x) + sq2 * (p1.x - p3.x) + sq3 * (p2.x - p1.x)) / d;

    let center = Point2::new(ux, uy);
    Some((center, (p1 - center).norm()))
}

/// 简单多边形（不自交），用于表示平面图中的面
#[derive(Debug, Clone, Serialize)]
pub struct Polygon {
    points: Vec<Point2>,
}

impl Polygon {
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// 有向面积，逆时针为正
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut twice = 0.0;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            twice += a.x * b.y - b.x * a.y;
        }
        twice / 2.0
    }
}
