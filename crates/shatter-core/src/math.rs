//! 数学基础类型
//!
//! 基于 nalgebra 提供的向量和点类型的别名，以及距离、投影和包围盒工具。

use nalgebra as na;
use serde::{Deserialize, Serialize};

/// 2D点类型
pub type Point2 = na::Point2<f64>;

/// 2D向量类型
pub type Vector2 = na::Vector2<f64>;

/// 数值容差，用于点在线段上、包围盒退化等几何比较
pub const EPSILON: f64 = 1e-6;

/// 行列式容差，小于该值视为平行或共线
pub const DETERMINANT_EPSILON: f64 = 1e-8;

/// 判断两个浮点数是否近似相等
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// 判断两个2D点是否近似相等
#[inline]
pub fn points_approx_eq(a: &Point2, b: &Point2) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

/// 两点距离的平方
#[inline]
pub fn dist_sq(a: &Point2, b: &Point2) -> f64 {
    (a - b).norm_squared()
}

/// 点到线段的最近点
///
/// 返回 `(距离平方, 线段上的最近点)`。投影参数被钳制到 `[0, 1]`，
/// 长度为零的线段退化为端点。
pub fn point_to_segment_dist_sq(p: &Point2, a: &Point2, b: &Point2) -> (f64, Point2) {
    let v = b - a;
    let l2 = v.norm_squared();
    if l2 == 0.0 {
        return (dist_sq(p, a), *a);
    }

    let t = ((p - a).dot(&v) / l2).clamp(0.0, 1.0);
    let projection = a + v * t;
    (dist_sq(p, &projection), projection)
}

/// 2D包围盒
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2 {
    pub min: Point2,
    pub max: Point2,
}

impl BoundingBox2 {
    /// 创建新的包围盒
    pub fn new(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    /// 由 `(xmin, xmax, ymin, ymax)` 创建
    pub fn from_extents(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self::new(Point2::new(xmin, ymin), Point2::new(xmax, ymax))
    }

    /// 以指定点为中心、半边长为 `half` 的正方形
    pub fn around(center: Point2, half: f64) -> Self {
        Self::new(
            Point2::new(center.x - half, center.y - half),
            Point2::new(center.x + half, center.y + half),
        )
    }

    /// 创建空的包围盒（无效状态）
    pub fn empty() -> Self {
        Self {
            min: Point2::new(f64::MAX, f64::MAX),
            max: Point2::new(f64::MIN, f64::MIN),
        }
    }

    /// 是否为空（未包含任何点）
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// 从点集创建包围盒
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point2>) -> Self {
        let mut bbox = Self::empty();
        for p in points {
            bbox.expand_to_include(p);
        }
        bbox
    }

    /// 扩展包围盒以包含指定点
    pub fn expand_to_include(&mut self, point: &Point2) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// 合并两个包围盒
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: Point2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// 检查是否与另一个包围盒相交（边界接触也算相交）
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// 检查是否包含指定点
    pub fn contains(&self, point: &Point2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// 获取中心点
    pub fn center(&self) -> Point2 {
        Point2::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// 获取宽度
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// 获取高度
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// 在宽或高小于 `EPSILON` 的方向上向两侧各扩展 `margin`
    pub fn inflate_degenerate(&self, margin: f64) -> Self {
        let mut bbox = *self;
        if bbox.width().abs() < EPSILON {
            bbox.min.x -= margin;
            bbox.max.x += margin;
        }
        if bbox.height().abs() < EPSILON {
            bbox.min.y -= margin;
            bbox.max.y += margin;
        }
        bbox
    }

    /// 四个角点：左下、右下、右上、左上
    pub fn corners(&self) -> [Point2; 4] {
        [
            Point2::new(self.min.x, self.min.y),
            Point2::new(self.max.x, self.min.y),
            Point2::new(self.max.x, self.max.y),
            Point2::new(self.min.x, self.max.y),
        ]
    }

    /// 以 `(xmin, xmax, ymin, ymax)` 形式返回
    pub fn extents(&self) -> (f64, f64, f64, f64) {
        (self.min.x, self.max.x, self.min.y, self.max.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box() {
        let bbox = BoundingBox2::from_points(&[
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 5.0),
            Point2::new(-5.0, 8.0),
        ]);

        assert!(approx_eq(bbox.min.x, -5.0));
        assert!(approx_eq(bbox.min.y, 0.0));
        assert!(approx_eq(bbox.max.x, 10.0));
        assert!(approx_eq(bbox.max.y, 8.0));
        assert!(bbox.contains(&Point2::new(0.0, 4.0)));
        assert!(!bbox.contains(&Point2::new(20.0, 4.0)));
    }

    #[test]
    fn test_box_intersection() {
        let a = BoundingBox2::from_extents(0.0, 10.0, 0.0, 10.0);
        let touching = BoundingBox2::from_extents(10.0, 20.0, 5.0, 6.0);
        let apart_x = BoundingBox2::from_extents(10.5, 20.0, 0.0, 10.0);
        let apart_y = BoundingBox2::from_extents(0.0, 10.0, -3.0, -0.1);

        assert!(a.intersects(&touching));
        assert!(!a.intersects(&apart_x));
        assert!(!a.intersects(&apart_y));
    }

    #[test]
    fn test_segment_projection_clamps() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 0.0);

        let (d2, p) = point_to_segment_dist_sq(&Point2::new(5.0, 3.0), &a, &b);
        assert!(approx_eq(d2, 9.0));
        assert!(points_approx_eq(&p, &Point2::new(5.0, 0.0)));

        let (d2, p) = point_to_segment_dist_sq(&Point2::new(-4.0, 3.0), &a, &b);
        assert!(approx_eq(d2, 25.0));
        assert!(points_approx_eq(&p, &a));

        let (d2, p) = point_to_segment_dist_sq(&Point2::new(1.0, 1.0), &a, &a);
        assert!(approx_eq(d2, 2.0));
        assert!(points_approx_eq(&p, &a));
    }

    #[test]
    fn test_inflate_degenerate() {
        let point_box = BoundingBox2::from_points(&[Point2::new(3.0, 4.0)]);
        let inflated = point_box.inflate_degenerate(1.0);
        assert_eq!(inflated.extents(), (2.0, 4.0, 3.0, 5.0));

        let flat = BoundingBox2::from_extents(0.0, 10.0, 2.0, 2.0).inflate_degenerate(1.0);
        assert_eq!(flat.extents(), (0.0, 10.0, 1.0, 3.0));
    }
}
