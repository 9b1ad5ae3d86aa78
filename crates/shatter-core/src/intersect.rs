//! 几何工具
//!
//! 线段求交、点在线段上判断、包围盒相交和角度计算。
//! 数值上接近奇异的情况（平行、共线）返回 `None`，不视为错误。

use crate::math::{BoundingBox2, Point2, DETERMINANT_EPSILON, EPSILON};
use std::f64::consts::TAU;

/// 线段 p1-p2 与线段 p3-p4 的交点
///
/// 分母绝对值小于 `DETERMINANT_EPSILON` 时视为平行或共线，返回 `None`。
/// 两条线段的参数 t、u 都落在 `[0, 1]`（含端点）时才返回交点。
pub fn segment_intersection(
    p1: &Point2,
    p2: &Point2,
    p3: &Point2,
    p4: &Point2,
) -> Option<Point2> {
    let den = (p1.x - p2.x) * (p3.y - p4.y) - (p1.y - p2.y) * (p3.x - p4.x);
    if den.abs() < DETERMINANT_EPSILON {
        return None;
    }

    let t_num = (p1.x - p3.x) * (p3.y - p4.y) - (p1.y - p3.y) * (p3.x - p4.x);
    let u_num = -((p1.x - p2.x) * (p1.y - p3.y) - (p1.y - p2.y) * (p1.x - p3.x));

    let t = t_num / den;
    let u = u_num / den;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(Point2::new(p1.x + t * (p2.x - p1.x), p1.y + t * (p2.y - p1.y)))
    } else {
        None
    }
}

/// 判断点 p 是否在线段 p1-p2 上
///
/// 先用叉积判断共线，再检查是否落在线段包围盒内（各方向放宽 `epsilon`）。
pub fn point_on_segment(p: &Point2, p1: &Point2, p2: &Point2, epsilon: f64) -> bool {
    let cross = (p.y - p1.y) * (p2.x - p1.x) - (p2.y - p1.y) * (p.x - p1.x);
    if cross.abs() > epsilon {
        return false;
    }

    let (xmin, xmax) = (p1.x.min(p2.x), p1.x.max(p2.x));
    let (ymin, ymax) = (p1.y.min(p2.y), p1.y.max(p2.y));

    (xmin - epsilon..=xmax + epsilon).contains(&p.x)
        && (ymin - epsilon..=ymax + epsilon).contains(&p.y)
}

/// 使用默认容差的 [`point_on_segment`]
pub fn point_on_segment_default(p: &Point2, p1: &Point2, p2: &Point2) -> bool {
    point_on_segment(p, p1, p2, EPSILON)
}

/// 两个轴对齐包围盒是否重叠
#[inline]
pub fn box_intersects(a: &BoundingBox2, b: &BoundingBox2) -> bool {
    a.intersects(b)
}

/// 从 `from` 指向 `to` 的方向角（弧度，atan2）
#[inline]
pub fn direction_angle(from: &Point2, to: &Point2) -> f64 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// `angle - reference` 归一化到 `(0, 2π]`
pub fn positive_angle_delta(angle: f64, reference: f64) -> f64 {
    let mut delta = angle - reference;
    while delta <= 0.0 {
        delta += TAU;
    }
    while delta > TAU {
        delta -= TAU;
    }
    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq, points_approx_eq};
    use std::f64::consts::PI;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn test_crossing_segments() {
        let hit = segment_intersection(&p(0.0, 0.0), &p(10.0, 10.0), &p(0.0, 10.0), &p(10.0, 0.0));
        assert!(points_approx_eq(&hit.unwrap(), &p(5.0, 5.0)));
    }

    #[test]
    fn test_parallel_and_collinear_have_no_intersection() {
        assert!(segment_intersection(&p(0.0, 0.0), &p(10.0, 0.0), &p(0.0, 1.0), &p(10.0, 1.0))
            .is_none());
        assert!(segment_intersection(&p(0.0, 0.0), &p(10.0, 0.0), &p(5.0, 0.0), &p(15.0, 0.0))
            .is_none());
    }

    #[test]
    fn test_endpoint_touch_counts() {
        let hit = segment_intersection(&p(0.0, 0.0), &p(10.0, 0.0), &p(10.0, 0.0), &p(10.0, 5.0));
        assert!(points_approx_eq(&hit.unwrap(), &p(10.0, 0.0)));

        let t_junction =
            segment_intersection(&p(0.0, 0.0), &p(10.0, 0.0), &p(5.0, 0.0), &p(5.0, 5.0));
        assert!(points_approx_eq(&t_junction.unwrap(), &p(5.0, 0.0)));
    }

    #[test]
    fn test_disjoint_segments() {
        let miss = segment_intersection(&p(0.0, 0.0), &p(1.0, 1.0), &p(3.0, 0.0), &p(2.0, 1.5));
        assert!(miss.is_none());
    }

    #[test]
    fn test_point_on_segment() {
        let a = p(0.0, 0.0);
        let b = p(10.0, 10.0);
        assert!(point_on_segment_default(&p(5.0, 5.0), &a, &b));
        assert!(point_on_segment_default(&a, &a, &b));
        assert!(point_on_segment_default(&p(10.0 + 5e-7, 10.0 + 5e-7), &a, &b));
        assert!(!point_on_segment_default(&p(11.0, 11.0), &a, &b));
        assert!(!point_on_segment_default(&p(5.0, 5.1), &a, &b));
    }

    #[test]
    fn test_box_intersects() {
        let a = BoundingBox2::from_extents(0.0, 1.0, 0.0, 1.0);
        let b = BoundingBox2::from_extents(0.5, 2.0, 0.5, 2.0);
        let c = BoundingBox2::from_extents(1.5, 2.0, 0.0, 1.0);
        assert!(box_intersects(&a, &b));
        assert!(!box_intersects(&a, &c));
    }

    #[test]
    fn test_angles() {
        assert!(approx_eq(direction_angle(&p(0.0, 0.0), &p(0.0, 2.0)), PI / 2.0));
        assert!(approx_eq(positive_angle_delta(0.0, 0.0), 2.0 * PI));
        assert!(approx_eq(positive_angle_delta(-PI / 2.0, 0.0), 1.5 * PI));
        assert!(approx_eq(positive_angle_delta(PI, -PI / 2.0), 1.5 * PI));
        assert!(approx_eq(positive_angle_delta(0.25, 0.0), 0.25));
    }
}
