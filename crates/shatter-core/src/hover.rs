//! 悬停拾取
//!
//! 以鼠标位置为中心的正方形拾取框（边长按像素给定，随缩放换算为世界坐标）。
//! 包围盒与拾取框相交的图形参与比较，取最近点距离最小者；
//! 距离相等时先加入模型的图形优先。

use crate::entity::ShapeId;
use crate::math::{BoundingBox2, Point2};
use crate::model::Model;

/// 悬停结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverHit {
    pub shape: ShapeId,
    /// 图形上距离鼠标最近的点
    pub point: Point2,
    pub distance: f64,
}

/// 悬停管理器
#[derive(Debug, Clone)]
pub struct HoverManager {
    /// 拾取框边长（像素）
    pixel_box_size: f64,
    /// 拾取框边长（世界坐标）
    world_box_size: f64,
    /// 当前鼠标位置，`None` 表示空闲
    mouse: Option<Point2>,
    hit: Option<HoverHit>,
}

impl HoverManager {
    pub fn new(pixel_box_size: f64) -> Self {
        Self {
            pixel_box_size,
            world_box_size: 0.0,
            mouse: None,
            hit: None,
        }
    }

    pub fn pixel_box_size(&self) -> f64 {
        self.pixel_box_size
    }

    pub fn world_box_size(&self) -> f64 {
        self.world_box_size
    }

    /// 视图变化后重新换算拾取框大小
    pub fn update_world_box_size(&mut self, world_units_per_pixel: f64) {
        self.world_box_size = self.pixel_box_size * world_units_per_pixel;
    }

    /// 更新鼠标位置并重新查找悬停图形
    pub fn update_hover(&mut self, mouse: Point2, model: &Model) -> Option<HoverHit> {
        self.mouse = Some(mouse);
        self.hit = None;

        if self.world_box_size <= 0.0 {
            return None;
        }

        let query = BoundingBox2::around(mouse, self.world_box_size / 2.0);
        for entity in model.shapes() {
            if !entity.bounding_box().intersects(&query) {
                continue;
            }
            let Some(closest) = entity.shape.find_closest_point(&mouse) else {
                continue;
            };
            if self.hit.map_or(true, |h| closest.distance < h.distance) {
                self.hit = Some(HoverHit {
                    shape: entity.id,
                    point: closest.point,
                    distance: closest.distance,
                });
            }
        }
        self.hit
    }

    /// 清除悬停状态，回到空闲
    pub fn clear(&mut self) {
        self.mouse = None;
        self.hit = None;
    }

    pub fn hit(&self) -> Option<HoverHit> {
        self.hit
    }

    pub fn hovered_shape(&self) -> Option<ShapeId> {
        self.hit.map(|h| h.shape)
    }

    pub fn closest_point(&self) -> Option<Point2> {
        self.hit.map(|h| h.point)
    }

    pub fn mouse_position(&self) -> Option<Point2> {
        self.mouse
    }

    /// 是否正在跟踪鼠标
    pub fn is_tracking(&self) -> bool {
        self.mouse.is_some()
    }

    /// 当前拾取框（世界坐标）
    pub fn selection_box(&self) -> Option<BoundingBox2> {
        self.mouse
            .map(|m| BoundingBox2::around(m, self.world_box_size / 2.0))
    }

    /// 拾取框四个角点（左下、右下、右上、左上），空闲时为空
    pub fn selection_box_points(&self) -> Vec<Point2> {
        self.selection_box()
            .map(|b| b.corners().to_vec())
            .unwrap_or_default()
    }
}

impl Default for HoverManager {
    fn default() -> Self {
        Self::new(crate::config::HoverConfig::default().pixel_box_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Circle, Line, Shape};
    use crate::math::points_approx_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn model_with_lines() -> (Model, ShapeId, ShapeId) {
        let mut model = Model::new();
        let a = model.add_shape(Shape::Line(Line::new(p(0.0, 0.0), p(100.0, 0.0))));
        let b = model.add_shape(Shape::Line(Line::new(p(0.0, 10.0), p(100.0, 10.0))));
        (model, a, b)
    }

    #[test]
    fn test_hover_picks_nearest() {
        let (model, a, b) = model_with_lines();
        let mut hover = HoverManager::new(30.0);
        hover.update_world_box_size(1.0);

        let hit = hover.update_hover(p(50.0, 3.0), &model).unwrap();
        assert_eq!(hit.shape, a);
        assert!(points_approx_eq(&hit.point, &p(50.0, 0.0)));

        hover.update_hover(p(50.0, 8.0), &model);
        assert_eq!(hover.hovered_shape(), Some(b));
    }

    #[test]
    fn test_box_outside_every_bbox() {
        let (model, _, _) = model_with_lines();
        let mut hover = HoverManager::new(30.0);
        hover.update_world_box_size(1.0);

        assert!(hover.update_hover(p(50.0, 500.0), &model).is_none());
        assert!(hover.hovered_shape().is_none());
        assert!(hover.closest_point().is_none());
        assert!(hover.is_tracking());
    }

    #[test]
    fn test_tie_keeps_first_inserted() {
        let (model, a, _) = model_with_lines();
        let mut hover = HoverManager::new(30.0);
        hover.update_world_box_size(1.0);

        hover.update_hover(p(50.0, 5.0), &model);
        assert_eq!(hover.hovered_shape(), Some(a));
    }

    #[test]
    fn test_no_hover_before_view_sync() {
        let (model, a, _) = model_with_lines();
        let mut hover = HoverManager::new(30.0);
        assert_eq!(hover.world_box_size(), 0.0);
        assert!(hover.update_hover(p(50.0, 0.0), &model).is_none());

        hover.update_world_box_size(1.0);
        assert_eq!(hover.update_hover(p(50.0, 0.0), &model).map(|h| h.shape), Some(a));
    }

    #[test]
    fn test_zero_box_never_hovers() {
        let (model, _, _) = model_with_lines();
        let mut hover = HoverManager::new(30.0);
        hover.update_world_box_size(0.0);

        assert!(hover.update_hover(p(50.0, 0.0), &model).is_none());
    }

    #[test]
    fn test_box_scales_with_zoom() {
        let mut model = Model::new();
        model.add_shape(Shape::Circle(Circle::new(p(0.0, 0.0), 10.0)));
        let mut hover = HoverManager::new(30.0);

        // 拾取框边长 3，半宽 1.5，够不到圆的包围盒
        hover.update_world_box_size(0.1);
        assert!(hover.update_hover(p(12.0, 0.0), &model).is_none());

        hover.update_world_box_size(1.0);
        assert!(hover.update_hover(p(12.0, 0.0), &model).is_some());
    }

    #[test]
    fn test_selection_box_points_and_clear() {
        let mut hover = HoverManager::new(30.0);
        assert!(hover.selection_box_points().is_empty());

        hover.update_world_box_size(2.0);
        hover.update_hover(p(0.0, 0.0), &Model::new());
        let corners = hover.selection_box_points();
        assert_eq!(corners.len(), 4);
        assert!(points_approx_eq(&corners[0], &p(-30.0, -30.0)));
        assert!(points_approx_eq(&corners[2], &p(30.0, 30.0)));

        hover.clear();
        assert!(!hover.is_tracking());
        assert!(hover.selection_box().is_none());
    }
}
