//! 绘图模型
//!
//! 保存按绘制顺序排列的图形、选择集，以及由选择集派生的交点、平面图和面。
//! 派生状态只在构建时整体替换；选择集被清空时一并清空。

use crate::config::GraphConfig;
use crate::entity::{Entity, ShapeId};
use crate::error::{Result, SketchError};
use crate::geometry::{Polygon, Shape};
use crate::graph::PlanarGraph;
use crate::math::{BoundingBox2, Point2};
use crate::shatter;
use tracing::warn;

/// 空模型的默认视图范围
pub const DEFAULT_EXTENT: f64 = 1000.0;

/// 退化包围盒的扩展量
pub const DEGENERATE_MARGIN: f64 = 1.0;

#[derive(Debug, Clone, Default)]
pub struct Model {
    /// 所有图形（插入顺序即绘制顺序）
    entities: Vec<Entity>,
    /// 选择集（有序，无重复）
    selection: Vec<ShapeId>,
    /// 最近一次构建得到的原始交点
    intersections: Vec<Point2>,
    graph: Option<PlanarGraph>,
    found_faces: Vec<Polygon>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加图形，返回分配的标识
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let entity = Entity::new(shape);
        let id = entity.id;
        self.entities.push(entity);
        id
    }

    /// 删除图形
    ///
    /// 被删除的图形在选择集中时，派生状态随之失效。
    pub fn remove_shape(&mut self, id: ShapeId) -> Result<Shape> {
        let index = self
            .entities
            .iter()
            .position(|e| e.id == id)
            .ok_or(SketchError::ShapeNotFound(id))?;

        if self.is_selected(id) {
            self.selection.retain(|s| *s != id);
            self.clear_derived();
        }
        Ok(self.entities.remove(index).shape)
    }

    pub fn shapes(&self) -> &[Entity] {
        &self.entities
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.entities.iter().find(|e| e.id == id).map(|e| &e.shape)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.entities.iter().any(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// 删除所有图形和全部状态
    pub fn clear(&mut self) {
        self.entities.clear();
        self.clear_selection();
    }

    // ---- 选择集 ----

    /// 加入选择集，未知标识和已选中的图形被忽略
    pub fn add_to_selection(&mut self, id: ShapeId) -> bool {
        if !self.contains(id) || self.is_selected(id) {
            return false;
        }
        self.selection.push(id);
        true
    }

    pub fn remove_from_selection(&mut self, id: ShapeId) -> bool {
        let before = self.selection.len();
        self.selection.retain(|s| *s != id);
        self.selection.len() != before
    }

    /// 切换选中状态，返回切换后是否选中
    pub fn toggle_selection(&mut self, id: ShapeId) -> bool {
        if self.is_selected(id) {
            self.remove_from_selection(id);
            false
        } else {
            self.add_to_selection(id)
        }
    }

    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.selection.contains(&id)
    }

    pub fn selected_ids(&self) -> &[ShapeId] {
        &self.selection
    }

    /// 选中的图形（按选择顺序）
    pub fn selected_shapes(&self) -> Vec<&Shape> {
        self.selection.iter().filter_map(|id| self.shape(*id)).collect()
    }

    /// 清空选择集，同时清空交点、平面图和面
    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.clear_derived();
    }

    // ---- 派生状态 ----

    pub fn intersection_points(&self) -> &[Point2] {
        &self.intersections
    }

    pub fn graph(&self) -> Option<&PlanarGraph> {
        self.graph.as_ref()
    }

    pub fn graph_mut(&mut self) -> Option<&mut PlanarGraph> {
        self.graph.as_mut()
    }

    pub fn found_faces(&self) -> &[Polygon] {
        &self.found_faces
    }

    pub fn add_found_face(&mut self, face: Polygon) {
        self.found_faces.push(face);
    }

    pub fn clear_found_faces(&mut self) {
        self.found_faces.clear();
    }

    pub fn clear_graph(&mut self) {
        self.graph = None;
    }

    pub fn clear_intersections(&mut self) {
        self.intersections.clear();
    }

    fn clear_derived(&mut self) {
        self.clear_intersections();
        self.clear_graph();
        self.clear_found_faces();
    }

    // ---- 查询 ----

    /// 所有图形的包围盒
    ///
    /// 没有点的图形不参与计算；空模型返回 ±1000 的默认范围，
    /// 某个方向宽度为零时向两侧各扩展 1。
    pub fn bounding_box(&self) -> BoundingBox2 {
        let bbox = self
            .entities
            .iter()
            .map(Entity::bounding_box)
            .filter(|b| !b.is_empty())
            .fold(BoundingBox2::empty(), |acc, b| acc.union(&b));

        if bbox.is_empty() {
            return BoundingBox2::from_extents(
                -DEFAULT_EXTENT,
                DEFAULT_EXTENT,
                -DEFAULT_EXTENT,
                DEFAULT_EXTENT,
            );
        }
        bbox.inflate_degenerate(DEGENERATE_MARGIN)
    }

    /// 距离 `query` 最近的图形，距离超过 `tolerance` 时返回 `None`
    pub fn find_closest_shape(&self, query: &Point2, tolerance: f64) -> Option<(ShapeId, f64)> {
        let mut best: Option<(ShapeId, f64)> = None;
        for entity in &self.entities {
            if let Some(hit) = entity.shape.find_closest_point(query) {
                if best.map_or(true, |(_, d)| hit.distance < d) {
                    best = Some((entity.id, hit.distance));
                }
            }
        }
        best.filter(|(_, d)| *d <= tolerance)
    }

    /// 由选择集构建平面图
    ///
    /// 失败时记录警告并保持原状态不变；成功时先丢弃旧的派生状态。
    pub fn build_graph_from_selection(&mut self, config: &GraphConfig) -> Result<&PlanarGraph> {
        let result = {
            let shapes = self.selected_shapes();
            shatter::build_graph(&shapes, config)
        };

        match result {
            Ok(build) => {
                self.clear_derived();
                self.intersections = build.intersections;
                let graph: &PlanarGraph = self.graph.insert(build.graph);
                Ok(graph)
            }
            Err(e) => {
                warn!("Cannot build graph from selection: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Circle, Line, Polyline};

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn line(a: Point2, b: Point2) -> Shape {
        Shape::Line(Line::new(a, b))
    }

    fn crossing_model() -> (Model, ShapeId, ShapeId) {
        let mut model = Model::new();
        let a = model.add_shape(line(p(0.0, 0.0), p(10.0, 10.0)));
        let b = model.add_shape(line(p(0.0, 10.0), p(10.0, 0.0)));
        (model, a, b)
    }

    #[test]
    fn test_empty_bounding_box() {
        let model = Model::new();
        assert_eq!(
            model.bounding_box().extents(),
            (-1000.0, 1000.0, -1000.0, 1000.0)
        );
    }

    #[test]
    fn test_degenerate_bounding_box_is_inflated() {
        let mut model = Model::new();
        model.add_shape(line(p(2.0, 3.0), p(2.0, 3.0)));
        assert_eq!(model.bounding_box().extents(), (1.0, 3.0, 2.0, 4.0));

        model.add_shape(line(p(2.0, 3.0), p(6.0, 3.0)));
        assert_eq!(model.bounding_box().extents(), (2.0, 6.0, 2.0, 4.0));
    }

    #[test]
    fn test_shape_without_points_is_skipped_in_bounding_box() {
        let mut model = Model::new();
        model.add_shape(Shape::Polyline(Polyline::new(vec![])));
        assert_eq!(
            model.bounding_box().extents(),
            (-1000.0, 1000.0, -1000.0, 1000.0)
        );

        model.add_shape(line(p(0.0, 0.0), p(4.0, 2.0)));
        let bbox = model.bounding_box();
        assert!(!bbox.is_empty());
        assert_eq!(bbox.extents(), (0.0, 4.0, 0.0, 2.0));
    }

    #[test]
    fn test_visited_flags_through_model() {
        let (mut model, a, b) = crossing_model();
        assert!(model.graph_mut().is_none());

        model.add_to_selection(a);
        model.add_to_selection(b);
        model.build_graph_from_selection(&GraphConfig::default()).unwrap();

        let graph = model.graph_mut().unwrap();
        let edge = graph.edges()[0].clone();
        let id = graph.find_edge(edge.node1, edge.node2).unwrap();
        assert!(graph.mark_visited(id, edge.node1));
        assert!(graph.is_visited(id, edge.node1));
        assert!(!graph.is_visited(id, edge.node2));

        graph.reset_visited();
        let graph = model.graph().unwrap();
        assert!(!graph.is_visited(id, edge.node1));
    }

    #[test]
    fn test_selection_rules() {
        let (mut model, a, b) = crossing_model();

        assert!(model.add_to_selection(a));
        assert!(!model.add_to_selection(a));
        assert!(!model.add_to_selection(ShapeId::NULL));
        assert_eq!(model.selected_ids(), &[a]);

        assert!(model.toggle_selection(b));
        assert!(!model.toggle_selection(a));
        assert_eq!(model.selected_ids(), &[b]);

        assert!(model.remove_from_selection(b));
        assert!(!model.remove_from_selection(b));
        assert!(model.selected_shapes().is_empty());
    }

    #[test]
    fn test_build_and_clear_selection_cascade() {
        let (mut model, a, b) = crossing_model();
        model.add_to_selection(a);
        model.add_to_selection(b);

        let graph = model.build_graph_from_selection(&GraphConfig::default()).unwrap();
        assert_eq!(graph.node_count(), 5);
        assert_eq!(model.intersection_points().len(), 1);

        model.add_found_face(Polygon::new(vec![p(0.0, 0.0), p(5.0, 5.0), p(0.0, 10.0)]));
        assert_eq!(model.found_faces().len(), 1);

        model.clear_selection();
        assert!(model.graph().is_none());
        assert!(model.intersection_points().is_empty());
        assert!(model.found_faces().is_empty());
        assert_eq!(model.len(), 2);
    }

    #[test]
    fn test_failed_build_leaves_state_untouched() {
        let (mut model, a, b) = crossing_model();
        model.add_to_selection(a);
        model.add_to_selection(b);
        model.build_graph_from_selection(&GraphConfig::default()).unwrap();

        model.remove_from_selection(b);
        let err = model.build_graph_from_selection(&GraphConfig::default()).unwrap_err();
        assert!(matches!(err, SketchError::NotEnoughShapes { found: 1, .. }));
        assert_eq!(model.graph().map(|g| g.edge_count()), Some(4));
        assert_eq!(model.intersection_points().len(), 1);
    }

    #[test]
    fn test_find_closest_shape() {
        let mut model = Model::new();
        let l = model.add_shape(line(p(0.0, 0.0), p(10.0, 0.0)));
        let c = model.add_shape(Shape::Circle(Circle::new(p(0.0, 20.0), 5.0)));

        let (id, d) = model.find_closest_shape(&p(5.0, 1.0), 2.0).unwrap();
        assert_eq!(id, l);
        assert!((d - 1.0).abs() < 1e-9);

        let (id, _) = model.find_closest_shape(&p(0.0, 20.0), 10.0).unwrap();
        assert_eq!(id, c);

        assert!(model.find_closest_shape(&p(5.0, 10.0), 1.0).is_none());
    }

    #[test]
    fn test_remove_shape() {
        let (mut model, a, b) = crossing_model();
        model.add_to_selection(a);
        model.add_to_selection(b);
        model.build_graph_from_selection(&GraphConfig::default()).unwrap();

        assert!(model.remove_shape(a).is_ok());
        assert!(model.graph().is_none());
        assert_eq!(model.selected_ids(), &[b]);
        assert_eq!(model.remove_shape(a).unwrap_err(), SketchError::ShapeNotFound(a));

        model.clear();
        assert!(model.is_empty());
        assert!(model.selected_ids().is_empty());
    }
}
