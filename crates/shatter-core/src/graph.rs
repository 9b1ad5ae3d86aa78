//! 平面图
//!
//! 节点与边存放在连续数组中，相互之间通过索引（`NodeId` / `EdgeId`）引用，
//! 不存在所有权环。
//!
//! - 节点按位置去重：新位置与已有节点的距离平方小于 `epsilon²` 时复用已有节点
//! - 边是无向的，不允许自环，也不允许同一对节点之间出现重复边
//! - 每条边带两个访问标记（node1→node2、node2→node1），供寻面遍历使用

use crate::intersect::{direction_angle, positive_angle_delta};
use crate::math::{dist_sq, Point2, EPSILON};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// 节点索引
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// 边索引
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub usize);

/// 图节点：端点或交点
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub point: Point2,
    /// 关联边（反向引用）
    pub edges: Vec<EdgeId>,
}

/// 图边：打碎后的子线段
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub node1: NodeId,
    pub node2: NodeId,
    /// node1 → node2 方向已访问
    visited_forward: bool,
    /// node2 → node1 方向已访问
    visited_backward: bool,
}

impl GraphEdge {
    fn new(node1: NodeId, node2: NodeId) -> Self {
        Self {
            node1,
            node2,
            visited_forward: false,
            visited_backward: false,
        }
    }

    /// 从 `from` 出发时另一端的节点，`from` 不是端点时返回 `None`
    pub fn other(&self, from: NodeId) -> Option<NodeId> {
        if from == self.node1 {
            Some(self.node2)
        } else if from == self.node2 {
            Some(self.node1)
        } else {
            None
        }
    }

    /// 是否连接这两个节点（不区分顺序）
    pub fn connects(&self, a: NodeId, b: NodeId) -> bool {
        (self.node1 == a && self.node2 == b) || (self.node1 == b && self.node2 == a)
    }

    /// 从 `from` 出发的方向是否已访问
    pub fn is_visited_from(&self, from: NodeId) -> bool {
        if from == self.node1 {
            self.visited_forward
        } else if from == self.node2 {
            self.visited_backward
        } else {
            false
        }
    }

    /// 设置从 `from` 出发方向的访问标记，`from` 不是端点时返回 `false`
    pub fn set_visited_from(&mut self, from: NodeId, visited: bool) -> bool {
        if from == self.node1 {
            self.visited_forward = visited;
            true
        } else if from == self.node2 {
            self.visited_backward = visited;
            true
        } else {
            false
        }
    }

    fn reset_visited(&mut self) {
        self.visited_forward = false;
        self.visited_backward = false;
    }
}

/// 平面图
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanarGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    epsilon: f64,
    epsilon_sq: f64,
}

impl PlanarGraph {
    /// 使用默认容差创建空图
    pub fn new() -> Self {
        Self::with_epsilon(EPSILON)
    }

    /// 使用指定的节点合并容差创建空图
    pub fn with_epsilon(epsilon: f64) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            epsilon,
            epsilon_sq: epsilon * epsilon,
        }
    }

    /// 节点合并容差
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(id.0)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&GraphEdge> {
        self.edges.get(id.0)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 节点索引迭代器
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// 查找容差范围内的节点
    pub fn find_node_at(&self, point: &Point2) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| dist_sq(&n.point, point) < self.epsilon_sq)
            .map(NodeId)
    }

    /// 添加节点，容差范围内已有节点时返回已有节点
    pub fn add_node(&mut self, point: Point2) -> NodeId {
        if let Some(existing) = self.find_node_at(&point) {
            return existing;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(GraphNode {
            point,
            edges: Vec::new(),
        });
        id
    }

    /// 查找连接两个节点的边（不区分顺序）
    pub fn find_edge(&self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        self.edges
            .iter()
            .position(|e| e.connects(a, b))
            .map(EdgeId)
    }

    /// 添加边
    ///
    /// 自环、重复边以及不存在的节点都被忽略，返回 `None`。
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        if a == b || a.0 >= self.nodes.len() || b.0 >= self.nodes.len() {
            return None;
        }
        if self.find_edge(a, b).is_some() {
            return None;
        }

        let id = EdgeId(self.edges.len());
        self.edges.push(GraphEdge::new(a, b));
        self.nodes[a.0].edges.push(id);
        self.nodes[b.0].edges.push(id);
        Some(id)
    }

    /// 边另一端的节点
    pub fn other_node(&self, edge: EdgeId, from: NodeId) -> Option<NodeId> {
        self.edge(edge).and_then(|e| e.other(from))
    }

    /// 标记从 `from` 出发沿 `edge` 的方向已访问
    pub fn mark_visited(&mut self, edge: EdgeId, from: NodeId) -> bool {
        match self.edges.get_mut(edge.0) {
            Some(e) => e.set_visited_from(from, true),
            None => false,
        }
    }

    /// 从 `from` 出发沿 `edge` 的方向是否已访问
    pub fn is_visited(&self, edge: EdgeId, from: NodeId) -> bool {
        self.edge(edge).is_some_and(|e| e.is_visited_from(from))
    }

    /// 清除所有边两个方向的访问标记
    pub fn reset_visited(&mut self) {
        for edge in &mut self.edges {
            edge.reset_visited();
        }
    }

    /// 节点的关联边按角度排序
    ///
    /// 参考方向默认为 +X 轴；给定 `incoming` 时为从该节点指向 `incoming`
    /// 另一端的方向。每条边取从节点指向邻点的方向角，相对参考角的增量
    /// 归一化到 `(0, 2π]` 后升序排列，因此 `incoming` 自身（增量 2π）排在最后。
    pub fn sorted_edges(&self, node: NodeId, incoming: Option<EdgeId>) -> Vec<EdgeId> {
        let Some(origin) = self.node(node) else {
            return Vec::new();
        };

        let reference = incoming
            .and_then(|e| self.other_node(e, node))
            .and_then(|far| self.node(far))
            .map_or(0.0, |far| direction_angle(&origin.point, &far.point));

        let mut keyed: Vec<(f64, EdgeId)> = origin
            .edges
            .iter()
            .filter_map(|&e| {
                let neighbor = self.node(self.other_node(e, node)?)?;
                let angle = direction_angle(&origin.point, &neighbor.point);
                Some((positive_angle_delta(angle, reference), e))
            })
            .collect();

        keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        keyed.into_iter().map(|(_, e)| e).collect()
    }

    /// 所有节点坐标（用于渲染）
    pub fn node_points(&self) -> Vec<Point2> {
        self.nodes.iter().map(|n| n.point).collect()
    }

    /// 所有边的端点对（用于渲染）
    pub fn edge_segments(&self) -> Vec<(Point2, Point2)> {
        self.edges
            .iter()
            .map(|e| (self.nodes[e.node1.0].point, self.nodes[e.node2.0].point))
            .collect()
    }

    /// 清空所有节点和边
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }
}

impl Default for PlanarGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn test_node_dedup() {
        let mut graph = PlanarGraph::new();
        let a = graph.add_node(p(1.0, 1.0));
        let b = graph.add_node(p(1.0, 1.0));
        let c = graph.add_node(p(1.0 + 1e-7, 1.0 - 1e-7));
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(graph.node_count(), 1);

        let d = graph.add_node(p(1.0 + 1e-5, 1.0));
        assert_ne!(a, d);
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_edge_dedup() {
        let mut graph = PlanarGraph::new();
        let a = graph.add_node(p(0.0, 0.0));
        let b = graph.add_node(p(1.0, 0.0));

        assert!(graph.add_edge(a, b).is_some());
        assert!(graph.add_edge(a, b).is_none());
        assert!(graph.add_edge(b, a).is_none());
        assert!(graph.add_edge(a, a).is_none());
        assert!(graph.add_edge(a, NodeId(42)).is_none());
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.node(a).unwrap().edges.len(), 1);
        assert_eq!(graph.node(b).unwrap().edges.len(), 1);
    }

    #[test]
    fn test_other_node_and_visited_flags() {
        let mut graph = PlanarGraph::new();
        let a = graph.add_node(p(0.0, 0.0));
        let b = graph.add_node(p(1.0, 0.0));
        let c = graph.add_node(p(2.0, 0.0));
        let e = graph.add_edge(a, b).unwrap();

        assert_eq!(graph.other_node(e, a), Some(b));
        assert_eq!(graph.other_node(e, b), Some(a));
        assert_eq!(graph.other_node(e, c), None);

        assert!(graph.mark_visited(e, a));
        assert!(graph.is_visited(e, a));
        assert!(!graph.is_visited(e, b));
        assert!(!graph.mark_visited(e, c));

        assert!(graph.mark_visited(e, b));
        graph.reset_visited();
        assert!(!graph.is_visited(e, a));
        assert!(!graph.is_visited(e, b));
    }

    #[test]
    fn test_sorted_edges() {
        // 星形：中心连接东、北、西、南四个邻点
        let mut graph = PlanarGraph::new();
        let center = graph.add_node(p(0.0, 0.0));
        let east = graph.add_node(p(1.0, 0.0));
        let north = graph.add_node(p(0.0, 1.0));
        let west = graph.add_node(p(-1.0, 0.0));
        let south = graph.add_node(p(0.0, -1.0));
        let e_south = graph.add_edge(center, south).unwrap();
        let e_east = graph.add_edge(center, east).unwrap();
        let e_west = graph.add_edge(center, west).unwrap();
        let e_north = graph.add_edge(center, north).unwrap();

        // 默认参考方向 +X：东方向增量为 2π，排在最后
        assert_eq!(
            graph.sorted_edges(center, None),
            vec![e_north, e_west, e_south, e_east]
        );

        // 以西边为参考：南、东、北，西自身最后
        assert_eq!(
            graph.sorted_edges(center, Some(e_west)),
            vec![e_south, e_east, e_north, e_west]
        );

        assert_eq!(graph.sorted_edges(east, None), vec![e_east]);
        assert!(graph.sorted_edges(NodeId(99), None).is_empty());
    }

    #[test]
    fn test_export_and_clear() {
        let mut graph = PlanarGraph::new();
        let a = graph.add_node(p(0.0, 0.0));
        let b = graph.add_node(p(3.0, 4.0));
        graph.add_edge(a, b);

        assert_eq!(graph.node_points(), vec![p(0.0, 0.0), p(3.0, 4.0)]);
        assert_eq!(graph.edge_segments(), vec![(p(0.0, 0.0), p(3.0, 4.0))]);

        graph.clear();
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }
}
