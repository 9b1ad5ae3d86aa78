//! 平面图构建（打碎）
//!
//! 1. 把所有图形拆成带来源标记的线段
//! 2. 对不同图形的每一对线段求交点
//! 3. 端点和交点作为节点加入图中（按位置去重）
//! 4. 每条线段在其上的所有节点处切开，相邻节点之间连边
//!
//! 交点扫描是朴素的 O(S²)。线段数达到 `GraphConfig::parallel_threshold` 时
//! 按线段分片交给 rayon 并行计算，再按线段顺序合并，结果与串行完全一致。

use crate::config::GraphConfig;
use crate::error::{Result, SketchError};
use crate::geometry::Shape;
use crate::graph::{NodeId, PlanarGraph};
use crate::intersect::{point_on_segment, segment_intersection};
use crate::math::{dist_sq, Point2};
use rayon::prelude::*;
use std::cmp::Ordering;
use tracing::debug;

/// 构建图至少需要的图形数
pub const MIN_SHAPES: usize = 2;

/// 构建结果：平面图 + 原始交点列表（含重复）
#[derive(Debug, Clone)]
pub struct GraphBuild {
    pub graph: PlanarGraph,
    pub intersections: Vec<Point2>,
}

/// 带来源图形序号的线段
#[derive(Debug, Clone, Copy)]
struct TaggedSegment {
    shape: usize,
    start: Point2,
    end: Point2,
}

fn collect_segments(shapes: &[&Shape]) -> Vec<TaggedSegment> {
    shapes
        .iter()
        .enumerate()
        .flat_map(|(shape, s)| {
            s.segments()
                .into_iter()
                .map(move |(start, end)| TaggedSegment { shape, start, end })
        })
        .collect()
}

/// 第 `i` 条线段与其后所有线段的交点（同一图形内的线段跳过）
fn intersections_after(segments: &[TaggedSegment], i: usize) -> Vec<Point2> {
    let a = &segments[i];
    segments[i + 1..]
        .iter()
        .filter(|b| b.shape != a.shape)
        .filter_map(|b| segment_intersection(&a.start, &a.end, &b.start, &b.end))
        .collect()
}

fn find_intersections(segments: &[TaggedSegment], parallel_threshold: usize) -> Vec<Point2> {
    let parallel = parallel_threshold > 0 && segments.len() >= parallel_threshold;
    if parallel {
        let shards: Vec<Vec<Point2>> = (0..segments.len())
            .into_par_iter()
            .map(|i| intersections_after(segments, i))
            .collect();
        shards.into_iter().flatten().collect()
    } else {
        (0..segments.len())
            .flat_map(|i| intersections_after(segments, i))
            .collect()
    }
}

/// 在线段上的所有节点处切开并连边
fn shatter_segment(graph: &mut PlanarGraph, start: NodeId, end: NodeId) {
    let epsilon = graph.epsilon();
    let (p1, p2) = match (graph.node(start), graph.node(end)) {
        (Some(a), Some(b)) => (a.point, b.point),
        _ => return,
    };

    let mut interior: Vec<(f64, NodeId)> = graph
        .nodes()
        .iter()
        .enumerate()
        .map(|(i, n)| (NodeId(i), n.point))
        .filter(|(id, point)| {
            *id != start && *id != end && point_on_segment(point, &p1, &p2, epsilon)
        })
        .map(|(id, point)| (dist_sq(&p1, &point), id))
        .collect();
    interior.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    let mut previous = start;
    for (_, node) in interior {
        graph.add_edge(previous, node);
        previous = node;
    }
    graph.add_edge(previous, end);
}

/// 由一组图形构建平面图
///
/// 少于两个图形时返回 `NotEnoughShapes`。
pub fn build_graph(shapes: &[&Shape], config: &GraphConfig) -> Result<GraphBuild> {
    if shapes.len() < MIN_SHAPES {
        return Err(SketchError::NotEnoughShapes {
            required: MIN_SHAPES,
            found: shapes.len(),
        });
    }

    let segments = collect_segments(shapes);
    let intersections = find_intersections(&segments, config.parallel_threshold);

    let mut graph = PlanarGraph::with_epsilon(config.node_epsilon);
    let endpoints: Vec<(NodeId, NodeId)> = segments
        .iter()
        .map(|s| {
            let a = graph.add_node(s.start);
            let b = graph.add_node(s.end);
            (a, b)
        })
        .collect();
    for point in &intersections {
        graph.add_node(*point);
    }

    for (start, end) in endpoints {
        shatter_segment(&mut graph, start, end);
    }

    debug!(
        "Built planar graph from {} shapes: {} segments, {} intersections, {} nodes, {} edges",
        shapes.len(),
        segments.len(),
        intersections.len(),
        graph.node_count(),
        graph.edge_count()
    );

    Ok(GraphBuild {
        graph,
        intersections,
    })
}
