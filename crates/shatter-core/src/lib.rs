//! Shatter 核心几何引擎
//!
//! 提供2D曲线图元、离散化、最近点与线段求交、悬停拾取，
//! 以及把选中图形打碎成平面图的功能。
//!
//! # 架构设计
//!
//! - `Shape`: 封闭的图元枚举，构造时完成离散化
//! - `Model`: 图形、选择集和派生的平面图
//! - `PlanarGraph`: 以索引相互引用的节点/边数组
//!
//! # 示例
//!
//! ```rust
//! use shatter_core::prelude::*;
//!
//! let mut model = Model::new();
//! let a = model.add_shape(Shape::Line(Line::new(Point2::origin(), Point2::new(10.0, 10.0))));
//! let b = model.add_shape(Shape::Line(Line::new(Point2::new(0.0, 10.0), Point2::new(10.0, 0.0))));
//! model.add_to_selection(a);
//! model.add_to_selection(b);
//!
//! let graph = model.build_graph_from_selection(&GraphConfig::default()).unwrap();
//! assert_eq!(graph.node_count(), 5);
//! assert_eq!(graph.edge_count(), 4);
//! ```

pub mod config;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod hover;
pub mod intersect;
pub mod math;
pub mod model;
pub mod shatter;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::config::{GraphConfig, HoverConfig, SketchConfig, TessellationConfig};
    pub use crate::entity::{Entity, ShapeId};
    pub use crate::error::SketchError;
    pub use crate::geometry::{
        Circle, CircleArc, CubicBezier, Line, Polygon, Polyline, PrimitiveKind, QuadBezier, Shape,
        ShapeKind,
    };
    pub use crate::graph::{EdgeId, NodeId, PlanarGraph};
    pub use crate::hover::HoverManager;
    pub use crate::math::{BoundingBox2, Point2, Vector2};
    pub use crate::model::Model;
}
