//! 核心操作错误定义
//!
//! 所有错误都是可恢复的：返回错误的操作不会修改已有状态。

use crate::entity::ShapeId;
use crate::geometry::ShapeKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SketchError {
    #[error("Need at least {required} shapes to build a graph, got {found}")]
    NotEnoughShapes { required: usize, found: usize },

    #[error("{kind} needs {expected} control points, got {found}")]
    WrongPointCount {
        kind: ShapeKind,
        expected: &'static str,
        found: usize,
    },

    #[error("Shape not found: {0}")]
    ShapeNotFound(ShapeId),
}

pub type Result<T> = std::result::Result<T, SketchError>;
