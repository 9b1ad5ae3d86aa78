//! 图形标识
//!
//! 模型中的每个图形都有唯一的 `ShapeId`，选择集按标识判断成员关系，
//! 几何完全相同的两个图形仍是不同的图形。

use crate::geometry::Shape;
use crate::math::BoundingBox2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// 全局图形ID生成器
static SHAPE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// 图形唯一标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(pub u64);

impl ShapeId {
    /// 分配新的图形ID
    pub fn new() -> Self {
        Self(SHAPE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// 空ID（无效）
    pub const NULL: ShapeId = ShapeId(0);

    /// 检查是否为空ID
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl Default for ShapeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 模型中的图形：标识 + 几何
#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    pub id: ShapeId,
    pub shape: Shape,
}

impl Entity {
    /// 创建新实体并分配标识
    pub fn new(shape: Shape) -> Self {
        Self {
            id: ShapeId::new(),
            shape,
        }
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        self.shape.bounding_box()
    }
}
