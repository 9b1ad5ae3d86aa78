//! 运行参数配置
//!
//! 所有字段都有默认值，反序列化时缺失的字段取默认值。

use crate::math::EPSILON;
use serde::{Deserialize, Serialize};

/// 曲线离散化步数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TessellationConfig {
    pub quad_bezier_steps: usize,
    pub cubic_bezier_steps: usize,
    pub circle_steps: usize,
    pub arc_steps: usize,
}

impl Default for TessellationConfig {
    fn default() -> Self {
        Self {
            quad_bezier_steps: 20,
            cubic_bezier_steps: 30,
            circle_steps: 40,
            arc_steps: 40,
        }
    }
}

/// 平面图构建参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// 节点合并容差（按距离平方 `epsilon²` 比较）
    pub node_epsilon: f64,
    /// 线段数达到该值时并行计算交点，0 表示始终串行
    pub parallel_threshold: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            node_epsilon: EPSILON,
            parallel_threshold: 2048,
        }
    }
}

/// 悬停拾取参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverConfig {
    /// 拾取框边长（像素）
    pub pixel_box_size: f64,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            pixel_box_size: 30.0,
        }
    }
}

/// 全部配置
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    pub tessellation: TessellationConfig,
    pub graph: GraphConfig,
    pub hover: HoverConfig,
}
