//! 2D视口
//!
//! 以世界窗口（左、右、下、上）描述可见区域，处理平移、缩放和坐标变换。
//! 屏幕坐标原点在左上角，y 轴向下。

use serde::{Deserialize, Serialize};
use shatter_core::math::{BoundingBox2, Point2};

/// 默认世界窗口半宽
pub const DEFAULT_HALF_EXTENT: f64 = 1000.0;

/// 适应视图时的放大系数
pub const FIT_MARGIN: f64 = 1.10;

/// 滚轮缩放步长
pub const ZOOM_STEP: f64 = 1.1;

/// 2D视口
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,

    /// 视口宽度（像素）
    pub width: u32,

    /// 视口高度（像素）
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            left: -DEFAULT_HALF_EXTENT,
            right: DEFAULT_HALF_EXTENT,
            bottom: -DEFAULT_HALF_EXTENT,
            top: DEFAULT_HALF_EXTENT,
            width,
            height,
        }
    }

    /// 更新视口大小
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn has_area(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn world_width(&self) -> f64 {
        self.right - self.left
    }

    pub fn world_height(&self) -> f64 {
        self.top - self.bottom
    }

    /// 世界窗口 (left, right, bottom, top)
    pub fn extents(&self) -> (f64, f64, f64, f64) {
        (self.left, self.right, self.bottom, self.top)
    }

    /// 屏幕坐标转世界坐标，视口无面积时返回原点
    pub fn screen_to_world(&self, screen: Point2) -> Point2 {
        if !self.has_area() {
            return Point2::origin();
        }
        let x = self.left + screen.x * self.world_width() / self.width as f64;
        let y = self.top - screen.y * self.world_height() / self.height as f64;
        Point2::new(x, y)
    }

    /// 世界坐标转屏幕坐标
    pub fn world_to_screen(&self, world: Point2) -> Point2 {
        let x = (world.x - self.left) * self.width as f64 / self.world_width();
        let y = (self.top - world.y) * self.height as f64 / self.world_height();
        Point2::new(x, y)
    }

    /// 按屏幕像素位移平移视图（内容跟随鼠标移动）
    pub fn pan_by_pixels(&mut self, dx: f64, dy: f64) {
        if !self.has_area() {
            return;
        }
        let dx_world = dx * self.world_width() / self.width as f64;
        let dy_world = -dy * self.world_height() / self.height as f64;
        self.left -= dx_world;
        self.right -= dx_world;
        self.bottom -= dy_world;
        self.top -= dy_world;
    }

    /// 以窗口中心缩放，并按视口宽高比修正窗口
    pub fn scale(&mut self, factor: f64) {
        if !self.has_area() {
            return;
        }
        let ratio = self.height as f64 / self.width as f64;
        let cx = (self.left + self.right) / 2.0;
        let cy = (self.bottom + self.top) / 2.0;
        let mut size_x = self.world_width() * factor;
        let mut size_y = self.world_height() * factor;
        if size_y > ratio * size_x {
            size_x = size_y / ratio;
        } else {
            size_y = size_x * ratio;
        }
        self.left = cx - size_x * 0.5;
        self.right = cx + size_x * 0.5;
        self.bottom = cy - size_y * 0.5;
        self.top = cy + size_y * 0.5;
    }

    /// 缩放到指定区域（留出 10% 边距）
    pub fn fit(&mut self, bbox: &BoundingBox2) {
        let (xmin, xmax, ymin, ymax) = bbox.extents();
        self.left = xmin;
        self.right = xmax;
        self.bottom = ymin;
        self.top = ymax;
        self.scale(FIT_MARGIN);
    }

    /// 滚轮缩放：向后滚动放大窗口（缩小视图），向前滚动相反
    pub fn zoom_by_wheel(&mut self, delta: f64) {
        let factor = if delta < 0.0 { ZOOM_STEP } else { 1.0 / ZOOM_STEP };
        self.scale(factor);
    }

    /// 一个像素对应的世界单位，宽度为零时为 1
    pub fn world_units_per_pixel(&self) -> f64 {
        if self.width == 0 {
            return 1.0;
        }
        self.world_width() / self.width as f64
    }

    /// 当前可见的世界区域
    pub fn visible_bounds(&self) -> BoundingBox2 {
        BoundingBox2::from_extents(self.left, self.right, self.bottom, self.top)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800, 600)
    }
}
