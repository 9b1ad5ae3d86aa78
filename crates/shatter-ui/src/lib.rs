//! Shatter 交互层
//!
//! 与窗口系统无关的画布控制器：模式切换、图形创建状态机、
//! 选择逻辑、视口变换以及渲染帧输出。

pub mod render;
pub mod state;
pub mod viewport;

pub use render::RenderFrame;
pub use state::{Canvas, CanvasMode, Modifiers, MouseButton};
pub use viewport::Viewport;
