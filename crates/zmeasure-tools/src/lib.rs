//! ZCAD 测量工具
//!
//! 距离、角度、半径、直径和周长测量的交互状态机。
//!
//! 每个工具实现 [`tool::MeasureTool`]，按点击推进；[`session::ToolSession`]
//! 持有当前工具、对象捕捉引擎和宿主回调，通过单一入口 `step(event)`
//! 返回预览、提交的测量或被拒绝的步骤。

pub mod chain;
pub mod config;
pub mod error;
pub mod session;
pub mod tool;
pub mod tools;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::chain::{ChainSelector, EndpointChainSelector};
    pub use crate::config::MeasureConfig;
    pub use crate::error::{ConfigError, ToolError};
    pub use crate::session::{PointerInput, SessionEvent, StepOutcome, ToolSession};
    pub use crate::tool::{MeasureTool, PickHit, PreviewGeometry, ToolContext, ToolKind, ToolStep};
    pub use crate::tools::create_tool;
}
