//! 测量工具错误定义

use thiserror::Error;
use zmeasure_core::error::GeometryError;
use zmeasure_core::measurement::MeasurementId;

/// 工具步骤错误
///
/// 只会中止当前步骤，会话本身保持可用。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    #[error("Point coincides with the previous point")]
    DegenerateSegment,

    #[error("Selected lines are parallel")]
    ParallelLines,

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Measurement not found: {0}")]
    UnknownMeasurement(MeasurementId),
}

/// 配置加载错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ToolResult<T> = Result<T, ToolError>;
