//! 几何计算错误定义

use thiserror::Error;

/// 退化几何错误
///
/// 全部可在本地恢复：调用方放弃当前步骤并提示用户重新输入。
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GeometryError {
    #[error("Zero-length segment")]
    ZeroLength,

    #[error("Lines are parallel, no intersection")]
    Parallel,

    #[error("Cannot normalize a zero-length radius direction")]
    ZeroRadius,

    #[error("Bulge {0} does not describe an arc")]
    DegenerateBulge(f64),
}
