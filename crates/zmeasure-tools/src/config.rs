//! 测量配置

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use zmeasure_core::annotation::MeasureStyle;
use zmeasure_core::snap::SnapConfig;

/// 测量会话配置：标注样式 + 对象捕捉
///
/// 缺失的字段使用默认值。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureConfig {
    pub style: MeasureStyle,
    pub snap: SnapConfig,
}

impl MeasureConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// 从 JSON 文件加载
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
