//! 实体定义
//!
//! 实体 = 唯一标识 + 局部几何 + 放置变换。实体由外部加载器拥有，
//! 测量核心只通过引用读取。

use crate::geometry::Geometry;
use crate::transform::Transform2D;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 实体唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 图元实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    /// 局部坐标系下的几何
    pub geometry: Geometry,
    /// 放置变换（图块插入、模板缩放）
    #[serde(default)]
    pub transform: Transform2D,
}

impl Entity {
    pub fn new(id: EntityId, geometry: Geometry) -> Self {
        Self {
            id,
            geometry,
            transform: Transform2D::identity(),
        }
    }

    pub fn with_transform(mut self, transform: Transform2D) -> Self {
        self.transform = transform;
        self
    }

    /// 世界坐标下的几何
    pub fn world_geometry(&self) -> Geometry {
        self.transform.apply(&self.geometry)
    }
}

/// 拾取结果附带的比例上下文
///
/// 由宿主在拾取时一次性解析（放置比例、模板比例等），测量值 = 世界长度 / 比例。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleContext(f64);

impl ScaleContext {
    /// 非正数或非有限值回退为 1.0
    pub fn new(scale: f64) -> Self {
        if scale.is_finite() && scale > 0.0 {
            Self(scale)
        } else {
            Self(1.0)
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for ScaleContext {
    fn default() -> Self {
        Self(1.0)
    }
}
