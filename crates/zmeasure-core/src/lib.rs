//! ZCAD 测量核心
//!
//! 提供测量标注所需的几何图元、对象捕捉引擎和三种标注求解器。
//!
//! # 架构设计
//!
//! - `Entity`: 唯一标识 + 几何 + 放置变换，由外部加载器拥有
//! - `SnapEngine`: 根据指针位置和拾取结果给出最佳捕捉点，维护粘滞圆心
//! - 求解器：线性尺寸（`dimension`）、角度扇区（`angle`）、半径/直径引线（`leader`），
//!   都是纯函数，预览时每帧重新计算
//!
//! # 示例
//!
//! ```rust
//! use zmeasure_core::prelude::*;
//!
//! let style = MeasureStyle::default();
//! let state = resolve_dimension(
//!     Point2::new(0.0, 0.0),
//!     Point2::new(100.0, 0.0),
//!     Point2::new(50.0, 20.0),
//!     1.0,
//!     &style,
//! );
//! assert_eq!(state.orientation, DimensionOrientation::Aligned);
//! assert_eq!(state.text.content, "100.000");
//! ```

pub mod angle;
pub mod annotation;
pub mod dimension;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod leader;
pub mod math;
pub mod measurement;
pub mod snap;
pub mod transform;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::angle::{locate_sector, resolve_angle, sector_bounds, AngleState};
    pub use crate::annotation::{format_value, Arrowhead, MeasureStyle, TextLabel};
    pub use crate::dimension::{
        classify_orientation, resolve_dimension, ArrowPlacement, DimensionOrientation, DimensionState,
    };
    pub use crate::entity::{Entity, EntityId, ScaleContext};
    pub use crate::error::GeometryError;
    pub use crate::geometry::{
        intersect_lines, Arc, BulgeArc, Circle, Geometry, Line, Point, Polyline, PolylineSegment,
        PolylineVertex,
    };
    pub use crate::leader::{resolve_leader, LeaderMode, LeaderState};
    pub use crate::math::{BoundingBox2, Point2, Point3, Vector2, Vector3, EPSILON};
    pub use crate::measurement::{
        AreaLabel, Measurement, MeasurementId, MeasurementKind, MeasurementShape, ToleranceSpec,
    };
    pub use crate::snap::{
        HighlightState, MarkerShape, SnapConfig, SnapEngine, SnapMarker, SnapMask, SnapPoint,
        SnapQuery, SnapType,
    };
    pub use crate::transform::Transform2D;
}
