//! 具体的测量工具实现

mod angle;
mod area;
mod distance;
mod radius;

pub use angle::AngleTool;
pub use area::AreaTool;
pub use distance::DistanceTool;
pub use radius::RadiusTool;

use crate::tool::{MeasureTool, ToolKind};

/// 创建指定类型的工具
pub fn create_tool(kind: ToolKind) -> Option<Box<dyn MeasureTool>> {
    match kind {
        ToolKind::Distance => Some(Box::new(DistanceTool::new())),
        ToolKind::Angle => Some(Box::new(AngleTool::new())),
        ToolKind::Radius => Some(Box::new(RadiusTool::radius())),
        ToolKind::Diameter => Some(Box::new(RadiusTool::diameter())),
        ToolKind::Area => Some(Box::new(AreaTool::new())),
        ToolKind::None => None,
    }
}
