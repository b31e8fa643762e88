//! 面积/周长测量工具
//!
//! 单击即完成：通过链选择协作者找到与命中实体相连的整条链，
//! 在点击位置生成周长（以及可计算时的面积）文字标注。

use crate::tool::{MeasureTool, PreviewGeometry, ToolContext, ToolKind, ToolStep};
use tracing::debug;
use zmeasure_core::annotation::TextLabel;
use zmeasure_core::math::Point2;
use zmeasure_core::measurement::{AreaLabel, Measurement, MeasurementKind, MeasurementShape};

/// 面积测量工具
#[derive(Default)]
pub struct AreaTool;

impl AreaTool {
    pub fn new() -> Self {
        Self
    }
}

impl MeasureTool for AreaTool {
    fn tool_kind(&self) -> ToolKind {
        ToolKind::Area
    }

    fn reset(&mut self) {}

    fn on_click(&mut self, ctx: &ToolContext) -> ToolStep {
        let Some(hit) = ctx.first_hit() else {
            debug!("面积工具: 未选中实体，忽略点击");
            return ToolStep::Ignored;
        };

        // 没有链选择协作者时只计算命中的实体
        let chain = match ctx.chain {
            Some(selector) => selector.select_chain(hit.entity),
            None => vec![hit.entity.world_geometry()],
        };

        let scale = hit.scale.value();
        let perimeter = chain.iter().map(|g| g.length()).sum::<f64>() / scale;
        let area = match chain.as_slice() {
            [single] => single.enclosed_area().map(|a| a / (scale * scale)),
            _ => None,
        };

        let text = TextLabel::new(ctx.point, "", ctx.style.text_height, 0.0);
        let shape = MeasurementShape::Label(AreaLabel {
            perimeter,
            area,
            entity_count: chain.len(),
            text,
        });
        ToolStep::Commit(Measurement::new(
            MeasurementKind::Area,
            perimeter,
            vec![ctx.point],
            shape,
            ctx.style.precision,
        ))
    }

    fn get_prompt(&self) -> &str {
        "选择要测量周长的对象:"
    }

    fn get_preview(&self, _ctx: &ToolContext) -> Vec<PreviewGeometry> {
        Vec::new()
    }

    fn collected_points(&self) -> &[Point2] {
        &[]
    }
}
