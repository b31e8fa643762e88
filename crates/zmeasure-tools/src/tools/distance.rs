//! 距离测量工具

use crate::error::ToolError;
use crate::tool::{MeasureTool, PreviewGeometry, ToolContext, ToolKind, ToolStep};
use zmeasure_core::dimension::resolve_dimension;
use zmeasure_core::entity::ScaleContext;
use zmeasure_core::geometry::{Geometry, Line};
use zmeasure_core::math::Point2;
use zmeasure_core::measurement::{Measurement, MeasurementKind, MeasurementShape};

/// 两点重合判定距离
const MIN_SEGMENT_LENGTH: f64 = 0.001;

/// 距离测量：起点 → 终点 → 尺寸线位置
pub struct DistanceTool {
    points: Vec<Point2>,
    scale: ScaleContext,
}

impl DistanceTool {
    pub fn new() -> Self {
        Self {
            points: Vec::with_capacity(2),
            scale: ScaleContext::default(),
        }
    }
}

impl Default for DistanceTool {
    fn default() -> Self {
        Self::new()
    }
}

impl MeasureTool for DistanceTool {
    fn tool_kind(&self) -> ToolKind {
        ToolKind::Distance
    }

    fn reset(&mut self) {
        self.points.clear();
        self.scale = ScaleContext::default();
    }

    fn on_click(&mut self, ctx: &ToolContext) -> ToolStep {
        match self.points.as_slice() {
            [] => {
                self.scale = ctx.first_hit().map(|h| h.scale).unwrap_or_default();
                self.points.push(ctx.point);
                ToolStep::Continue
            }
            [start] => {
                if (ctx.point - *start).norm() < MIN_SEGMENT_LENGTH {
                    return ToolStep::Rejected(ToolError::DegenerateSegment);
                }
                self.points.push(ctx.point);
                ToolStep::Continue
            }
            [p1, p2, ..] => {
                let (p1, p2) = (*p1, *p2);
                let state = resolve_dimension(p1, p2, ctx.point, self.scale.value(), ctx.style);
                let measurement = Measurement::new(
                    MeasurementKind::Distance,
                    state.value,
                    vec![p1, p2, ctx.point],
                    MeasurementShape::Dimension(state),
                    ctx.style.precision,
                );
                self.reset();
                ToolStep::Commit(measurement)
            }
        }
    }

    fn get_prompt(&self) -> &str {
        match self.points.len() {
            0 => "指定第一个测量点:",
            1 => "指定第二个测量点:",
            _ => "指定尺寸线位置:",
        }
    }

    fn get_preview(&self, ctx: &ToolContext) -> Vec<PreviewGeometry> {
        match self.points.as_slice() {
            [] => Vec::new(),
            [start] => vec![PreviewGeometry::Reference(Geometry::Line(Line::new(
                *start, ctx.point,
            )))],
            [p1, p2, ..] => vec![PreviewGeometry::Dimension(resolve_dimension(
                *p1,
                *p2,
                ctx.point,
                self.scale.value(),
                ctx.style,
            ))],
        }
    }

    fn collected_points(&self) -> &[Point2] {
        &self.points
    }
}
