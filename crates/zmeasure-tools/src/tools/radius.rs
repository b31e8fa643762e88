//! 半径/直径测量工具
//!
//! 第一次点击选择圆或圆弧，第二次点击确定箭头位置（投影到圆上），
//! 第三次点击确定文字位置。

use crate::error::ToolError;
use crate::tool::{MeasureTool, PreviewGeometry, ToolContext, ToolKind, ToolStep};
use tracing::debug;
use zmeasure_core::geometry::Geometry;
use zmeasure_core::leader::{resolve_leader, LeaderMode};
use zmeasure_core::math::{try_normalize, Point2};
use zmeasure_core::measurement::{Measurement, MeasurementKind, MeasurementShape};

const CENTER_TOLERANCE: f64 = 0.001;

/// 选中的圆/圆弧（世界坐标）
#[derive(Debug, Clone, Copy)]
struct Anchor {
    center: Point2,
    radius: f64,
    scale: f64,
}

impl Anchor {
    /// 箭头方向参考点：捕捉落在圆心上时（圆心回退捕捉）改用鼠标位置
    fn arrow_target(&self, ctx: &ToolContext) -> Point2 {
        if (ctx.point - self.center).norm() < CENTER_TOLERANCE {
            ctx.mouse
        } else {
            ctx.point
        }
    }
}

/// 半径/直径测量工具
pub struct RadiusTool {
    mode: LeaderMode,
    anchor: Option<Anchor>,
    /// 圆心、箭头点
    points: Vec<Point2>,
}

impl RadiusTool {
    pub fn new(mode: LeaderMode) -> Self {
        Self {
            mode,
            anchor: None,
            points: Vec::with_capacity(2),
        }
    }

    pub fn radius() -> Self {
        Self::new(LeaderMode::Radius)
    }

    pub fn diameter() -> Self {
        Self::new(LeaderMode::Diameter)
    }

    fn measurement_kind(&self) -> MeasurementKind {
        match self.mode {
            LeaderMode::Radius => MeasurementKind::Radius,
            LeaderMode::Diameter => MeasurementKind::Diameter,
        }
    }
}

impl MeasureTool for RadiusTool {
    fn tool_kind(&self) -> ToolKind {
        match self.mode {
            LeaderMode::Radius => ToolKind::Radius,
            LeaderMode::Diameter => ToolKind::Diameter,
        }
    }

    fn reset(&mut self) {
        self.anchor = None;
        self.points.clear();
    }

    fn on_click(&mut self, ctx: &ToolContext) -> ToolStep {
        let Some(anchor) = self.anchor else {
            let picked = ctx.first_hit().and_then(|hit| {
                let (center, radius) = match hit.entity.world_geometry() {
                    Geometry::Circle(c) => (c.center, c.radius),
                    Geometry::Arc(a) => (a.center, a.radius),
                    _ => return None,
                };
                Some(Anchor {
                    center,
                    radius,
                    scale: hit.scale.value(),
                })
            });
            return match picked {
                Some(anchor) => {
                    self.anchor = Some(anchor);
                    self.points.push(anchor.center);
                    ToolStep::Continue
                }
                None => {
                    debug!("{}工具: 未选中圆或圆弧，忽略点击", self.name());
                    ToolStep::Ignored
                }
            };
        };

        if self.points.len() < 2 {
            let Some(u) = try_normalize(&(anchor.arrow_target(ctx) - anchor.center)) else {
                return ToolStep::Rejected(ToolError::DegenerateSegment);
            };
            self.points.push(anchor.center + u * anchor.radius);
            return ToolStep::Continue;
        }

        let arrow_point = self.points[1];
        let result = resolve_leader(
            anchor.center,
            anchor.radius,
            arrow_point,
            ctx.point,
            self.mode,
            anchor.scale,
            ctx.style,
        );
        let kind = self.measurement_kind();
        self.reset();
        match result {
            Ok(state) => ToolStep::Commit(Measurement::new(
                kind,
                state.value,
                vec![anchor.center, arrow_point, ctx.point],
                MeasurementShape::Leader(state),
                ctx.style.precision,
            )),
            Err(e) => ToolStep::Rejected(e.into()),
        }
    }

    fn get_prompt(&self) -> &str {
        match (self.anchor, self.points.len()) {
            (None, _) => "选择圆或圆弧:",
            (Some(_), 1) => "指定箭头位置:",
            (Some(_), _) => "指定文字位置:",
        }
    }

    fn get_preview(&self, ctx: &ToolContext) -> Vec<PreviewGeometry> {
        let Some(anchor) = self.anchor else {
            return Vec::new();
        };
        // 未确定箭头时箭头和文字都跟随鼠标
        let (arrow_point, text_point) = match self.points.get(1) {
            Some(&arrow) => (arrow, ctx.point),
            None => {
                let target = anchor.arrow_target(ctx);
                (target, target)
            }
        };
        resolve_leader(
            anchor.center,
            anchor.radius,
            arrow_point,
            text_point,
            self.mode,
            anchor.scale,
            ctx.style,
        )
        .map(|state| vec![PreviewGeometry::Leader(state)])
        .unwrap_or_default()
    }

    fn collected_points(&self) -> &[Point2] {
        &self.points
    }
}
