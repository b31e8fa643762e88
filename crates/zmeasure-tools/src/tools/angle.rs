//! 角度测量工具
//!
//! 两种输入方式：
//! - 选择对象：先后点击两条直线（或多段线的直线段），交点作为角顶点
//! - 手动指定：依次点击角顶点、第一条边上的点、第二条边上的点
//!
//! 第四次点击（两种方式相同）为标注弧线位置。

use crate::error::ToolError;
use crate::tool::{MeasureTool, PickHit, PreviewGeometry, ToolContext, ToolKind, ToolStep};
use tracing::debug;
use zmeasure_core::angle::resolve_angle;
use zmeasure_core::error::GeometryError;
use zmeasure_core::geometry::{intersect_lines, Geometry, Line, PolylineSegment};
use zmeasure_core::math::{Point2, EPSILON};
use zmeasure_core::measurement::{Measurement, MeasurementKind, MeasurementShape};

/// 边上的点与顶点重合判定距离
const MIN_ARM_LENGTH: f64 = 0.001;

/// 输入方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// 尚未确定（第一次点击决定）
    Undecided,
    /// 选择对象
    Object,
    /// 手动指定
    Manual,
}

/// 角度测量工具
pub struct AngleTool {
    mode: Mode,
    /// 顶点、第一条边上的点、第二条边上的点
    points: Vec<Point2>,
    /// 选择对象方式下已选的第一条直线及其点击位置
    first_line: Option<(Line, Point2)>,
}

impl AngleTool {
    pub fn new() -> Self {
        Self {
            mode: Mode::Undecided,
            points: Vec::with_capacity(3),
            first_line: None,
        }
    }

    fn on_object_pick(&mut self, ctx: &ToolContext) -> ToolStep {
        // 第二次选择跳过已选的直线（在交点附近点击时两条直线都会命中）
        let line = ctx
            .hits
            .iter()
            .filter_map(|hit| picked_line(hit, &ctx.point))
            .find(|line| self.first_line.as_ref().map_or(true, |(first, _)| first != line));
        let Some(line) = line else {
            debug!("角度工具: 未选中新的直线，忽略点击");
            return ToolStep::Ignored;
        };

        let Some((first, first_click)) = self.first_line.take() else {
            self.mode = Mode::Object;
            self.first_line = Some((line, ctx.point));
            return ToolStep::Continue;
        };

        match intersect_lines(first.start, first.end, line.start, line.end) {
            Ok(center) => {
                self.points.push(center);
                self.points.push(arm_endpoint(&first, center, first_click));
                self.points.push(arm_endpoint(&line, center, ctx.point));
                ToolStep::Continue
            }
            Err(GeometryError::Parallel) => {
                self.reset();
                ToolStep::Rejected(ToolError::ParallelLines)
            }
            Err(e) => {
                self.reset();
                ToolStep::Rejected(e.into())
            }
        }
    }

    fn on_manual_point(&mut self, ctx: &ToolContext) -> ToolStep {
        if let Some(center) = self.points.first() {
            if (ctx.point - *center).norm() < MIN_ARM_LENGTH {
                return ToolStep::Rejected(ToolError::DegenerateSegment);
            }
        }
        self.mode = Mode::Manual;
        self.points.push(ctx.point);
        ToolStep::Continue
    }

    fn commit(&mut self, ctx: &ToolContext) -> ToolStep {
        let (center, arm1, arm2) = (self.points[0], self.points[1], self.points[2]);
        let result = resolve_angle(center, arm1, arm2, Some(ctx.point), ctx.style);
        self.reset();
        match result {
            Ok(state) => ToolStep::Commit(Measurement::new(
                MeasurementKind::Angle,
                state.value,
                vec![center, arm1, arm2, ctx.point],
                MeasurementShape::Angle(state),
                ctx.style.angle_precision,
            )),
            Err(e) => ToolStep::Rejected(e.into()),
        }
    }
}

impl Default for AngleTool {
    fn default() -> Self {
        Self::new()
    }
}

impl MeasureTool for AngleTool {
    fn tool_kind(&self) -> ToolKind {
        ToolKind::Angle
    }

    fn reset(&mut self) {
        self.mode = Mode::Undecided;
        self.points.clear();
        self.first_line = None;
    }

    fn on_click(&mut self, ctx: &ToolContext) -> ToolStep {
        if self.points.len() >= 3 {
            return self.commit(ctx);
        }
        match self.mode {
            Mode::Object => self.on_object_pick(ctx),
            Mode::Manual => self.on_manual_point(ctx),
            Mode::Undecided => {
                let on_line = ctx
                    .first_hit()
                    .and_then(|hit| picked_line(hit, &ctx.point))
                    .is_some();
                if on_line {
                    self.on_object_pick(ctx)
                } else {
                    self.on_manual_point(ctx)
                }
            }
        }
    }

    fn get_prompt(&self) -> &str {
        match (self.mode, self.points.len()) {
            (_, 3..) => "指定标注弧线位置:",
            (Mode::Object, _) => "选择第二条直线:",
            (Mode::Manual, 1) => "指定第一条边上的点:",
            (Mode::Manual, _) => "指定第二条边上的点:",
            (Mode::Undecided, _) => "选择第一条直线 或 指定角顶点:",
        }
    }

    fn get_preview(&self, ctx: &ToolContext) -> Vec<PreviewGeometry> {
        let mut previews = Vec::new();

        match self.points.as_slice() {
            [] => {
                if let Some((line, _)) = &self.first_line {
                    previews.push(PreviewGeometry::Reference(Geometry::Line(line.clone())));
                }
            }
            [center] => {
                previews.push(PreviewGeometry::Reference(Geometry::Line(Line::new(
                    *center, ctx.point,
                ))));
            }
            [center, arm1] => {
                previews.push(PreviewGeometry::Reference(Geometry::Line(Line::new(*center, *arm1))));
                previews.push(PreviewGeometry::Reference(Geometry::Line(Line::new(
                    *center, ctx.point,
                ))));
                if let Ok(state) = resolve_angle(*center, *arm1, ctx.point, None, ctx.style) {
                    previews.push(PreviewGeometry::Angle(state));
                }
            }
            [center, arm1, arm2, ..] => {
                previews.push(PreviewGeometry::Reference(Geometry::Line(Line::new(*center, *arm1))));
                previews.push(PreviewGeometry::Reference(Geometry::Line(Line::new(*center, *arm2))));
                if let Ok(state) = resolve_angle(*center, *arm1, *arm2, Some(ctx.point), ctx.style) {
                    previews.push(PreviewGeometry::Angle(state));
                }
            }
        }

        previews
    }

    fn collected_points(&self) -> &[Point2] {
        &self.points
    }
}

/// 命中实体上被点击的直线（世界坐标）
///
/// 多段线优先使用拾取给出的线段序号，该线段不是直线段时按距离查找最近的直线段。
fn picked_line(hit: &PickHit, click: &Point2) -> Option<Line> {
    match hit.entity.world_geometry() {
        Geometry::Line(line) => Some(line),
        Geometry::Polyline(pl) => {
            let indexed = hit.segment_index.and_then(|i| match pl.segment(i) {
                Some(PolylineSegment::Straight(line)) => Some(line),
                _ => None,
            });
            indexed.or_else(|| {
                let i = pl.closest_straight_segment(click)?;
                match pl.segment(i) {
                    Some(PolylineSegment::Straight(line)) => Some(line),
                    _ => None,
                }
            })
        }
        _ => None,
    }
}

/// 直线上与点击位置同侧（相对交点）的端点
fn arm_endpoint(line: &Line, center: Point2, click: Point2) -> Point2 {
    let toward = click - center;
    let (near, far) = if (line.start - center).dot(&toward) >= (line.end - center).dot(&toward) {
        (line.start, line.end)
    } else {
        (line.end, line.start)
    };
    // 端点恰好是交点时换用另一端
    if (near - center).norm() < EPSILON {
        far
    } else {
        near
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zmeasure_core::annotation::MeasureStyle;
    use zmeasure_core::entity::{Entity, EntityId};
    use zmeasure_core::geometry::{Polyline, PolylineVertex};

    fn ctx<'a>(point: Point2, hits: &'a [PickHit<'a>], style: &'a MeasureStyle) -> ToolContext<'a> {
        ToolContext {
            point,
            mouse: point,
            hits,
            style,
            chain: None,
        }
    }

    fn line_entity(id: u64, a: (f64, f64), b: (f64, f64)) -> Entity {
        Entity::new(
            EntityId(id),
            Geometry::Line(Line::new(Point2::new(a.0, a.1), Point2::new(b.0, b.1))),
        )
    }

    #[test]
    fn test_manual_mode_commits_on_fourth_click() {
        let style = MeasureStyle::default();
        let mut tool = AngleTool::new();
        tool.on_click(&ctx(Point2::new(0.0, 0.0), &[], &style));
        assert_eq!(tool.get_prompt(), "指定第一条边上的点:");
        tool.on_click(&ctx(Point2::new(10.0, 0.0), &[], &style));
        tool.on_click(&ctx(Point2::new(0.0, 10.0), &[], &style));
        assert_eq!(tool.get_prompt(), "指定标注弧线位置:");

        match tool.on_click(&ctx(Point2::new(5.0, 5.0), &[], &style)) {
            ToolStep::Commit(m) => {
                assert_eq!(m.kind, MeasurementKind::Angle);
                assert!((m.value - 90.0).abs() < 1e-9);
                assert_eq!(m.label, "90.0°");
                assert_eq!(m.points.len(), 4);
            }
            other => panic!("expected commit, got {:?}", other),
        }
        assert!(tool.collected_points().is_empty());
    }

    #[test]
    fn test_object_mode_intersects_lines() {
        let style = MeasureStyle::default();
        let horizontal = line_entity(1, (-10.0, 0.0), (20.0, 0.0));
        let vertical = line_entity(2, (5.0, -10.0), (5.0, 30.0));
        let mut tool = AngleTool::new();

        let hits = [PickHit::new(&horizontal)];
        assert_eq!(tool.on_click(&ctx(Point2::new(15.0, 0.0), &hits, &style)), ToolStep::Continue);
        assert_eq!(tool.get_prompt(), "选择第二条直线:");

        let hits = [PickHit::new(&vertical)];
        assert_eq!(tool.on_click(&ctx(Point2::new(5.0, 20.0), &hits, &style)), ToolStep::Continue);

        let points = tool.collected_points();
        assert_eq!(points.len(), 3);
        assert!((points[0] - Point2::new(5.0, 0.0)).norm() < 1e-9);
        // 与点击同侧的端点
        assert_eq!(points[1], Point2::new(20.0, 0.0));
        assert_eq!(points[2], Point2::new(5.0, 30.0));

        match tool.on_click(&ctx(Point2::new(10.0, 10.0), &[], &style)) {
            ToolStep::Commit(m) => assert!((m.value - 90.0).abs() < 1e-9),
            other => panic!("expected commit, got {:?}", other),
        }
    }

    #[test]
    fn test_second_pick_skips_first_line_near_intersection() {
        let style = MeasureStyle::default();
        let horizontal = line_entity(1, (0.0, 0.0), (20.0, 0.0));
        let vertical = line_entity(2, (0.0, 0.0), (0.0, 20.0));
        let mut tool = AngleTool::new();
        tool.on_click(&ctx(Point2::new(15.0, 0.0), &[PickHit::new(&horizontal)], &style));

        // 在交点附近点击，拾取顺序中第一条仍是已选的直线
        let hits = [PickHit::new(&horizontal), PickHit::new(&vertical)];
        assert_eq!(tool.on_click(&ctx(Point2::new(0.2, 0.5), &hits, &style)), ToolStep::Continue);
        let points = tool.collected_points();
        assert_eq!(points.len(), 3);
        assert!(points[0].coords.norm() < 1e-9);
        assert_eq!(points[1], Point2::new(20.0, 0.0));
        assert_eq!(points[2], Point2::new(0.0, 20.0));

        // 只命中已选的直线时忽略，保留第一次选择
        let mut tool = AngleTool::new();
        tool.on_click(&ctx(Point2::new(15.0, 0.0), &[PickHit::new(&horizontal)], &style));
        let same = [PickHit::new(&horizontal)];
        assert_eq!(tool.on_click(&ctx(Point2::new(10.0, 0.0), &same, &style)), ToolStep::Ignored);
        assert_eq!(tool.get_prompt(), "选择第二条直线:");
    }

    #[test]
    fn test_parallel_lines_are_rejected_and_reset() {
        let style = MeasureStyle::default();
        let a = line_entity(1, (0.0, 0.0), (10.0, 0.0));
        let b = line_entity(2, (0.0, 5.0), (10.0, 5.0));
        let mut tool = AngleTool::new();
        tool.on_click(&ctx(Point2::new(5.0, 0.0), &[PickHit::new(&a)], &style));
        let step = tool.on_click(&ctx(Point2::new(5.0, 5.0), &[PickHit::new(&b)], &style));
        assert_eq!(step, ToolStep::Rejected(ToolError::ParallelLines));
        assert!(tool.collected_points().is_empty());
        assert_eq!(tool.get_prompt(), "选择第一条直线 或 指定角顶点:");
    }

    #[test]
    fn test_object_mode_ignores_non_line_second_pick() {
        let style = MeasureStyle::default();
        let a = line_entity(1, (0.0, 0.0), (10.0, 0.0));
        let mut tool = AngleTool::new();
        tool.on_click(&ctx(Point2::new(5.0, 0.0), &[PickHit::new(&a)], &style));
        assert_eq!(tool.on_click(&ctx(Point2::new(50.0, 50.0), &[], &style)), ToolStep::Ignored);
        assert_eq!(tool.get_prompt(), "选择第二条直线:");
    }

    #[test]
    fn test_polyline_segment_index_is_used() {
        let style = MeasureStyle::default();
        let pl = Entity::new(
            EntityId(3),
            Geometry::Polyline(Polyline::new(
                vec![
                    PolylineVertex::new(Point2::new(0.0, 0.0)),
                    PolylineVertex::new(Point2::new(10.0, 0.0)),
                    PolylineVertex::new(Point2::new(10.0, 10.0)),
                ],
                false,
            )),
        );
        let hit = PickHit::new(&pl).with_segment(1);
        let line = picked_line(&hit, &Point2::new(1.0, 0.0)).unwrap();
        assert_eq!(line.start, Point2::new(10.0, 0.0));
        assert_eq!(line.end, Point2::new(10.0, 10.0));

        // 无序号时按距离
        let hit = PickHit::new(&pl);
        let line = picked_line(&hit, &Point2::new(1.0, 0.5)).unwrap();
        assert_eq!(line.start, Point2::new(0.0, 0.0));

        // 同一多段线的两段构成直角
        let mut tool = AngleTool::new();
        let first = [PickHit::new(&pl).with_segment(0)];
        let second = [PickHit::new(&pl).with_segment(1)];
        tool.on_click(&ctx(Point2::new(2.0, 0.0), &first, &style));
        tool.on_click(&ctx(Point2::new(10.0, 8.0), &second, &style));
        assert_eq!(tool.collected_points()[0], Point2::new(10.0, 0.0));
    }

    #[test]
    fn test_manual_coincident_arm_is_rejected() {
        let style = MeasureStyle::default();
        let mut tool = AngleTool::new();
        tool.on_click(&ctx(Point2::new(0.0, 0.0), &[], &style));
        let step = tool.on_click(&ctx(Point2::new(0.0, 0.0005), &[], &style));
        assert_eq!(step, ToolStep::Rejected(ToolError::DegenerateSegment));
        assert_eq!(tool.collected_points().len(), 1);
    }

    #[test]
    fn test_preview_with_two_points_uses_signed_angle() {
        let style = MeasureStyle::default();
        let mut tool = AngleTool::new();
        tool.on_click(&ctx(Point2::new(0.0, 0.0), &[], &style));
        tool.on_click(&ctx(Point2::new(10.0, 0.0), &[], &style));
        let previews = tool.get_preview(&ctx(Point2::new(0.0, 10.0), &[], &style));
        let angle = previews
            .iter()
            .find_map(|p| match p {
                PreviewGeometry::Angle(s) => Some(s),
                _ => None,
            })
            .unwrap();
        assert!((angle.value - 90.0).abs() < 1e-9);
        assert_eq!(tool.collected_points().len(), 2);
    }
}
