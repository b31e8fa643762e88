//! 对象捕捉系统
//!
//! 参考 LibreCAD 的设计，实现 CAD 标准的对象捕捉功能。
//!
//! 支持的捕捉类型：
//! - 端点 (Endpoint)
//! - 中点 (Midpoint)
//! - 圆心 (Center)
//! - 交点 (Intersection)
//! - 垂足 (Perpendicular)
//! - 最近点 (Nearest)
//! - 象限点 (Quadrant)
//! - 节点 (Node)
//!
//! 捕捉容差以屏幕像素配置，按当前视图的"世界单位/像素"换算成世界距离，
//! 因此缩放视图时捕捉半径在屏幕上保持不变。
//!
//! 圆心捕捉具有"粘滞"特性：一旦找到，就记入粘滞集合，在本次测量会话中
//! 即使鼠标离开该圆弧也能继续捕捉到它的圆心（半径/直径工具依赖这一点）。

use crate::entity::{Entity, EntityId};
use crate::geometry::{Arc, Circle, Geometry, Line, Polyline, PolylineSegment, QUADRANT_ANGLES};
use crate::math::{Point2, Vector2, EPSILON};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 标记与粘滞点重合的判定距离（世界单位）
const MARKER_COINCIDENCE: f64 = 0.001;

/// 捕捉类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnapType {
    /// 端点捕捉
    Endpoint,
    /// 中点捕捉
    Midpoint,
    /// 圆心捕捉
    Center,
    /// 交点捕捉
    Intersection,
    /// 垂足捕捉
    Perpendicular,
    /// 最近点捕捉
    Nearest,
    /// 象限点（圆/弧的0°, 90°, 180°, 270°位置）
    Quadrant,
    /// 节点（点实体）
    Node,
}

impl SnapType {
    /// 获取捕捉类型的名称
    pub fn name(&self) -> &'static str {
        match self {
            SnapType::Endpoint => "端点",
            SnapType::Midpoint => "中点",
            SnapType::Center => "圆心",
            SnapType::Intersection => "交点",
            SnapType::Perpendicular => "垂足",
            SnapType::Nearest => "最近点",
            SnapType::Quadrant => "象限点",
            SnapType::Node => "节点",
        }
    }

    /// 获取捕捉类型的快捷键
    pub fn shortcut(&self) -> &'static str {
        match self {
            SnapType::Endpoint => "END",
            SnapType::Midpoint => "MID",
            SnapType::Center => "CEN",
            SnapType::Intersection => "INT",
            SnapType::Perpendicular => "PER",
            SnapType::Nearest => "NEA",
            SnapType::Quadrant => "QUA",
            SnapType::Node => "NOD",
        }
    }

    /// 屏幕标记形状
    pub fn marker_shape(&self) -> MarkerShape {
        match self {
            SnapType::Endpoint => MarkerShape::Square,
            SnapType::Midpoint => MarkerShape::Triangle,
            SnapType::Center => MarkerShape::Circle,
            SnapType::Quadrant => MarkerShape::Diamond,
            _ => MarkerShape::Square,
        }
    }

    fn mask_bit(&self) -> u16 {
        match self {
            SnapType::Endpoint => SnapMask::ENDPOINT,
            SnapType::Midpoint => SnapMask::MIDPOINT,
            SnapType::Center => SnapMask::CENTER,
            SnapType::Intersection => SnapMask::INTERSECTION,
            SnapType::Perpendicular => SnapMask::PERPENDICULAR,
            SnapType::Nearest => SnapMask::NEAREST,
            SnapType::Quadrant => SnapMask::QUADRANT,
            SnapType::Node => SnapMask::NODE,
        }
    }
}

/// 捕捉点
#[derive(Debug, Clone, PartialEq)]
pub struct SnapPoint {
    /// 捕捉到的世界坐标
    pub point: Point2,
    /// 捕捉类型
    pub snap_type: SnapType,
    /// 关联的实体ID（交点涉及两个实体时为 None）
    pub entity_id: Option<EntityId>,
    /// 距离鼠标的世界距离（用于排序）
    pub distance: f64,
}

impl SnapPoint {
    pub fn new(point: Point2, snap_type: SnapType, entity_id: Option<EntityId>, distance: f64) -> Self {
        Self {
            point,
            snap_type,
            entity_id,
            distance,
        }
    }
}

/// 捕捉配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// 捕捉容差（屏幕像素）
    pub tolerance: f64,
    /// 启用的捕捉类型
    pub enabled_types: SnapMask,
    /// 每次最多检查的拾取实体数（按拾取顺序）
    pub max_candidates: usize,
    /// 是否显示捕捉标记
    pub show_markers: bool,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            tolerance: 15.0, // 15像素
            enabled_types: SnapMask::default(),
            max_candidates: 5,
            show_markers: true,
        }
    }
}

/// 捕捉掩码（位域，用于快速启用/禁用捕捉类型）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapMask {
    bits: u16,
}

impl SnapMask {
    pub const ENDPOINT: u16 = 1 << 0;
    pub const MIDPOINT: u16 = 1 << 1;
    pub const CENTER: u16 = 1 << 2;
    pub const INTERSECTION: u16 = 1 << 3;
    pub const PERPENDICULAR: u16 = 1 << 4;
    pub const NEAREST: u16 = 1 << 5;
    pub const QUADRANT: u16 = 1 << 6;
    pub const NODE: u16 = 1 << 7;

    pub fn new(bits: u16) -> Self {
        Self { bits }
    }

    pub fn is_enabled(&self, snap_type: SnapType) -> bool {
        self.bits & snap_type.mask_bit() != 0
    }

    pub fn set(&mut self, snap_type: SnapType, enabled: bool) {
        let bit = snap_type.mask_bit();
        if enabled {
            self.bits |= bit;
        } else {
            self.bits &= !bit;
        }
    }

    pub fn toggle(&mut self, snap_type: SnapType) {
        let enabled = self.is_enabled(snap_type);
        self.set(snap_type, !enabled);
    }
}

impl Default for SnapMask {
    fn default() -> Self {
        // 默认启用常用的捕捉类型
        Self {
            bits: Self::ENDPOINT
                | Self::MIDPOINT
                | Self::CENTER
                | Self::INTERSECTION
                | Self::QUADRANT
                | Self::NODE,
        }
    }
}

/// 捕捉标记形状
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerShape {
    /// 方形（端点及其他）
    Square,
    /// 三角形（中点）
    Triangle,
    /// 圆形（圆心）
    Circle,
    /// 菱形（象限点）
    Diamond,
}

/// 待绘制的捕捉标记
#[derive(Debug, Clone, PartialEq)]
pub struct SnapMarker {
    pub point: Point2,
    pub shape: MarkerShape,
    /// 是否来自粘滞集合
    pub sticky: bool,
}

/// 实体高亮状态，由渲染端解析为颜色/样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HighlightState {
    Normal,
    Hovered,
    Selected,
}

/// 一次捕捉查询
pub struct SnapQuery<'a> {
    /// 鼠标的世界坐标
    pub pointer: Point2,
    /// 拾取射线命中的实体，按拾取顺序排列
    pub hits: &'a [&'a Entity],
    /// 当前视图每像素对应的世界单位
    pub world_units_per_pixel: f64,
    /// 参考点（用于垂足计算）
    pub reference_point: Option<Point2>,
}

/// 捕捉引擎
///
/// 负责计算和管理对象捕捉
#[derive(Debug, Clone)]
pub struct SnapEngine {
    config: SnapConfig,
    /// 缓存的候选捕捉点
    candidates: Vec<SnapPoint>,
    /// 粘滞的圆心捕捉，按实体去重
    sticky: Vec<SnapPoint>,
    /// 当前的最佳捕捉点
    active: Option<SnapPoint>,
    /// 本帧需要绘制的标记
    markers: Vec<SnapMarker>,
}

impl SnapEngine {
    pub fn new(config: SnapConfig) -> Self {
        Self {
            config,
            candidates: Vec::with_capacity(64),
            sticky: Vec::new(),
            active: None,
            markers: Vec::new(),
        }
    }

    pub fn active(&self) -> Option<&SnapPoint> {
        self.active.as_ref()
    }

    pub fn sticky(&self) -> &[SnapPoint] {
        &self.sticky
    }

    pub fn markers(&self) -> &[SnapMarker] {
        &self.markers
    }

    /// 清空粘滞集合与当前捕捉
    pub fn clear_sticky(&mut self) {
        self.sticky.clear();
        self.active = None;
        self.markers.clear();
    }

    /// 实体的高亮状态
    pub fn highlight(&self, id: EntityId) -> HighlightState {
        if self.sticky.iter().any(|s| s.entity_id == Some(id)) {
            HighlightState::Selected
        } else if self.active.as_ref().and_then(|s| s.entity_id) == Some(id) {
            HighlightState::Hovered
        } else {
            HighlightState::Normal
        }
    }

    /// 世界坐标容差
    pub fn world_tolerance(&self, world_units_per_pixel: f64) -> f64 {
        if world_units_per_pixel.is_finite() && world_units_per_pixel > 0.0 {
            self.config.tolerance * world_units_per_pixel
        } else {
            self.config.tolerance
        }
    }

    /// 寻找最佳捕捉点
    ///
    /// 只检查拾取顺序中的前 `max_candidates` 个实体。候选点取距离最小者，
    /// 距离相同时先出现的实体优先。
    pub fn find_snap(&mut self, query: &SnapQuery) -> Option<SnapPoint> {
        self.candidates.clear();

        let tolerance = self.world_tolerance(query.world_units_per_pixel);
        let mouse = query.pointer;

        let checked: Vec<(EntityId, Geometry)> = query
            .hits
            .iter()
            .take(self.config.max_candidates)
            .map(|e| (e.id, e.world_geometry()))
            .collect();

        // 1. 收集所有实体的捕捉点
        for (id, geometry) in &checked {
            self.collect_entity_snap_points(geometry, *id, mouse, query.reference_point);
        }

        // 2. 交点捕捉（需要成对的实体）
        if self.config.enabled_types.is_enabled(SnapType::Intersection) {
            self.collect_intersection_points(&checked, mouse);
        }

        // 3. 找到最近的捕捉点
        let mut best: Option<&SnapPoint> = None;
        for candidate in self.candidates.iter().filter(|p| p.distance <= tolerance) {
            if best.map_or(true, |b| candidate.distance < b.distance) {
                best = Some(candidate);
            }
        }
        let mut snap = best.cloned();

        // 4. 悬停在曲线上但没有候选点时，回退到该曲线的圆心
        if snap.is_none() && self.config.enabled_types.is_enabled(SnapType::Center) {
            snap = checked
                .iter()
                .find_map(|(id, geometry)| Self::fallback_center(geometry, *id, mouse));
        }

        // 5. 没有新的捕捉点，使用容差内最近的粘滞圆心
        if snap.is_none() {
            snap = self.closest_sticky(mouse, tolerance);
        }
        if let Some(found) = snap.clone() {
            if found.snap_type == SnapType::Center {
                self.remember_sticky(&found);
            }
        }

        if let Some(found) = &snap {
            debug!(
                "snap {} at ({:.3}, {:.3})",
                found.snap_type.shortcut(),
                found.point.x,
                found.point.y
            );
        }

        self.active = snap.clone();
        self.rebuild_markers();
        snap
    }

    fn closest_sticky(&self, mouse: Point2, tolerance: f64) -> Option<SnapPoint> {
        let mut best: Option<SnapPoint> = None;
        for s in &self.sticky {
            let distance = (s.point - mouse).norm();
            if distance <= tolerance && best.as_ref().map_or(true, |b| distance < b.distance) {
                best = Some(SnapPoint::new(s.point, s.snap_type, s.entity_id, distance));
            }
        }
        best
    }

    fn remember_sticky(&mut self, snap: &SnapPoint) {
        let Some(id) = snap.entity_id else {
            return;
        };
        if !self.sticky.iter().any(|s| s.entity_id == Some(id)) {
            self.sticky.push(snap.clone());
        }
    }

    fn rebuild_markers(&mut self) {
        self.markers.clear();
        if !self.config.show_markers {
            return;
        }
        for s in &self.sticky {
            self.markers.push(SnapMarker {
                point: s.point,
                shape: s.snap_type.marker_shape(),
                sticky: true,
            });
        }
        if let Some(active) = &self.active {
            let coincides = self
                .sticky
                .iter()
                .any(|s| (s.point - active.point).norm() < MARKER_COINCIDENCE);
            if !coincides {
                self.markers.push(SnapMarker {
                    point: active.point,
                    shape: active.snap_type.marker_shape(),
                    sticky: false,
                });
            }
        }
    }

    /// 悬停曲线的圆心（圆、圆弧、带凸度的多段线）
    fn fallback_center(geometry: &Geometry, id: EntityId, mouse: Point2) -> Option<SnapPoint> {
        let center = match geometry {
            Geometry::Circle(c) => c.center,
            Geometry::Arc(a) => a.center,
            Geometry::Polyline(pl) => pl.closest_bulge_segment(&mouse)?.center,
            _ => return None,
        };
        Some(SnapPoint::new(
            center,
            SnapType::Center,
            Some(id),
            (center - mouse).norm(),
        ))
    }

    fn push(&mut self, point: Point2, snap_type: SnapType, entity_id: EntityId, mouse: Point2) {
        if self.config.enabled_types.is_enabled(snap_type) {
            self.candidates.push(SnapPoint::new(
                point,
                snap_type,
                Some(entity_id),
                (point - mouse).norm(),
            ));
        }
    }

    /// 收集单个实体的捕捉点
    fn collect_entity_snap_points(
        &mut self,
        geometry: &Geometry,
        entity_id: EntityId,
        mouse: Point2,
        reference_point: Option<Point2>,
    ) {
        match geometry {
            Geometry::Point(p) => {
                self.push(p.position, SnapType::Node, entity_id, mouse);
            }
            Geometry::Line(line) => {
                self.collect_line_snap_points(line, entity_id, mouse, reference_point);
            }
            Geometry::Circle(circle) => {
                self.collect_circle_snap_points(circle, entity_id, mouse);
            }
            Geometry::Arc(arc) => {
                self.collect_arc_snap_points(arc, entity_id, mouse);
            }
            Geometry::Polyline(polyline) => {
                self.collect_polyline_snap_points(polyline, entity_id, mouse, reference_point);
            }
        }
    }

    /// 线段的捕捉点
    fn collect_line_snap_points(
        &mut self,
        line: &Line,
        entity_id: EntityId,
        mouse: Point2,
        reference_point: Option<Point2>,
    ) {
        // 端点
        self.push(line.start, SnapType::Endpoint, entity_id, mouse);
        self.push(line.end, SnapType::Endpoint, entity_id, mouse);

        // 中点
        self.push(line.midpoint(), SnapType::Midpoint, entity_id, mouse);

        // 垂足
        if let Some(ref_point) = reference_point {
            if let Some(perp) = perpendicular_to_line(line, ref_point) {
                self.push(perp, SnapType::Perpendicular, entity_id, mouse);
            }
        }

        // 最近点
        self.push(line.closest_point(&mouse), SnapType::Nearest, entity_id, mouse);
    }

    /// 圆的捕捉点
    fn collect_circle_snap_points(&mut self, circle: &Circle, entity_id: EntityId, mouse: Point2) {
        // 圆心
        self.push(circle.center, SnapType::Center, entity_id, mouse);

        // 象限点
        for angle in QUADRANT_ANGLES {
            self.push(circle.point_at_angle(angle), SnapType::Quadrant, entity_id, mouse);
        }

        // 最近点（圆上）
        if let Some(dir) = (mouse - circle.center).try_normalize(EPSILON) {
            self.push(circle.center + dir * circle.radius, SnapType::Nearest, entity_id, mouse);
        }
    }

    /// 圆弧的捕捉点
    fn collect_arc_snap_points(&mut self, arc: &Arc, entity_id: EntityId, mouse: Point2) {
        // 端点
        self.push(arc.start_point(), SnapType::Endpoint, entity_id, mouse);
        self.push(arc.end_point(), SnapType::Endpoint, entity_id, mouse);

        // 圆心
        self.push(arc.center, SnapType::Center, entity_id, mouse);

        // 落在弧范围内的象限点
        for angle in QUADRANT_ANGLES {
            if arc.contains_angle(angle) {
                self.push(arc.point_at_angle(angle), SnapType::Quadrant, entity_id, mouse);
            }
        }

        self.push(arc.closest_point(&mouse), SnapType::Nearest, entity_id, mouse);
    }

    /// 多段线的捕捉点
    fn collect_polyline_snap_points(
        &mut self,
        polyline: &Polyline,
        entity_id: EntityId,
        mouse: Point2,
        reference_point: Option<Point2>,
    ) {
        // 顶点（端点）
        for vertex in &polyline.vertices {
            self.push(vertex.point, SnapType::Endpoint, entity_id, mouse);
        }

        for segment in polyline.segments() {
            match segment {
                PolylineSegment::Straight(line) => {
                    // 直线段：弦中点
                    self.push(line.midpoint(), SnapType::Midpoint, entity_id, mouse);

                    if let Some(ref_point) = reference_point {
                        if let Some(perp) = perpendicular_to_line(&line, ref_point) {
                            self.push(perp, SnapType::Perpendicular, entity_id, mouse);
                        }
                    }
                    self.push(line.closest_point(&mouse), SnapType::Nearest, entity_id, mouse);
                }
                PolylineSegment::Bulge(arc) => {
                    // 弧线段：圆心、弧中点（不是弦中点）和范围内的象限点
                    self.push(arc.center, SnapType::Center, entity_id, mouse);
                    self.push(arc.midpoint(), SnapType::Midpoint, entity_id, mouse);
                    for angle in QUADRANT_ANGLES {
                        if arc.contains_angle(angle) {
                            self.push(arc.point_at_angle(angle), SnapType::Quadrant, entity_id, mouse);
                        }
                    }
                    self.push(arc.to_arc().closest_point(&mouse), SnapType::Nearest, entity_id, mouse);
                }
            }
        }
    }

    /// 收集交点
    fn collect_intersection_points(&mut self, entities: &[(EntityId, Geometry)], mouse: Point2) {
        let primitives: Vec<Vec<Primitive>> = entities.iter().map(|(_, g)| primitives_of(g)).collect();

        // 双重循环检查所有实体对
        for i in 0..primitives.len() {
            for j in (i + 1)..primitives.len() {
                for a in &primitives[i] {
                    for b in &primitives[j] {
                        for point in find_intersections(a, b) {
                            let dist = (point - mouse).norm();
                            self.candidates.push(SnapPoint::new(
                                point,
                                SnapType::Intersection,
                                None, // 交点涉及两个实体
                                dist,
                            ));
                        }
                    }
                }
            }
        }
    }
}

impl Default for SnapEngine {
    fn default() -> Self {
        Self::new(SnapConfig::default())
    }
}

// ========== 几何计算辅助函数 ==========

/// 求交用的基本曲线
#[derive(Debug, Clone)]
enum Primitive {
    Line(Line),
    Circle(Circle),
    Arc(Arc),
}

fn primitives_of(geometry: &Geometry) -> Vec<Primitive> {
    match geometry {
        Geometry::Point(_) => vec![],
        Geometry::Line(l) => vec![Primitive::Line(l.clone())],
        Geometry::Circle(c) => vec![Primitive::Circle(c.clone())],
        Geometry::Arc(a) => vec![Primitive::Arc(a.clone())],
        Geometry::Polyline(pl) => pl
            .segments()
            .map(|s| match s {
                PolylineSegment::Straight(l) => Primitive::Line(l),
                PolylineSegment::Bulge(a) => Primitive::Arc(a.to_arc()),
            })
            .collect(),
    }
}

/// 计算两个基本曲线的交点
fn find_intersections(a: &Primitive, b: &Primitive) -> Vec<Point2> {
    match (a, b) {
        (Primitive::Line(l1), Primitive::Line(l2)) => {
            line_line_intersection(l1, l2).into_iter().collect()
        }
        (Primitive::Line(line), Primitive::Circle(circle))
        | (Primitive::Circle(circle), Primitive::Line(line)) => {
            line_circle_intersection(line, circle)
        }
        (Primitive::Circle(c1), Primitive::Circle(c2)) => circle_circle_intersection(c1, c2),
        (Primitive::Line(line), Primitive::Arc(arc))
        | (Primitive::Arc(arc), Primitive::Line(line)) => {
            // 先求线段-完整圆的交点，再过滤在弧范围内的
            line_circle_intersection(line, &Circle::new(arc.center, arc.radius))
                .into_iter()
                .filter(|p| arc_contains_point(arc, p))
                .collect()
        }
        (Primitive::Circle(circle), Primitive::Arc(arc))
        | (Primitive::Arc(arc), Primitive::Circle(circle)) => {
            circle_circle_intersection(circle, &Circle::new(arc.center, arc.radius))
                .into_iter()
                .filter(|p| arc_contains_point(arc, p))
                .collect()
        }
        (Primitive::Arc(a1), Primitive::Arc(a2)) => circle_circle_intersection(
            &Circle::new(a1.center, a1.radius),
            &Circle::new(a2.center, a2.radius),
        )
        .into_iter()
        .filter(|p| arc_contains_point(a1, p) && arc_contains_point(a2, p))
        .collect(),
    }
}

fn arc_contains_point(arc: &Arc, point: &Point2) -> bool {
    arc.contains_angle((point.y - arc.center.y).atan2(point.x - arc.center.x))
}

/// 计算从参考点到线段的垂足（垂足必须在线段上）
fn perpendicular_to_line(line: &Line, ref_point: Point2) -> Option<Point2> {
    let v = line.end - line.start;
    let w = ref_point - line.start;

    let c2 = v.dot(&v);
    if c2 < EPSILON {
        return None;
    }

    let b = w.dot(&v) / c2;
    if (0.0..=1.0).contains(&b) {
        Some(line.start + v * b)
    } else {
        None
    }
}

/// 线段-线段交点
fn line_line_intersection(l1: &Line, l2: &Line) -> Option<Point2> {
    let d1 = l1.end - l1.start;
    let d2 = l2.end - l2.start;

    let cross = d1.x * d2.y - d1.y * d2.x;

    // 平行
    if cross.abs() < EPSILON {
        return None;
    }

    let d = l2.start - l1.start;
    let t1 = (d.x * d2.y - d.y * d2.x) / cross;
    let t2 = (d.x * d1.y - d.y * d1.x) / cross;

    // 检查交点是否在两条线段上
    if (0.0..=1.0).contains(&t1) && (0.0..=1.0).contains(&t2) {
        Some(l1.start + d1 * t1)
    } else {
        None
    }
}

/// 线段-圆交点
fn line_circle_intersection(line: &Line, circle: &Circle) -> Vec<Point2> {
    let d = line.end - line.start;
    let f = line.start - circle.center;

    let a = d.dot(&d);
    if a < EPSILON {
        return vec![];
    }
    let b = 2.0 * f.dot(&d);
    let c = f.dot(&f) - circle.radius * circle.radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return vec![];
    }

    let mut intersections = Vec::new();
    if discriminant.abs() < EPSILON {
        // 一个交点（相切）
        let t = -b / (2.0 * a);
        if (0.0..=1.0).contains(&t) {
            intersections.push(line.start + d * t);
        }
    } else {
        let sqrt_disc = discriminant.sqrt();
        for t in [(-b - sqrt_disc) / (2.0 * a), (-b + sqrt_disc) / (2.0 * a)] {
            if (0.0..=1.0).contains(&t) {
                intersections.push(line.start + d * t);
            }
        }
    }
    intersections
}

/// 圆-圆交点
fn circle_circle_intersection(c1: &Circle, c2: &Circle) -> Vec<Point2> {
    let d = (c2.center - c1.center).norm();

    // 不相交情况
    if d > c1.radius + c2.radius || d < (c1.radius - c2.radius).abs() || d < EPSILON {
        return vec![];
    }

    let a = (c1.radius * c1.radius - c2.radius * c2.radius + d * d) / (2.0 * d);
    let h = (c1.radius * c1.radius - a * a).max(0.0).sqrt();

    let p = c1.center + (c2.center - c1.center) * (a / d);
    let dir = (c2.center - c1.center) / d;
    let perp = Vector2::new(-dir.y, dir.x);

    if h < EPSILON {
        // 一个交点（相切）
        vec![p]
    } else {
        vec![p + perp * h, p - perp * h]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, PolylineVertex};
    use crate::transform::Transform2D;

    fn line_entity(id: u64, x1: f64, y1: f64, x2: f64, y2: f64) -> Entity {
        Entity::new(
            EntityId(id),
            Geometry::Line(Line::new(Point2::new(x1, y1), Point2::new(x2, y2))),
        )
    }

    fn circle_entity(id: u64, x: f64, y: f64, r: f64) -> Entity {
        Entity::new(EntityId(id), Geometry::Circle(Circle::new(Point2::new(x, y), r)))
    }

    fn query<'a>(pointer: Point2, hits: &'a [&'a Entity]) -> SnapQuery<'a> {
        SnapQuery {
            pointer,
            hits,
            world_units_per_pixel: 1.0,
            reference_point: None,
        }
    }

    #[test]
    fn test_snap_mask() {
        let mut mask = SnapMask::default();
        assert!(mask.is_enabled(SnapType::Endpoint));
        assert!(mask.is_enabled(SnapType::Quadrant));
        assert!(!mask.is_enabled(SnapType::Nearest));

        mask.set(SnapType::Nearest, true);
        assert!(mask.is_enabled(SnapType::Nearest));

        mask.toggle(SnapType::Endpoint);
        assert!(!mask.is_enabled(SnapType::Endpoint));
    }

    #[test]
    fn test_midpoint_beats_farther_endpoints() {
        let mut engine = SnapEngine::default();
        let line = line_entity(1, 0.0, 0.0, 10.0, 0.0);
        let hits = [&line];

        let snap = engine.find_snap(&query(Point2::new(5.2, 0.4), &hits)).unwrap();
        assert_eq!(snap.snap_type, SnapType::Midpoint);
        assert_eq!(snap.point, Point2::new(5.0, 0.0));
        assert_eq!(snap.entity_id, Some(EntityId(1)));
    }

    #[test]
    fn test_tolerance_scales_with_zoom() {
        let mut engine = SnapEngine::default();
        let line = line_entity(1, 0.0, 0.0, 10.0, 0.0);
        let hits = [&line];

        // 15px * 0.01 = 0.15 世界单位，离中点 0.4 超出容差；直线没有曲线回退
        let mut q = query(Point2::new(5.0, 0.4), &hits);
        q.world_units_per_pixel = 0.01;
        assert!(engine.find_snap(&q).is_none());

        q.world_units_per_pixel = 0.1;
        assert!(engine.find_snap(&q).is_some());
    }

    #[test]
    fn test_tie_goes_to_first_in_pick_order() {
        let mut engine = SnapEngine::default();
        // 两条线共享端点 (10, 0)
        let a = line_entity(1, 0.0, 0.0, 10.0, 0.0);
        let b = line_entity(2, 10.0, 0.0, 10.0, 10.0);
        let hits = [&b, &a];

        let snap = engine.find_snap(&query(Point2::new(10.5, 0.2), &hits)).unwrap();
        assert_eq!(snap.entity_id, Some(EntityId(2)));
    }

    #[test]
    fn test_max_candidates_limits_checked_entities() {
        let mut engine = SnapEngine::new(SnapConfig {
            max_candidates: 1,
            ..SnapConfig::default()
        });
        let far = line_entity(1, 100.0, 100.0, 200.0, 100.0);
        let near = line_entity(2, 0.0, 0.0, 10.0, 0.0);
        let hits = [&far, &near];

        assert!(engine.find_snap(&query(Point2::new(0.1, 0.0), &hits)).is_none());
    }

    #[test]
    fn test_circle_quadrant_and_center() {
        let mut engine = SnapEngine::default();
        let circle = circle_entity(3, 0.0, 0.0, 10.0);
        let hits = [&circle];

        let snap = engine.find_snap(&query(Point2::new(0.5, 9.8), &hits)).unwrap();
        assert_eq!(snap.snap_type, SnapType::Quadrant);
        assert!((snap.point - Point2::new(0.0, 10.0)).norm() < 1e-9);

        let snap = engine.find_snap(&query(Point2::new(0.3, -0.2), &hits)).unwrap();
        assert_eq!(snap.snap_type, SnapType::Center);
    }

    #[test]
    fn test_arc_quadrants_respect_span() {
        let mut engine = SnapEngine::default();
        // 0° 到 90° 的四分之一圆弧，180° 象限点不在范围内
        let arc = Entity::new(
            EntityId(4),
            Geometry::Arc(Arc::new(Point2::origin(), 10.0, 0.0, std::f64::consts::FRAC_PI_2)),
        );
        let hits = [&arc];

        // 容差 3 个世界单位：附近没有 180° 象限点，也离圆心太远，回退为圆心
        let mut q = query(Point2::new(-9.8, 0.3), &hits);
        q.world_units_per_pixel = 0.2;
        let snap = engine.find_snap(&q).unwrap();
        assert_eq!(snap.snap_type, SnapType::Center);
        assert_eq!(snap.point, Point2::origin());
    }

    #[test]
    fn test_fallback_center_when_far_from_candidates() {
        let mut engine = SnapEngine::default();
        let circle = circle_entity(5, 0.0, 0.0, 100.0);
        let hits = [&circle];

        // 在圆周上 45° 处，离任何象限点和圆心都很远
        let on_rim = Point2::new(70.71, 70.71);
        let snap = engine.find_snap(&query(on_rim, &hits)).unwrap();
        assert_eq!(snap.snap_type, SnapType::Center);
        assert_eq!(snap.point, Point2::origin());
        assert_eq!(engine.sticky().len(), 1);
    }

    #[test]
    fn test_sticky_center_persists_until_cleared() {
        let mut engine = SnapEngine::default();
        let circle = circle_entity(6, 50.0, 50.0, 20.0);
        let hits = [&circle];

        engine.find_snap(&query(Point2::new(64.0, 64.0), &hits)).unwrap();
        assert_eq!(engine.highlight(EntityId(6)), HighlightState::Selected);

        // 鼠标离开圆，不再命中任何实体，但仍在圆心附近
        let no_hits: [&Entity; 0] = [];
        let snap = engine.find_snap(&query(Point2::new(55.0, 52.0), &no_hits)).unwrap();
        assert_eq!(snap.snap_type, SnapType::Center);
        assert_eq!(snap.point, Point2::new(50.0, 50.0));
        assert_eq!(snap.entity_id, Some(EntityId(6)));

        // 远离圆心超出容差
        assert!(engine.find_snap(&query(Point2::new(500.0, 500.0), &no_hits)).is_none());
        // 粘滞标记仍然绘制
        assert_eq!(engine.markers().len(), 1);
        assert!(engine.markers()[0].sticky);

        engine.clear_sticky();
        assert!(engine.find_snap(&query(Point2::new(55.0, 52.0), &no_hits)).is_none());
        assert!(engine.markers().is_empty());
        assert_eq!(engine.highlight(EntityId(6)), HighlightState::Normal);
    }

    #[test]
    fn test_sticky_is_deduplicated_by_entity() {
        let mut engine = SnapEngine::default();
        let circle = circle_entity(7, 0.0, 0.0, 10.0);
        let hits = [&circle];

        engine.find_snap(&query(Point2::new(0.2, 0.1), &hits));
        engine.find_snap(&query(Point2::new(-0.2, 0.3), &hits));
        assert_eq!(engine.sticky().len(), 1);
    }

    #[test]
    fn test_active_marker_skipped_when_on_sticky() {
        let mut engine = SnapEngine::default();
        let circle = circle_entity(8, 0.0, 0.0, 10.0);
        let hits = [&circle];

        engine.find_snap(&query(Point2::new(0.1, 0.1), &hits));
        let markers = engine.markers();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].shape, MarkerShape::Circle);

        // 移到象限点，额外绘制一个菱形标记
        engine.find_snap(&query(Point2::new(9.9, 0.1), &hits));
        let shapes: Vec<MarkerShape> = engine.markers().iter().map(|m| m.shape).collect();
        assert_eq!(shapes, vec![MarkerShape::Circle, MarkerShape::Diamond]);
        assert_eq!(engine.highlight(EntityId(8)), HighlightState::Selected);
    }

    #[test]
    fn test_polyline_bulge_segment_snaps() {
        let mut engine = SnapEngine::default();
        // (0,0) -> (10,10) 半圆段（bulge=1），然后直线到 (10,20)
        let pl = Entity::new(
            EntityId(9),
            Geometry::Polyline(Polyline::new(
                vec![
                    PolylineVertex::with_bulge(Point2::new(0.0, 0.0), 1.0),
                    PolylineVertex::new(Point2::new(10.0, 10.0)),
                    PolylineVertex::new(Point2::new(10.0, 20.0)),
                ],
                false,
            )),
        );
        let hits = [&pl];

        // 弧中点在 (10, 0)，不是弦中点 (5, 5)
        let snap = engine.find_snap(&query(Point2::new(10.1, 0.2), &hits)).unwrap();
        assert_eq!(snap.snap_type, SnapType::Midpoint);
        assert!((snap.point - Point2::new(10.0, 0.0)).norm() < 1e-9);

        let snap = engine.find_snap(&query(Point2::new(5.0, 5.3), &hits)).unwrap();
        assert_eq!(snap.snap_type, SnapType::Center);
        assert!((snap.point - Point2::new(5.0, 5.0)).norm() < 1e-9);

        // 直线段的弦中点
        let snap = engine.find_snap(&query(Point2::new(10.2, 15.1), &hits)).unwrap();
        assert_eq!(snap.snap_type, SnapType::Midpoint);
        assert_eq!(snap.point, Point2::new(10.0, 15.0));
    }

    #[test]
    fn test_intersection_between_hovered_lines() {
        let mut engine = SnapEngine::default();
        let a = line_entity(1, 0.0, 0.0, 60.0, 60.0);
        let b = line_entity(2, 0.0, 40.0, 60.0, -20.0);
        let hits = [&a, &b];

        let snap = engine.find_snap(&query(Point2::new(20.5, 19.4), &hits)).unwrap();
        assert_eq!(snap.snap_type, SnapType::Intersection);
        assert!((snap.point - Point2::new(20.0, 20.0)).norm() < 1e-9);
        assert_eq!(snap.entity_id, None);
    }

    #[test]
    fn test_perpendicular_uses_reference_point() {
        let mut config = SnapConfig::default();
        config.enabled_types = SnapMask::new(SnapMask::PERPENDICULAR);
        let mut engine = SnapEngine::new(config);
        let line = line_entity(1, 0.0, 0.0, 100.0, 0.0);
        let hits = [&line];

        let mut q = query(Point2::new(31.0, 1.0), &hits);
        q.reference_point = Some(Point2::new(30.0, 50.0));
        let snap = engine.find_snap(&q).unwrap();
        assert_eq!(snap.snap_type, SnapType::Perpendicular);
        assert_eq!(snap.point, Point2::new(30.0, 0.0));
    }

    #[test]
    fn test_node_and_transformed_entity() {
        let mut engine = SnapEngine::default();
        let node = Entity::new(EntityId(1), Geometry::Point(Point::new(1.0, 1.0)))
            .with_transform(Transform2D::new(Vector2::new(10.0, 0.0), 0.0, 1.0));
        let hits = [&node];

        let snap = engine.find_snap(&query(Point2::new(11.2, 1.0), &hits)).unwrap();
        assert_eq!(snap.snap_type, SnapType::Node);
        assert_eq!(snap.point, Point2::new(11.0, 1.0));
    }

    #[test]
    fn test_line_intersection_helper() {
        let l1 = Line::new(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0));
        let l2 = Line::new(Point2::new(0.0, 10.0), Point2::new(10.0, 0.0));

        let p = line_line_intersection(&l1, &l2).unwrap();
        assert!((p.x - 5.0).abs() < EPSILON);
        assert!((p.y - 5.0).abs() < EPSILON);
    }
}
