//! 几何图元定义
//!
//! 支持的基本图元：
//! - 点 (Point)
//! - 线段 (Line)
//! - 圆 (Circle)
//! - 圆弧 (Arc)
//! - 多段线 (Polyline)，顶点可携带凸度（bulge）形成弧线段
//!
//! 图元由外部加载器（DXF）生成，测量核心只读取它们。

use crate::error::GeometryError;
use crate::math::{normalize_angle, perpendicular, BoundingBox2, Point2, Vector2, EPSILON};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// 象限角：0°, 90°, 180°, 270°
pub const QUADRANT_ANGLES: [f64; 4] = [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2];

/// 几何类型枚举
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Point(Point),
    Line(Line),
    Circle(Circle),
    Arc(Arc),
    Polyline(Polyline),
}

impl Geometry {
    /// 获取几何的包围盒
    pub fn bounding_box(&self) -> BoundingBox2 {
        match self {
            Geometry::Point(p) => p.bounding_box(),
            Geometry::Line(l) => l.bounding_box(),
            Geometry::Circle(c) => c.bounding_box(),
            Geometry::Arc(a) => a.bounding_box(),
            Geometry::Polyline(pl) => pl.bounding_box(),
        }
    }

    /// 点到几何的距离
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        match self {
            Geometry::Point(p) => (p.position - point).norm(),
            Geometry::Line(l) => l.distance_to_point(point),
            Geometry::Circle(c) => c.distance_to_point(point).abs(),
            Geometry::Arc(a) => a.distance_to_point(point),
            Geometry::Polyline(pl) => pl.distance_to_point(point),
        }
    }

    /// 曲线长度（圆为周长，点为0）
    pub fn length(&self) -> f64 {
        match self {
            Geometry::Point(_) => 0.0,
            Geometry::Line(l) => l.length(),
            Geometry::Circle(c) => c.circumference(),
            Geometry::Arc(a) => a.length(),
            Geometry::Polyline(pl) => pl.length(),
        }
    }

    /// 开放曲线的首尾端点；闭合曲线和点返回 None
    pub fn open_endpoints(&self) -> Option<(Point2, Point2)> {
        match self {
            Geometry::Line(l) => Some((l.start, l.end)),
            Geometry::Arc(a) => Some((a.start_point(), a.end_point())),
            Geometry::Polyline(pl) if !pl.closed && pl.vertices.len() >= 2 => {
                let first = pl.vertices[0].point;
                let last = pl.vertices[pl.vertices.len() - 1].point;
                Some((first, last))
            }
            _ => None,
        }
    }

    /// 闭合图元围成的面积（开放图元返回 None）
    pub fn enclosed_area(&self) -> Option<f64> {
        match self {
            Geometry::Circle(c) => Some(c.area()),
            Geometry::Polyline(pl) if pl.closed => Some(pl.area()),
            _ => None,
        }
    }
}

/// 点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub position: Point2,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            position: Point2::new(x, y),
        }
    }

    pub fn from_point2(position: Point2) -> Self {
        Self { position }
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::new(self.position, self.position)
    }
}

/// 线段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point2,
    pub end: Point2,
}

impl Line {
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    /// 计算线段长度
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// 计算线段方向向量（单位向量）
    pub fn direction(&self) -> Vector2 {
        (self.end - self.start).normalize()
    }

    /// 计算线段中点
    pub fn midpoint(&self) -> Point2 {
        Point2::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }

    /// 线段上离给定点最近的点
    pub fn closest_point(&self, point: &Point2) -> Point2 {
        let v = self.end - self.start;
        let w = point - self.start;

        let c1 = w.dot(&v);
        if c1 <= 0.0 {
            return self.start;
        }

        let c2 = v.dot(&v);
        if c2 <= c1 {
            return self.end;
        }

        self.start + v * (c1 / c2)
    }

    /// 计算点到线段的距离
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        (point - self.closest_point(point)).norm()
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::from_points([self.start, self.end])
    }
}

/// 圆
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point2, radius: f64) -> Self {
        Self { center, radius }
    }

    /// 计算周长
    pub fn circumference(&self) -> f64 {
        TAU * self.radius
    }

    /// 计算面积
    pub fn area(&self) -> f64 {
        PI * self.radius * self.radius
    }

    /// 计算点到圆的距离（负值表示在圆内）
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        (point - self.center).norm() - self.radius
    }

    /// 获取圆上指定角度的点
    pub fn point_at_angle(&self, angle: f64) -> Point2 {
        Point2::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::new(
            Point2::new(self.center.x - self.radius, self.center.y - self.radius),
            Point2::new(self.center.x + self.radius, self.center.y + self.radius),
        )
    }
}

/// 圆弧（从起始角逆时针到终止角）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub center: Point2,
    pub radius: f64,
    /// 起始角度（弧度）
    pub start_angle: f64,
    /// 终止角度（弧度）
    pub end_angle: f64,
}

impl Arc {
    pub fn new(center: Point2, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            center,
            radius,
            start_angle,
            end_angle,
        }
    }

    /// 计算弧长
    pub fn length(&self) -> f64 {
        self.sweep_angle() * self.radius
    }

    /// 计算扫过的角度，范围 [0, 2π)
    pub fn sweep_angle(&self) -> f64 {
        normalize_angle(self.end_angle - self.start_angle)
    }

    pub fn point_at_angle(&self, angle: f64) -> Point2 {
        Point2::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }

    /// 获取起点
    pub fn start_point(&self) -> Point2 {
        self.point_at_angle(self.start_angle)
    }

    /// 获取终点
    pub fn end_point(&self) -> Point2 {
        self.point_at_angle(self.end_angle)
    }

    /// 弧的中点（沿弧长方向，不是弦中点）
    pub fn midpoint(&self) -> Point2 {
        self.point_at_angle(self.start_angle + self.sweep_angle() / 2.0)
    }

    /// 计算点到圆弧的距离
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        let angle = (point.y - self.center.y).atan2(point.x - self.center.x);

        // 检查角度是否在弧的范围内
        if self.contains_angle(angle) {
            ((point - self.center).norm() - self.radius).abs()
        } else {
            // 返回到端点的最小距离
            let d1 = (point - self.start_point()).norm();
            let d2 = (point - self.end_point()).norm();
            d1.min(d2)
        }
    }

    /// 弧上离给定点最近的点
    pub fn closest_point(&self, point: &Point2) -> Point2 {
        let angle = (point.y - self.center.y).atan2(point.x - self.center.x);
        if self.contains_angle(angle) {
            self.point_at_angle(angle)
        } else {
            let start = self.start_point();
            let end = self.end_point();
            if (point - start).norm() <= (point - end).norm() {
                start
            } else {
                end
            }
        }
    }

    /// 检查角度是否在弧的范围内（归一化后处理跨越 0° 的情况）
    pub fn contains_angle(&self, angle: f64) -> bool {
        let a = normalize_angle(angle);
        let start = normalize_angle(self.start_angle);
        let end = normalize_angle(self.end_angle);

        if start <= end {
            a >= start - EPSILON && a <= end + EPSILON
        } else {
            a >= start - EPSILON || a <= end + EPSILON
        }
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        let mut bbox = BoundingBox2::from_points([self.start_point(), self.end_point()]);

        // 检查象限点
        for angle in QUADRANT_ANGLES {
            if self.contains_angle(angle) {
                bbox.expand_to_include(&self.point_at_angle(angle));
            }
        }

        bbox
    }
}

/// 由两个顶点和凸度重建的圆弧
///
/// 包含角 `θ = 4·atan(bulge)`，`bulge > 0` 时从起点逆时针到终点。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulgeArc {
    pub start: Point2,
    pub end: Point2,
    pub center: Point2,
    pub radius: f64,
    /// 起点相对圆心的角度（弧度）
    pub start_angle: f64,
    /// 终点相对圆心的角度（弧度）
    pub end_angle: f64,
    /// 带符号的包含角
    pub included_angle: f64,
}

impl BulgeArc {
    pub fn from_bulge(start: Point2, end: Point2, bulge: f64) -> Result<Self, GeometryError> {
        if bulge.abs() < EPSILON || !bulge.is_finite() {
            return Err(GeometryError::DegenerateBulge(bulge));
        }
        let chord = end - start;
        let chord_len = chord.norm();
        if chord_len < EPSILON {
            return Err(GeometryError::ZeroLength);
        }

        let included_angle = 4.0 * bulge.atan();
        // 带符号半径，符号跟随包含角
        let signed_radius = chord_len / (2.0 * (included_angle / 2.0).sin());

        let mid = Point2::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);
        let f = (1.0 - bulge * bulge) / (4.0 * bulge);
        let center = mid + perpendicular(&chord) * f;

        Ok(Self {
            start,
            end,
            center,
            radius: signed_radius.abs(),
            start_angle: (start.y - center.y).atan2(start.x - center.x),
            end_angle: (end.y - center.y).atan2(end.x - center.x),
            included_angle,
        })
    }

    pub fn is_ccw(&self) -> bool {
        self.included_angle > 0.0
    }

    pub fn point_at_angle(&self, angle: f64) -> Point2 {
        Point2::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }

    /// 弧长中点
    pub fn midpoint(&self) -> Point2 {
        self.point_at_angle(self.start_angle + self.included_angle / 2.0)
    }

    pub fn length(&self) -> f64 {
        self.radius * self.included_angle.abs()
    }

    /// 转换为逆时针方向的标准圆弧
    pub fn to_arc(&self) -> Arc {
        if self.is_ccw() {
            Arc::new(self.center, self.radius, self.start_angle, self.end_angle)
        } else {
            Arc::new(self.center, self.radius, self.end_angle, self.start_angle)
        }
    }

    pub fn contains_angle(&self, angle: f64) -> bool {
        self.to_arc().contains_angle(angle)
    }

    /// 弓形（弦与弧之间）的带符号面积，逆时针为正
    pub fn signed_segment_area(&self) -> f64 {
        let theta = self.included_angle.abs();
        let area = self.radius * self.radius / 2.0 * (theta - theta.sin());
        area * self.included_angle.signum()
    }
}

/// 多段线顶点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolylineVertex {
    pub point: Point2,
    /// 凸度（bulge）- 用于弧线段，0表示直线
    #[serde(default)]
    pub bulge: f64,
}

impl PolylineVertex {
    pub fn new(point: Point2) -> Self {
        Self { point, bulge: 0.0 }
    }

    pub fn with_bulge(point: Point2, bulge: f64) -> Self {
        Self { point, bulge }
    }
}

/// 多段线中的单个线段
#[derive(Debug, Clone, PartialEq)]
pub enum PolylineSegment {
    Straight(Line),
    Bulge(BulgeArc),
}

impl PolylineSegment {
    pub fn start(&self) -> Point2 {
        match self {
            PolylineSegment::Straight(l) => l.start,
            PolylineSegment::Bulge(a) => a.start,
        }
    }

    pub fn end(&self) -> Point2 {
        match self {
            PolylineSegment::Straight(l) => l.end,
            PolylineSegment::Bulge(a) => a.end,
        }
    }

    pub fn length(&self) -> f64 {
        match self {
            PolylineSegment::Straight(l) => l.length(),
            PolylineSegment::Bulge(a) => a.length(),
        }
    }

    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        match self {
            PolylineSegment::Straight(l) => l.distance_to_point(point),
            PolylineSegment::Bulge(a) => a.to_arc().distance_to_point(point),
        }
    }
}

/// 多段线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub vertices: Vec<PolylineVertex>,
    /// 是否闭合
    #[serde(default)]
    pub closed: bool,
}

impl Polyline {
    pub fn new(vertices: Vec<PolylineVertex>, closed: bool) -> Self {
        Self { vertices, closed }
    }

    /// 从点列表创建（所有顶点都是直线连接）
    pub fn from_points(points: impl IntoIterator<Item = Point2>, closed: bool) -> Self {
        Self {
            vertices: points.into_iter().map(PolylineVertex::new).collect(),
            closed,
        }
    }

    /// 线段数量
    pub fn segment_count(&self) -> usize {
        if self.vertices.len() < 2 {
            return 0;
        }
        if self.closed {
            self.vertices.len()
        } else {
            self.vertices.len() - 1
        }
    }

    /// 获取第 `index` 段；凸度无法构成圆弧时退化为直线段
    pub fn segment(&self, index: usize) -> Option<PolylineSegment> {
        if index >= self.segment_count() {
            return None;
        }
        let v1 = &self.vertices[index];
        let v2 = &self.vertices[(index + 1) % self.vertices.len()];

        if v1.bulge.abs() < EPSILON {
            return Some(PolylineSegment::Straight(Line::new(v1.point, v2.point)));
        }
        match BulgeArc::from_bulge(v1.point, v2.point, v1.bulge) {
            Ok(arc) => Some(PolylineSegment::Bulge(arc)),
            Err(_) => Some(PolylineSegment::Straight(Line::new(v1.point, v2.point))),
        }
    }

    /// 按顺序遍历所有线段
    pub fn segments(&self) -> impl Iterator<Item = PolylineSegment> + '_ {
        (0..self.segment_count()).filter_map(move |i| self.segment(i))
    }

    /// 是否含有弧线段
    pub fn has_bulge(&self) -> bool {
        self.segments()
            .any(|s| matches!(s, PolylineSegment::Bulge(_)))
    }

    /// 计算总长度（弧线段按弧长计）
    pub fn length(&self) -> f64 {
        self.segments().map(|s| s.length()).sum()
    }

    /// 计算点到多段线的距离
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        if self.vertices.is_empty() {
            return f64::MAX;
        }
        if self.vertices.len() == 1 {
            return (point - self.vertices[0].point).norm();
        }

        self.segments()
            .map(|s| s.distance_to_point(point))
            .fold(f64::MAX, f64::min)
    }

    /// 离给定点最近的直线段索引
    pub fn closest_straight_segment(&self, point: &Point2) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for i in 0..self.segment_count() {
            if let Some(PolylineSegment::Straight(line)) = self.segment(i) {
                let dist = line.distance_to_point(point);
                if best.map_or(true, |(_, d)| dist < d) {
                    best = Some((i, dist));
                }
            }
        }
        best.map(|(i, _)| i)
    }

    /// 离给定点最近的弧线段
    pub fn closest_bulge_segment(&self, point: &Point2) -> Option<BulgeArc> {
        let mut best: Option<(BulgeArc, f64)> = None;
        for segment in self.segments() {
            if let PolylineSegment::Bulge(arc) = segment {
                let dist = arc.to_arc().distance_to_point(point);
                if best.as_ref().map_or(true, |(_, d)| dist < *d) {
                    best = Some((arc, dist));
                }
            }
        }
        best.map(|(arc, _)| arc)
    }

    /// 闭合多段线围成的面积（鞋带公式 + 弧线段弓形修正）
    pub fn area(&self) -> f64 {
        let mut signed = 0.0;
        for segment in self.segments() {
            let a = segment.start();
            let b = segment.end();
            signed += (a.x * b.y - b.x * a.y) / 2.0;
            if let PolylineSegment::Bulge(arc) = &segment {
                signed += arc.signed_segment_area();
            }
        }
        signed.abs()
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        if self.vertices.is_empty() {
            return BoundingBox2::empty();
        }
        let mut bbox = BoundingBox2::from_points(self.vertices.iter().map(|v| v.point));
        for segment in self.segments() {
            if let PolylineSegment::Bulge(arc) = segment {
                let arc_box = arc.to_arc().bounding_box();
                bbox.expand_to_include(&arc_box.min);
                bbox.expand_to_include(&arc_box.max);
            }
        }
        bbox
    }
}

/// 两条无限长直线的交点（行列式法）
///
/// 直线分别经过 `a1, a2` 与 `b1, b2`。
pub fn intersect_lines(
    a1: Point2,
    a2: Point2,
    b1: Point2,
    b2: Point2,
) -> Result<Point2, GeometryError> {
    let d1 = a2 - a1;
    let d2 = b2 - b1;
    if d1.norm() < EPSILON || d2.norm() < EPSILON {
        return Err(GeometryError::ZeroLength);
    }

    let det = d1.x * d2.y - d1.y * d2.x;
    // 用方向长度归一化，避免坐标量级影响平行判断
    if det.abs() / (d1.norm() * d2.norm()) < 1e-9 {
        return Err(GeometryError::Parallel);
    }

    let d = b1 - a1;
    let t = (d.x * d2.y - d.y * d2.x) / det;
    Ok(a1 + d1 * t)
}

/// 估算文本宽度（简化计算，假设每个字符宽度约为高度的0.6倍）
pub fn estimated_text_width(content: &str, height: f64) -> f64 {
    // 对于中文字符，宽度接近高度；对于英文，约为高度的0.6倍
    let char_count = content.chars().count();
    let cjk_count = content.chars().filter(|c| is_cjk(*c)).count();
    let ascii_count = char_count - cjk_count;

    (cjk_count as f64 * height) + (ascii_count as f64 * height * 0.6)
}

/// 检查是否是CJK字符
fn is_cjk(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '\u{F900}'..='\u{FAFF}')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point2, b: Point2) -> bool {
        (a - b).norm() < 1e-9
    }

    #[test]
    fn test_line_length() {
        let line = Line::new(Point2::new(0.0, 0.0), Point2::new(3.0, 4.0));
        assert!((line.length() - 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_circle_area() {
        let circle = Circle::new(Point2::origin(), 1.0);
        assert!((circle.area() - PI).abs() < EPSILON);
    }

    #[test]
    fn test_bulge_reproduces_endpoints() {
        let cases = [
            (Point2::new(0.0, 0.0), Point2::new(10.0, 0.0), 0.5),
            (Point2::new(0.0, 0.0), Point2::new(10.0, 0.0), -0.5),
            (Point2::new(3.0, -2.0), Point2::new(-4.0, 7.5), 1.0),
            (Point2::new(1.0, 1.0), Point2::new(2.0, 5.0), -2.3),
            (Point2::new(-8.0, 4.0), Point2::new(6.0, 4.0), 0.05),
        ];
        for (p1, p2, b) in cases {
            let arc = BulgeArc::from_bulge(p1, p2, b).unwrap();
            assert!(close(arc.point_at_angle(arc.start_angle), p1), "start for bulge {}", b);
            assert!(close(arc.point_at_angle(arc.end_angle), p2), "end for bulge {}", b);
            assert_eq!(arc.is_ccw(), b > 0.0);
        }
    }

    #[test]
    fn test_bulge_semicircle() {
        // bulge = 1 为半圆，圆心在弦中点，逆时针从 (0,0) 到 (10,0) 经过下方
        let arc = BulgeArc::from_bulge(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0), 1.0).unwrap();
        assert!(close(arc.center, Point2::new(5.0, 0.0)));
        assert!((arc.radius - 5.0).abs() < EPSILON);
        assert!(close(arc.midpoint(), Point2::new(5.0, -5.0)));
        assert!((arc.length() - 5.0 * PI).abs() < 1e-9);
    }

    #[test]
    fn test_bulge_zero_is_rejected() {
        let err = BulgeArc::from_bulge(Point2::origin(), Point2::new(1.0, 0.0), 0.0).unwrap_err();
        assert_eq!(err, GeometryError::DegenerateBulge(0.0));
        let err = BulgeArc::from_bulge(Point2::origin(), Point2::origin(), 0.5).unwrap_err();
        assert_eq!(err, GeometryError::ZeroLength);
    }

    #[test]
    fn test_arc_contains_angle_wraparound() {
        // 从 270° 逆时针到 90°，跨越 0°
        let arc = Arc::new(Point2::origin(), 1.0, 3.0 * FRAC_PI_2, FRAC_PI_2);
        assert!(arc.contains_angle(0.0));
        assert!(!arc.contains_angle(PI));
        assert!(arc.contains_angle(-0.2));
    }

    #[test]
    fn test_polyline_bulge_area_and_length() {
        // 两个 bulge=1 的半圆拼成单位圆
        let pl = Polyline::new(
            vec![
                PolylineVertex::with_bulge(Point2::new(0.0, 0.0), 1.0),
                PolylineVertex::with_bulge(Point2::new(2.0, 0.0), 1.0),
            ],
            true,
        );
        assert!((pl.area() - PI).abs() < 1e-9);
        assert!((pl.length() - TAU).abs() < 1e-9);
        assert!(pl.has_bulge());
    }

    #[test]
    fn test_arc_and_bulge_bounding_box() {
        let quarter = Arc::new(Point2::origin(), 10.0, 0.0, std::f64::consts::FRAC_PI_2);
        let bbox = Geometry::Arc(quarter).bounding_box();
        assert!(close(bbox.min, Point2::new(0.0, 0.0)));
        assert!(close(bbox.max, Point2::new(10.0, 10.0)));

        // 半圆段把包围盒撑到弦外 5 个单位
        let pl = Polyline::new(
            vec![
                PolylineVertex::with_bulge(Point2::new(0.0, 0.0), 1.0),
                PolylineVertex::new(Point2::new(10.0, 0.0)),
            ],
            false,
        );
        let bbox = Geometry::Polyline(pl).bounding_box();
        assert!(((bbox.max.y - bbox.min.y) - 5.0).abs() < 1e-9);
        assert!(bbox.inflate(1.0).contains(&Point2::new(-1.0, 0.0)));
    }

    #[test]
    fn test_polyline_square_area() {
        let pl = Polyline::from_points(
            [
                Point2::new(0.0, 0.0),
                Point2::new(4.0, 0.0),
                Point2::new(4.0, 3.0),
                Point2::new(0.0, 3.0),
            ],
            true,
        );
        assert!((pl.area() - 12.0).abs() < EPSILON);
        assert!((pl.length() - 14.0).abs() < EPSILON);
        assert_eq!(pl.closest_straight_segment(&Point2::new(4.2, 1.5)), Some(1));
    }

    #[test]
    fn test_intersect_lines() {
        let p = intersect_lines(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(10.0, 0.0),
            Point2::new(9.0, 1.0),
        )
        .unwrap();
        assert!(close(p, Point2::new(5.0, 5.0)));

        let err = intersect_lines(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(5.0, 1.0),
        )
        .unwrap_err();
        assert_eq!(err, GeometryError::Parallel);
    }

    #[test]
    fn test_estimated_text_width() {
        assert!((estimated_text_width("100.000", 2.5) - 7.0 * 1.5).abs() < EPSILON);
        assert!((estimated_text_width("半径", 2.0) - 4.0).abs() < EPSILON);
    }
}
