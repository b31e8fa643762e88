//! 二维放置变换
//!
//! 图块/模板插入时的平移、旋转与等比缩放。负缩放（镜像）不在支持范围内。

use crate::geometry::{Arc, Circle, Geometry, Line, Point, Polyline, PolylineVertex};
use crate::math::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// 二维变换：先缩放，再旋转，最后平移
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub translation: Vector2,
    /// 旋转角度（弧度）
    pub rotation: f64,
    /// 等比缩放
    pub scale: f64,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2D {
    pub fn identity() -> Self {
        Self {
            translation: Vector2::zeros(),
            rotation: 0.0,
            scale: 1.0,
        }
    }

    pub fn new(translation: Vector2, rotation: f64, scale: f64) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.translation.norm() == 0.0 && self.rotation == 0.0 && self.scale == 1.0
    }

    pub fn apply_vector(&self, v: &Vector2) -> Vector2 {
        let (sin, cos) = self.rotation.sin_cos();
        Vector2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos) * self.scale
    }

    pub fn apply_point(&self, p: &Point2) -> Point2 {
        Point2::from(self.apply_vector(&p.coords) + self.translation)
    }

    /// 变换几何体到世界坐标
    pub fn apply(&self, geometry: &Geometry) -> Geometry {
        if self.is_identity() {
            return geometry.clone();
        }
        match geometry {
            Geometry::Point(p) => Geometry::Point(Point::from_point2(self.apply_point(&p.position))),
            Geometry::Line(l) => Geometry::Line(Line::new(
                self.apply_point(&l.start),
                self.apply_point(&l.end),
            )),
            Geometry::Circle(c) => Geometry::Circle(Circle::new(
                self.apply_point(&c.center),
                c.radius * self.scale.abs(),
            )),
            Geometry::Arc(a) => Geometry::Arc(Arc::new(
                self.apply_point(&a.center),
                a.radius * self.scale.abs(),
                a.start_angle + self.rotation,
                a.end_angle + self.rotation,
            )),
            Geometry::Polyline(pl) => Geometry::Polyline(Polyline::new(
                pl.vertices
                    .iter()
                    .map(|v| PolylineVertex::with_bulge(self.apply_point(&v.point), v.bulge))
                    .collect(),
                pl.closed,
            )),
        }
    }
}
