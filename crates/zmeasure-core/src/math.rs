//! 数学基础类型
//!
//! 基于 nalgebra 的类型别名，以及角度归一化等常用辅助函数。

use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

pub type Point2 = nalgebra::Point2<f64>;
pub type Vector2 = nalgebra::Vector2<f64>;
pub type Point3 = nalgebra::Point3<f64>;
pub type Vector3 = nalgebra::Vector3<f64>;

/// 几何比较的默认容差
pub const EPSILON: f64 = 1e-9;

/// 将角度（弧度）归一化到 [0, 2π)
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid 在极小负数上可能返回 TAU
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// 将文字旋转角（弧度）归一化到 (-π/2, π/2]，保证文字不倒置
pub fn readable_rotation(angle: f64) -> f64 {
    let mut a = normalize_angle(angle);
    if a > PI {
        a -= TAU;
    }
    // 此时 a ∈ (-π, π]
    if a > PI / 2.0 + EPSILON {
        a -= PI;
    } else if a <= -PI / 2.0 + EPSILON {
        a += PI;
    }
    a
}

/// 单位向量的左法向（逆时针旋转90°）
pub fn perpendicular(v: &Vector2) -> Vector2 {
    Vector2::new(-v.y, v.x)
}

/// 安全归一化，长度过小时返回 None
pub fn try_normalize(v: &Vector2) -> Option<Vector2> {
    let len = v.norm();
    if len < EPSILON {
        None
    } else {
        Some(v / len)
    }
}

/// 向量的方向角（弧度）
pub fn angle_of(v: &Vector2) -> f64 {
    v.y.atan2(v.x)
}

/// 方向角对应的单位向量
pub fn unit_at(angle: f64) -> Vector2 {
    Vector2::new(angle.cos(), angle.sin())
}

/// 二维包围盒
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2 {
    pub min: Point2,
    pub max: Point2,
}

impl BoundingBox2 {
    pub fn new(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    /// 空包围盒（任何点扩展后都会覆盖它）
    pub fn empty() -> Self {
        Self {
            min: Point2::new(f64::MAX, f64::MAX),
            max: Point2::new(f64::MIN, f64::MIN),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Point2>) -> Self {
        let mut bbox = Self::empty();
        for p in points {
            bbox.expand_to_include(&p);
        }
        bbox
    }

    pub fn expand_to_include(&mut self, p: &Point2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// 向四周扩展指定距离
    pub fn inflate(&self, margin: f64) -> Self {
        Self::new(
            Point2::new(self.min.x - margin, self.min.y - margin),
            Point2::new(self.max.x + margin, self.max.y + margin),
        )
    }

    pub fn contains(&self, p: &Point2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}
