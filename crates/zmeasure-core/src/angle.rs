//! 角度标注求解
//!
//! 两条边视为过顶点的无限长直线，将平面分成 4 个扇区。放置点落在哪个扇区，
//! 就标注哪个扇区的角度，所以同一对直线可以得到 4 种读数。

use crate::annotation::{format_value, Arrowhead, MeasureStyle, TextLabel};
use crate::error::GeometryError;
use crate::geometry::Arc;
use crate::math::{
    angle_of, normalize_angle, readable_rotation, unit_at, Point2, Vector2, EPSILON,
};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// 角度标注的派生状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleState {
    pub center: Point2,
    /// 扇区起始角（弧度，[0, 2π)）
    pub start_angle: f64,
    /// 扇区终止角（弧度，可能超过 2π 以表示跨越 0°）
    pub end_angle: f64,
    /// 扫过角度（弧度）
    pub sweep: f64,
    /// 角度值（度）
    pub value: f64,
    pub radius: f64,
    /// 放置点所在扇区的序号（无放置点时为 None）
    pub sector: Option<usize>,
    pub arc: Arc,
    pub arrows: [Arrowhead; 2],
    pub text: TextLabel,
}

/// 两条直线方向角构成的 4 个扇区边界（归一化并排序）
pub fn sector_bounds(theta1: f64, theta2: f64) -> [f64; 4] {
    let mut bounds = [
        normalize_angle(theta1),
        normalize_angle(theta1 + PI),
        normalize_angle(theta2),
        normalize_angle(theta2 + PI),
    ];
    bounds.sort_by(|a, b| a.total_cmp(b));
    bounds
}

/// 查找角度所在扇区，返回 (序号, 起始角, 终止角)
///
/// 扇区为左闭右开区间；最后一个扇区跨越 0°，终止角加 2π。
pub fn locate_sector(bounds: &[f64; 4], angle: f64) -> (usize, f64, f64) {
    let a = normalize_angle(angle);
    for i in 0..3 {
        if a >= bounds[i] && a < bounds[i + 1] {
            return (i, bounds[i], bounds[i + 1]);
        }
    }
    (3, bounds[3], bounds[0] + TAU)
}

/// 求解角度标注
///
/// `arm1`、`arm2` 为两条边上的点；边长为零时返回错误。
pub fn resolve_angle(
    center: Point2,
    arm1: Point2,
    arm2: Point2,
    placement: Option<Point2>,
    style: &MeasureStyle,
) -> Result<AngleState, GeometryError> {
    let v1 = arm1 - center;
    let v2 = arm2 - center;
    let len1 = v1.norm();
    let len2 = v2.norm();
    if len1 < EPSILON || len2 < EPSILON {
        return Err(GeometryError::ZeroLength);
    }

    let theta1 = angle_of(&v1);
    let theta2 = angle_of(&v2);

    // 放置点与顶点重合时无法定位扇区，按无放置点处理
    let placement = placement.filter(|p| (*p - center).norm() >= EPSILON);

    let (sector, start, end) = match placement {
        Some(p) => {
            let bounds = sector_bounds(theta1, theta2);
            let (index, start, end) = locate_sector(&bounds, angle_of(&(p - center)));
            (Some(index), start, end)
        }
        None => {
            let cross = v1.x * v2.y - v1.y * v2.x;
            let signed = cross.atan2(v1.dot(&v2));
            let sweep = if signed < 0.0 { signed + TAU } else { signed };
            let start = normalize_angle(theta1);
            (None, start, start + sweep)
        }
    };
    let sweep = end - start;

    let radius = match placement {
        Some(p) => (p - center).norm(),
        None => (style.angle_radius_factor * len1.min(len2)).max(style.min_angle_radius),
    };

    let value = sweep.to_degrees();
    let label = format!("{}°", format_value(value, style.angle_precision));

    // 箭头尖端在扇区边界上，沿切线指向边界
    let start_tip = center + unit_at(start) * radius;
    let end_tip = center + unit_at(end) * radius;
    let arrows = [
        Arrowhead::new(
            start_tip,
            Vector2::new(start.sin(), -start.cos()),
            style.arrow_length,
        ),
        Arrowhead::new(
            end_tip,
            Vector2::new(-end.sin(), end.cos()),
            style.arrow_length,
        ),
    ];

    let mid = start + sweep / 2.0;
    let text = TextLabel::new(
        center + unit_at(mid) * (radius + style.text_clearance),
        label,
        style.text_height,
        readable_rotation(mid + FRAC_PI_2),
    );

    Ok(AngleState {
        center,
        start_angle: start,
        end_angle: end,
        sweep,
        value,
        radius,
        sector,
        arc: Arc::new(center, radius, start, normalize_angle(end)),
        arrows,
        text,
    })
}
