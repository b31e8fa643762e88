//! 线性尺寸标注求解
//!
//! 根据两个测量点和尺寸线放置点，决定标注是对齐、水平还是垂直，
//! 并计算尺寸界线、尺寸线、箭头和文字位置。结果是纯函数，
//! 预览时每帧重新计算。
//!
//! 方向规则：拖拽向量（放置点 − 两点中点）与测量线法向的夹角小于约 30°
//! 且拖拽距离足够时为对齐标注；否则比较拖拽的 x/y 分量——竖直方向拉动为主
//! 时得到水平标注（测 Δx），水平方向拉动为主时得到垂直标注（测 Δy）。

use crate::annotation::{effective_scale, format_value, Arrowhead, MeasureStyle, TextLabel};
use crate::geometry::{estimated_text_width, Line};
use crate::math::{angle_of, perpendicular, readable_rotation, try_normalize, Point2, Vector2};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// 两测量点距离小于该值视为退化
const DEGENERATE_LENGTH: f64 = 1e-6;

/// 标注方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DimensionOrientation {
    /// 对齐标注：尺寸线平行于测量线
    Aligned,
    /// 水平标注：测量 Δx，尺寸线保持在放置点的 y
    Horizontal,
    /// 垂直标注：测量 Δy，尺寸线保持在放置点的 x
    Vertical,
}

impl DimensionOrientation {
    pub fn name(&self) -> &'static str {
        match self {
            DimensionOrientation::Aligned => "对齐",
            DimensionOrientation::Horizontal => "水平",
            DimensionOrientation::Vertical => "垂直",
        }
    }
}

/// 箭头相对尺寸界线的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArrowPlacement {
    /// 箭头在尺寸界线之间，指向界线
    Inside,
    /// 空间不足，箭头画在界线外侧指向内部，并带延伸短线
    Outside,
}

/// 线性标注的派生状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionState {
    pub orientation: DimensionOrientation,
    /// 测量值（已除以比例）
    pub value: f64,
    /// 尺寸线端点
    pub line_start: Point2,
    pub line_end: Point2,
    /// 文字旋转角度（弧度）
    pub rotation: f64,
    /// 两条尺寸界线
    pub witness_lines: [Line; 2],
    pub arrows: [Arrowhead; 2],
    pub arrow_placement: ArrowPlacement,
    /// 箭头外置时的延伸短线
    pub stubs: Vec<Line>,
    pub text: TextLabel,
}

impl DimensionState {
    /// 退化输入的零值对齐状态
    fn degenerate(p1: Point2, style: &MeasureStyle) -> Self {
        let dir = Vector2::new(1.0, 0.0);
        Self {
            orientation: DimensionOrientation::Aligned,
            value: 0.0,
            line_start: p1,
            line_end: p1,
            rotation: 0.0,
            witness_lines: [Line::new(p1, p1), Line::new(p1, p1)],
            arrows: [
                Arrowhead::new(p1, -dir, style.arrow_length),
                Arrowhead::new(p1, dir, style.arrow_length),
            ],
            arrow_placement: ArrowPlacement::Inside,
            stubs: Vec::new(),
            text: TextLabel::new(p1, format_value(0.0, style.precision), style.text_height, 0.0),
        }
    }
}

/// 仅计算标注方向
pub fn classify_orientation(
    p1: Point2,
    p2: Point2,
    placement: Point2,
    style: &MeasureStyle,
) -> DimensionOrientation {
    let Some(dir) = try_normalize(&(p2 - p1)) else {
        return DimensionOrientation::Aligned;
    };
    let normal = perpendicular(&dir);
    let mid = p1 + (p2 - p1) * 0.5;
    let drag = placement - mid;
    let drag_len = drag.norm();

    if drag_len > style.min_aligned_drag && drag.dot(&normal).abs() / drag_len >= style.aligned_threshold {
        DimensionOrientation::Aligned
    } else if drag.x.abs() > drag.y.abs() {
        DimensionOrientation::Vertical
    } else {
        DimensionOrientation::Horizontal
    }
}

/// 求解线性标注
pub fn resolve_dimension(
    p1: Point2,
    p2: Point2,
    placement: Point2,
    scale: f64,
    style: &MeasureStyle,
) -> DimensionState {
    if (p2 - p1).norm() < DEGENERATE_LENGTH {
        return DimensionState::degenerate(p1, style);
    }

    let scale = effective_scale(scale);
    let dir = (p2 - p1).normalize();
    let orientation = classify_orientation(p1, p2, placement, style);

    let (d1, d2, value, axis, rotation) = match orientation {
        DimensionOrientation::Aligned => {
            let normal = perpendicular(&dir);
            let offset = (placement - p1).dot(&normal);
            (
                p1 + normal * offset,
                p2 + normal * offset,
                (p2 - p1).norm() / scale,
                dir,
                readable_rotation(angle_of(&dir)),
            )
        }
        DimensionOrientation::Horizontal => (
            Point2::new(p1.x, placement.y),
            Point2::new(p2.x, placement.y),
            (p2.x - p1.x).abs() / scale,
            Vector2::new(1.0, 0.0),
            0.0,
        ),
        DimensionOrientation::Vertical => (
            Point2::new(placement.x, p1.y),
            Point2::new(placement.x, p2.y),
            (p2.y - p1.y).abs() / scale,
            Vector2::new(0.0, 1.0),
            FRAC_PI_2,
        ),
    };

    let label = format_value(value, style.precision);
    let witness_lines = [
        witness_line(p1, d1, style.witness_overshoot),
        witness_line(p2, d2, style.witness_overshoot),
    ];

    // 尺寸线方向：d1 -> d2；长度为零时沿测量轴
    let u = try_normalize(&(d2 - d1)).unwrap_or(axis);
    let dim_len = (d2 - d1).norm();
    let text_width = estimated_text_width(&label, style.text_height);
    let tight = dim_len < style.tight_space_factor * style.arrow_length + text_width;

    let (arrows, arrow_placement, stubs) = if tight {
        let reach = style.arrow_length + style.extension_stub;
        (
            [
                Arrowhead::new(d1, u, style.arrow_length),
                Arrowhead::new(d2, -u, style.arrow_length),
            ],
            ArrowPlacement::Outside,
            vec![
                Line::new(d1 - u * reach, d1 - u * style.arrow_length),
                Line::new(d2 + u * style.arrow_length, d2 + u * reach),
            ],
        )
    } else {
        (
            [
                Arrowhead::new(d1, -u, style.arrow_length),
                Arrowhead::new(d2, u, style.arrow_length),
            ],
            ArrowPlacement::Inside,
            Vec::new(),
        )
    };

    // 文字放在尺寸线远离被测对象的一侧
    let dim_mid = d1 + (d2 - d1) * 0.5;
    let object_mid = p1 + (p2 - p1) * 0.5;
    let mut text_normal = perpendicular(&u);
    if (dim_mid - object_mid).dot(&text_normal) < 0.0 {
        text_normal = -text_normal;
    }
    let text = TextLabel::new(
        dim_mid + text_normal * style.text_clearance,
        label,
        style.text_height,
        rotation,
    );

    DimensionState {
        orientation,
        value,
        line_start: d1,
        line_end: d2,
        rotation,
        witness_lines,
        arrows,
        arrow_placement,
        stubs,
        text,
    }
}

/// 从测量点到尺寸线，并超出一小段
fn witness_line(from: Point2, to: Point2, overshoot: f64) -> Line {
    match try_normalize(&(to - from)) {
        Some(dir) => Line::new(from, to + dir * overshoot),
        None => Line::new(from, to),
    }
}
