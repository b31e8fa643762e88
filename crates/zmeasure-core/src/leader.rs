//! 半径/直径引线标注求解

use crate::annotation::{effective_scale, format_value, Arrowhead, MeasureStyle, TextLabel};
use crate::error::GeometryError;
use crate::geometry::{estimated_text_width, Line};
use crate::math::{try_normalize, Point2, EPSILON};
use serde::{Deserialize, Serialize};

/// 引线标注模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaderMode {
    Radius,
    Diameter,
}

impl LeaderMode {
    /// 标注文字前缀
    pub fn prefix(&self) -> &'static str {
        match self {
            LeaderMode::Radius => "R",
            LeaderMode::Diameter => "Ø",
        }
    }
}

/// 引线标注的派生状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderState {
    pub mode: LeaderMode,
    pub value: f64,
    pub center: Point2,
    pub radius: f64,
    /// 文字在圆外时为 true，箭头指向圆心
    pub outside: bool,
    pub arrow: Arrowhead,
    /// 从箭头尾部到水平基线端点
    pub leader: Line,
    /// 文字下方的水平基线
    pub landing: Line,
    pub text: TextLabel,
    /// 圆上与箭头相对的点（直径模式下用于绘制整条直径线）
    pub opposite: Point2,
}

/// 求解半径/直径引线
///
/// `arrow_point` 只用来确定方向，箭头尖端始终投影到圆上。
pub fn resolve_leader(
    center: Point2,
    radius: f64,
    arrow_point: Point2,
    text_point: Point2,
    mode: LeaderMode,
    scale: f64,
    style: &MeasureStyle,
) -> Result<LeaderState, GeometryError> {
    if radius < EPSILON {
        return Err(GeometryError::ZeroRadius);
    }
    let u = try_normalize(&(arrow_point - center)).ok_or(GeometryError::ZeroRadius)?;

    let scale = effective_scale(scale);
    let value = match mode {
        LeaderMode::Radius => radius / scale,
        LeaderMode::Diameter => 2.0 * radius / scale,
    };
    let label = format!("{}{}", mode.prefix(), format_value(value, style.precision));

    let tip = center + u * radius;
    let outside = (text_point - center).norm() > style.inside_ratio * radius;
    let direction = if outside { -u } else { u };
    let arrow = Arrowhead::new(tip, direction, style.arrow_length);
    let tail = arrow.tail();

    let half = estimated_text_width(&label, style.text_height) / 2.0;
    let landing = Line::new(
        Point2::new(text_point.x - half, text_point.y),
        Point2::new(text_point.x + half, text_point.y),
    );
    // 连接到靠近箭头一侧的基线端点，避免引线穿过文字
    let connect = if text_point.x > tail.x {
        landing.start
    } else {
        landing.end
    };

    let text = TextLabel::new(
        Point2::new(text_point.x, text_point.y + style.text_clearance),
        label,
        style.text_height,
        0.0,
    );

    Ok(LeaderState {
        mode,
        value,
        center,
        radius,
        outside,
        arrow,
        leader: Line::new(tail, connect),
        landing,
        text,
        opposite: center - u * radius,
    })
}
