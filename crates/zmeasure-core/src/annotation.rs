//! 标注的公共渲染图元与样式
//!
//! 箭头、文字和标注样式由三个求解器（线性尺寸、角度、半径/直径引线）共享。

use crate::math::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// 标注样式
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureStyle {
    /// 箭头长度（世界单位）
    pub arrow_length: f64,
    /// 文字高度
    pub text_height: f64,
    /// 文字与尺寸线/圆弧之间的间隙
    pub text_clearance: f64,
    /// 箭头外置时尺寸线向外延伸的短线长度
    pub extension_stub: f64,
    /// 尺寸界线超出尺寸线的长度
    pub witness_overshoot: f64,
    /// 空间不足判定系数：尺寸线长度 < 系数 × 箭头长度 + 文字宽度
    pub tight_space_factor: f64,
    /// 对齐标注判定阈值：|拖拽·法向| / |拖拽|
    pub aligned_threshold: f64,
    /// 对齐标注要求的最小拖拽距离
    pub min_aligned_drag: f64,
    /// 文字到圆心距离超过 该比例 × 半径 视为外部标注
    pub inside_ratio: f64,
    /// 角度标注圆弧的最小半径
    pub min_angle_radius: f64,
    /// 无放置点时角度圆弧半径 = 系数 × 较短边长
    pub angle_radius_factor: f64,
    /// 线性值小数位数
    pub precision: usize,
    /// 角度值小数位数
    pub angle_precision: usize,
}

impl Default for MeasureStyle {
    fn default() -> Self {
        Self {
            arrow_length: 2.5,
            text_height: 2.5,
            text_clearance: 1.0,
            extension_stub: 1.5,
            witness_overshoot: 1.25,
            tight_space_factor: 2.2,
            aligned_threshold: 0.85,
            min_aligned_drag: 0.1,
            inside_ratio: 0.95,
            min_angle_radius: 5.0,
            angle_radius_factor: 0.8,
            precision: 3,
            angle_precision: 1,
        }
    }
}

/// 箭头：尖端位置 + 指向方向（单位向量）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arrowhead {
    pub tip: Point2,
    pub direction: Vector2,
    pub length: f64,
}

impl Arrowhead {
    pub fn new(tip: Point2, direction: Vector2, length: f64) -> Self {
        Self {
            tip,
            direction,
            length,
        }
    }

    /// 箭头尾部（箭头形状的后端）
    pub fn tail(&self) -> Point2 {
        self.tip - self.direction * self.length
    }
}

/// 标注文字
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLabel {
    /// 文字中心底部的位置
    pub position: Point2,
    pub content: String,
    pub height: f64,
    /// 旋转角度（弧度），已归一化到 (-π/2, π/2]
    pub rotation: f64,
}

impl TextLabel {
    pub fn new(position: Point2, content: impl Into<String>, height: f64, rotation: f64) -> Self {
        Self {
            position,
            content: content.into(),
            height,
            rotation,
        }
    }
}

/// 按指定小数位格式化数值，避免出现 "-0.000"
pub fn format_value(value: f64, precision: usize) -> String {
    let threshold = 0.5 * 10f64.powi(-(precision as i32));
    let v = if value.abs() < threshold { 0.0 } else { value };
    format!("{:.*}", precision, v)
}

/// 测量比例回退：非正数或非有限值按 1.0 处理
pub fn effective_scale(scale: f64) -> f64 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(100.0, 3), "100.000");
        assert_eq!(format_value(-0.0001, 3), "0.000");
        assert_eq!(format_value(90.0, 1), "90.0");
        assert_eq!(format_value(2.71828, 2), "2.72");
    }

    #[test]
    fn test_arrow_tail() {
        let arrow = Arrowhead::new(Point2::new(10.0, 0.0), Vector2::new(1.0, 0.0), 2.5);
        assert_eq!(arrow.tail(), Point2::new(7.5, 0.0));
    }
}
