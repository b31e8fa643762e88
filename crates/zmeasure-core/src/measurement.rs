//! 测量结果
//!
//! 工具会话提交后产生 `Measurement`，所有权交给宿主。核心只在显式更新公差时
//! 重新计算标注文字。

use crate::angle::AngleState;
use crate::annotation::{format_value, TextLabel};
use crate::dimension::DimensionState;
use crate::leader::LeaderState;
use crate::math::Point2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 测量唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeasurementId(pub u64);

impl fmt::Display for MeasurementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}", self.0)
    }
}

/// 测量类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasurementKind {
    Distance,
    Angle,
    Radius,
    Diameter,
    Area,
}

impl MeasurementKind {
    pub fn name(&self) -> &'static str {
        match self {
            MeasurementKind::Distance => "距离",
            MeasurementKind::Angle => "角度",
            MeasurementKind::Radius => "半径",
            MeasurementKind::Diameter => "直径",
            MeasurementKind::Area => "周长",
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            MeasurementKind::Radius => "R",
            MeasurementKind::Diameter => "Ø",
            _ => "",
        }
    }

    fn suffix(&self) -> &'static str {
        match self {
            MeasurementKind::Angle => "°",
            _ => "",
        }
    }
}

/// 公差标注
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ToleranceSpec {
    /// 对称公差：±t
    Symmetric(f64),
    /// 上下偏差：+upper/-lower（两者均为正数）
    Deviation { upper: f64, lower: f64 },
    /// 极限尺寸：value+upper / value-lower
    Limits { upper: f64, lower: f64 },
}

/// 面积工具的纯文字标注
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaLabel {
    /// 链条总长
    pub perimeter: f64,
    /// 单个圆或闭合多段线时的围合面积
    pub area: Option<f64>,
    /// 链条中的实体数量
    pub entity_count: usize,
    pub text: TextLabel,
}

/// 可渲染的标注几何
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MeasurementShape {
    Dimension(DimensionState),
    Angle(AngleState),
    Leader(LeaderState),
    Label(AreaLabel),
}

impl MeasurementShape {
    pub fn text(&self) -> &TextLabel {
        match self {
            MeasurementShape::Dimension(s) => &s.text,
            MeasurementShape::Angle(s) => &s.text,
            MeasurementShape::Leader(s) => &s.text,
            MeasurementShape::Label(s) => &s.text,
        }
    }

    fn text_mut(&mut self) -> &mut TextLabel {
        match self {
            MeasurementShape::Dimension(s) => &mut s.text,
            MeasurementShape::Angle(s) => &mut s.text,
            MeasurementShape::Leader(s) => &mut s.text,
            MeasurementShape::Label(s) => &mut s.text,
        }
    }
}

/// 已提交的测量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: MeasurementId,
    pub kind: MeasurementKind,
    /// 数值（长度已除以比例；角度为度）
    pub value: f64,
    /// 定义点（按点击顺序）
    pub points: Vec<Point2>,
    pub shape: MeasurementShape,
    pub label: String,
    pub precision: usize,
    pub tolerance: Option<ToleranceSpec>,
}

impl Measurement {
    pub fn new(
        kind: MeasurementKind,
        value: f64,
        points: Vec<Point2>,
        shape: MeasurementShape,
        precision: usize,
    ) -> Self {
        let mut measurement = Self {
            id: MeasurementId(0),
            kind,
            value,
            points,
            shape,
            label: String::new(),
            precision,
            tolerance: None,
        };
        measurement.refresh_label();
        measurement
    }

    pub fn with_id(mut self, id: MeasurementId) -> Self {
        self.id = id;
        self
    }

    /// 不含公差的基础文字
    pub fn base_label(&self) -> String {
        let base = self.format(self.value);
        match (&self.kind, &self.shape) {
            (MeasurementKind::Area, MeasurementShape::Label(label)) => match label.area {
                Some(area) => format!("L={} A={}", base, format_value(area, self.precision)),
                None => format!("L={}", base),
            },
            _ => base,
        }
    }

    /// 设置或清除公差，并重新计算标注文字
    pub fn apply_tolerance(&mut self, tolerance: Option<ToleranceSpec>) {
        self.tolerance = tolerance;
        self.refresh_label();
    }

    fn refresh_label(&mut self) {
        let base = self.base_label();
        let p = self.precision;
        self.label = match self.tolerance {
            None => base,
            Some(ToleranceSpec::Symmetric(t)) => format!("{} ±{}", base, format_value(t.abs(), p)),
            Some(ToleranceSpec::Deviation { upper, lower }) => format!(
                "{} +{}/-{}",
                base,
                format_value(upper.abs(), p),
                format_value(lower.abs(), p)
            ),
            Some(ToleranceSpec::Limits { upper, lower }) => format!(
                "{}{}/{}{}",
                self.kind.prefix(),
                format_value(self.value + upper.abs(), p),
                format_value(self.value - lower.abs(), p),
                self.kind.suffix()
            ),
        };
        self.shape.text_mut().content = self.label.clone();
    }

    fn format(&self, value: f64) -> String {
        format!(
            "{}{}{}",
            self.kind.prefix(),
            format_value(value, self.precision),
            self.kind.suffix()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::MeasureStyle;
    use crate::dimension::resolve_dimension;
    use crate::leader::{resolve_leader, LeaderMode};

    fn distance_measurement() -> Measurement {
        let p1 = Point2::new(0.0, 0.0);
        let p2 = Point2::new(100.0, 0.0);
        let placement = Point2::new(50.0, 20.0);
        let state = resolve_dimension(p1, p2, placement, 1.0, &MeasureStyle::default());
        Measurement::new(
            MeasurementKind::Distance,
            state.value,
            vec![p1, p2, placement],
            MeasurementShape::Dimension(state),
            3,
        )
    }

    #[test]
    fn test_tolerance_labels() {
        let mut m = distance_measurement();
        assert_eq!(m.label, "100.000");

        m.apply_tolerance(Some(ToleranceSpec::Symmetric(0.05)));
        assert_eq!(m.label, "100.000 ±0.050");
        assert_eq!(m.shape.text().content, "100.000 ±0.050");

        m.apply_tolerance(Some(ToleranceSpec::Deviation {
            upper: 0.1,
            lower: 0.05,
        }));
        assert_eq!(m.label, "100.000 +0.100/-0.050");

        m.apply_tolerance(Some(ToleranceSpec::Limits {
            upper: 0.1,
            lower: 0.05,
        }));
        assert_eq!(m.label, "100.100/99.950");

        m.apply_tolerance(None);
        assert_eq!(m.label, "100.000");
        assert_eq!(m.shape.text().content, "100.000");
    }

    #[test]
    fn test_radius_limits_keep_prefix() {
        let style = MeasureStyle::default();
        let state = resolve_leader(
            Point2::origin(),
            25.0,
            Point2::new(25.0, 0.0),
            Point2::new(40.0, 5.0),
            LeaderMode::Radius,
            1.0,
            &style,
        )
        .unwrap();
        let mut m = Measurement::new(
            MeasurementKind::Radius,
            state.value,
            vec![Point2::origin(), Point2::new(25.0, 0.0), Point2::new(40.0, 5.0)],
            MeasurementShape::Leader(state),
            3,
        );
        assert_eq!(m.label, "R25.000");
        m.apply_tolerance(Some(ToleranceSpec::Limits {
            upper: 0.1,
            lower: 0.05,
        }));
        assert_eq!(m.label, "R25.100/24.950");
    }

    #[test]
    fn test_area_label() {
        let text = TextLabel::new(Point2::origin(), "", 2.5, 0.0);
        let m = Measurement::new(
            MeasurementKind::Area,
            40.0,
            vec![Point2::origin()],
            MeasurementShape::Label(AreaLabel {
                perimeter: 40.0,
                area: Some(100.0),
                entity_count: 4,
                text,
            }),
            3,
        );
        assert_eq!(m.label, "L=40.000 A=100.000");
    }
}
