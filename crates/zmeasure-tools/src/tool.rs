//! 测量工具接口
//!
//! 每个测量工具是一个独立的状态机，按点击次数推进。
//! 工具只负责收集点和调用求解器；捕捉、回调和测量列表由 `ToolSession` 管理。

use crate::chain::ChainSelector;
use crate::error::ToolError;
use serde::{Deserialize, Serialize};
use zmeasure_core::angle::AngleState;
use zmeasure_core::annotation::MeasureStyle;
use zmeasure_core::dimension::DimensionState;
use zmeasure_core::entity::{Entity, ScaleContext};
use zmeasure_core::geometry::Geometry;
use zmeasure_core::leader::LeaderState;
use zmeasure_core::math::Point2;
use zmeasure_core::measurement::Measurement;

/// 工具类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    None,
    Distance,
    Angle,
    Radius,
    Diameter,
    Area,
}

impl ToolKind {
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::None => "None",
            ToolKind::Distance => "Distance",
            ToolKind::Angle => "Angle",
            ToolKind::Radius => "Radius",
            ToolKind::Diameter => "Diameter",
            ToolKind::Area => "Area",
        }
    }
}

/// 拾取结果：命中的实体 + 宿主解析好的比例
#[derive(Debug, Clone, Copy)]
pub struct PickHit<'a> {
    pub entity: &'a Entity,
    /// 多段线命中的线段序号（宿主可提供时）
    pub segment_index: Option<usize>,
    pub scale: ScaleContext,
}

impl<'a> PickHit<'a> {
    pub fn new(entity: &'a Entity) -> Self {
        Self {
            entity,
            segment_index: None,
            scale: ScaleContext::default(),
        }
    }

    pub fn with_segment(mut self, index: usize) -> Self {
        self.segment_index = Some(index);
        self
    }

    pub fn with_scale(mut self, scale: ScaleContext) -> Self {
        self.scale = scale;
        self
    }
}

/// 工具上下文 - 传递给工具的运行时信息
pub struct ToolContext<'a> {
    /// 有效点（捕捉后的坐标，无捕捉时为鼠标坐标）
    pub point: Point2,
    /// 鼠标世界坐标（未捕捉）
    pub mouse: Point2,
    /// 拾取结果，按拾取顺序排列
    pub hits: &'a [PickHit<'a>],
    pub style: &'a MeasureStyle,
    /// 面积工具的链选择协作者（可选）
    pub chain: Option<&'a dyn ChainSelector>,
}

impl<'a> ToolContext<'a> {
    /// 拾取顺序中的第一个命中
    pub fn first_hit(&self) -> Option<&PickHit<'a>> {
        self.hits.first()
    }
}

/// 预览几何体
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewGeometry {
    /// 参考线（虚线显示）
    Reference(Geometry),
    Dimension(DimensionState),
    Angle(AngleState),
    Leader(LeaderState),
}

/// 单次点击的处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum ToolStep {
    /// 点已收集，等待下一步
    Continue,
    /// 点击无效（未命中适用的实体），状态不变
    Ignored,
    /// 收集完成，生成测量
    Commit(Measurement),
    /// 当前步骤失败，工具已恢复到可继续的状态
    Rejected(ToolError),
}

/// 测量工具 trait
pub trait MeasureTool {
    fn tool_kind(&self) -> ToolKind;

    fn name(&self) -> &str {
        self.tool_kind().name()
    }

    /// 重置到第一步
    fn reset(&mut self);

    /// 点击事件
    fn on_click(&mut self, ctx: &ToolContext) -> ToolStep;

    /// 获取当前状态的提示文本
    fn get_prompt(&self) -> &str;

    /// 以当前点作为下一个点计算预览，不修改已收集的点
    fn get_preview(&self, ctx: &ToolContext) -> Vec<PreviewGeometry>;

    /// 已收集的点
    fn collected_points(&self) -> &[Point2];
}
