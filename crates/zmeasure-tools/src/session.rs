//! 测量工具会话
//!
//! 会话是宿主与测量工具之间的唯一入口：宿主把激活/取消/鼠标事件交给
//! `step`，会话负责捕捉、调用当前工具、转发状态提示并分发提交的测量。
//! 所有事件同步处理，粘滞捕捉在激活、取消、停用和每次提交后清空。

use crate::chain::ChainSelector;
use crate::config::MeasureConfig;
use crate::error::{ToolError, ToolResult};
use crate::tool::{MeasureTool, PickHit, PreviewGeometry, ToolContext, ToolKind, ToolStep};
use crate::tools::create_tool;
use tracing::{debug, info, warn};
use zmeasure_core::entity::Entity;
use zmeasure_core::math::Point2;
use zmeasure_core::measurement::{Measurement, MeasurementId, ToleranceSpec};
use zmeasure_core::snap::{SnapEngine, SnapPoint, SnapQuery};

/// 状态提示回调
pub type StatusCallback = Box<dyn FnMut(&str)>;
/// 测量提交回调
pub type CommitCallback = Box<dyn FnMut(Measurement)>;

/// 一次鼠标输入
#[derive(Debug, Clone, Copy)]
pub struct PointerInput<'a> {
    /// 鼠标的世界坐标
    pub world: Point2,
    /// 拾取结果，按拾取顺序排列
    pub hits: &'a [PickHit<'a>],
    /// 当前视图每像素对应的世界单位
    pub world_units_per_pixel: f64,
}

impl<'a> PointerInput<'a> {
    pub fn new(world: Point2, hits: &'a [PickHit<'a>], world_units_per_pixel: f64) -> Self {
        Self {
            world,
            hits,
            world_units_per_pixel,
        }
    }

    /// 没有拾取结果的输入
    pub fn at(world: Point2) -> Self {
        Self::new(world, &[], 1.0)
    }
}

/// 会话事件
#[derive(Debug, Clone, Copy)]
pub enum SessionEvent<'a> {
    Activate(ToolKind),
    Deactivate,
    Cancel,
    PointerMove(PointerInput<'a>),
    Click(PointerInput<'a>),
}

/// 事件处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// 状态已更新，没有需要显示的内容
    Continue,
    /// 鼠标移动产生的预览
    Preview(Vec<PreviewGeometry>),
    /// 完成一次测量
    Committed(Measurement),
    /// 当前步骤失败，会话仍可继续
    Rejected(ToolError),
}

/// 测量工具会话
pub struct ToolSession {
    config: MeasureConfig,
    tool: Option<Box<dyn MeasureTool>>,
    snap: Option<SnapEngine>,
    chain: Option<Box<dyn ChainSelector>>,
    on_status: Option<StatusCallback>,
    on_committed: Option<CommitCallback>,
    /// 未接入提交回调时由会话自己保存测量
    measurements: Vec<Measurement>,
    next_id: u64,
}

impl ToolSession {
    pub fn new(config: MeasureConfig) -> Self {
        Self {
            config,
            tool: None,
            snap: None,
            chain: None,
            on_status: None,
            on_committed: None,
            measurements: Vec::new(),
            next_id: 1,
        }
    }

    /// 启用对象捕捉（使用配置中的捕捉设置）
    pub fn with_snapping(mut self) -> Self {
        self.snap = Some(SnapEngine::new(self.config.snap.clone()));
        self
    }

    pub fn with_chain_selector(mut self, selector: Box<dyn ChainSelector>) -> Self {
        self.chain = Some(selector);
        self
    }

    pub fn set_status_callback(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on_status = Some(Box::new(callback));
    }

    pub fn set_commit_callback(&mut self, callback: impl FnMut(Measurement) + 'static) {
        self.on_committed = Some(Box::new(callback));
    }

    pub fn active_tool(&self) -> ToolKind {
        self.tool.as_ref().map_or(ToolKind::None, |t| t.tool_kind())
    }

    /// 当前提示文本
    pub fn prompt(&self) -> Option<&str> {
        self.tool.as_ref().map(|t| t.get_prompt())
    }

    pub fn collected_points(&self) -> &[Point2] {
        match self.tool.as_ref() {
            Some(tool) => tool.collected_points(),
            None => &[],
        }
    }

    pub fn snap_engine(&self) -> Option<&SnapEngine> {
        self.snap.as_ref()
    }

    /// 会话自己保存的测量（接入提交回调后始终为空）
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// 事件处理的唯一入口
    pub fn step(&mut self, event: SessionEvent) -> StepOutcome {
        match event {
            SessionEvent::Activate(kind) => {
                self.activate(kind);
                StepOutcome::Continue
            }
            SessionEvent::Deactivate => {
                self.deactivate();
                StepOutcome::Continue
            }
            SessionEvent::Cancel => {
                self.cancel();
                StepOutcome::Continue
            }
            SessionEvent::PointerMove(input) => StepOutcome::Preview(self.pointer_move(&input)),
            SessionEvent::Click(input) => self.click(&input),
        }
    }

    /// 激活工具，回到第一步
    pub fn activate(&mut self, kind: ToolKind) {
        self.clear_sticky();
        self.tool = create_tool(kind);
        match self.tool.as_ref() {
            Some(tool) => {
                info!("激活测量工具: {}", tool.name());
                let prompt = tool.get_prompt().to_string();
                self.emit_status(&prompt);
            }
            None => debug!("停用测量工具"),
        }
    }

    /// 停用当前工具，清除所有临时状态
    pub fn deactivate(&mut self) {
        if let Some(tool) = self.tool.take() {
            info!("停用测量工具: {}", tool.name());
        }
        self.clear_sticky();
    }

    /// 取消当前测量；工具保持激活并重新提示第一步
    pub fn cancel(&mut self) {
        let kind = self.active_tool();
        self.clear_sticky();
        if kind != ToolKind::None {
            debug!("取消测量");
            self.activate(kind);
        }
    }

    /// 鼠标移动：计算预览，不修改已收集的点
    pub fn pointer_move(&mut self, input: &PointerInput) -> Vec<PreviewGeometry> {
        if self.tool.is_none() {
            return Vec::new();
        }
        let point = self.resolve_point(input);
        let Some(tool) = self.tool.as_ref() else {
            return Vec::new();
        };
        let ctx = ToolContext {
            point,
            mouse: input.world,
            hits: input.hits,
            style: &self.config.style,
            chain: self.chain.as_deref(),
        };
        tool.get_preview(&ctx)
    }

    /// 鼠标点击
    pub fn click(&mut self, input: &PointerInput) -> StepOutcome {
        if self.tool.is_none() {
            debug!("没有激活的测量工具，忽略点击");
            return StepOutcome::Continue;
        }
        let point = self.resolve_point(input);
        let Some(tool) = self.tool.as_mut() else {
            return StepOutcome::Continue;
        };
        let ctx = ToolContext {
            point,
            mouse: input.world,
            hits: input.hits,
            style: &self.config.style,
            chain: self.chain.as_deref(),
        };
        let step = tool.on_click(&ctx);
        let prompt = tool.get_prompt().to_string();

        match step {
            ToolStep::Continue => {
                self.emit_status(&prompt);
                StepOutcome::Continue
            }
            ToolStep::Ignored => {
                debug!("点击未命中适用的对象: ({:.3}, {:.3})", point.x, point.y);
                StepOutcome::Continue
            }
            ToolStep::Rejected(err) => {
                warn!("测量步骤失败: {}", err);
                self.emit_status(&err.to_string());
                StepOutcome::Rejected(err)
            }
            ToolStep::Commit(measurement) => {
                let measurement = measurement.with_id(MeasurementId(self.next_id));
                self.next_id += 1;
                info!(
                    "完成{}测量 {}: {}",
                    measurement.kind.name(),
                    measurement.id,
                    measurement.label
                );
                self.clear_sticky();
                self.emit_status(&format!("{}: {}", measurement.kind.name(), measurement.label));
                self.emit_status(&prompt);
                self.dispatch(measurement.clone());
                StepOutcome::Committed(measurement)
            }
        }
    }

    /// 更新会话自己保存的测量的公差
    pub fn update_tolerance(
        &mut self,
        id: MeasurementId,
        tolerance: Option<ToleranceSpec>,
    ) -> ToolResult<&Measurement> {
        let measurement = self
            .measurements
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(ToolError::UnknownMeasurement(id))?;
        measurement.apply_tolerance(tolerance);
        debug!("更新公差 {}: {}", id, measurement.label);
        Ok(measurement)
    }

    fn resolve_point(&mut self, input: &PointerInput) -> Point2 {
        let reference_point = self.collected_points().last().copied();
        let Some(engine) = self.snap.as_mut() else {
            return input.world;
        };
        let entities: Vec<&Entity> = input.hits.iter().map(|h| h.entity).collect();
        let query = SnapQuery {
            pointer: input.world,
            hits: &entities,
            world_units_per_pixel: input.world_units_per_pixel,
            reference_point,
        };
        engine
            .find_snap(&query)
            .map(|snap: SnapPoint| snap.point)
            .unwrap_or(input.world)
    }

    fn clear_sticky(&mut self) {
        if let Some(engine) = self.snap.as_mut() {
            engine.clear_sticky();
        }
    }

    fn emit_status(&mut self, message: &str) {
        if let Some(callback) = self.on_status.as_mut() {
            callback(message);
        }
    }

    fn dispatch(&mut self, measurement: Measurement) {
        match self.on_committed.as_mut() {
            Some(callback) => callback(measurement),
            None => self.measurements.push(measurement),
        }
    }
}

impl Default for ToolSession {
    fn default() -> Self {
        Self::new(MeasureConfig::default())
    }
}
