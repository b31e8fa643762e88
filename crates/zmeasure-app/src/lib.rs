//! ZCAD 测量无界面宿主
//!
//! 从 JSON 脚本读取图元和一串交互事件，用简单的距离判定代替拾取射线，
//! 驱动 `ToolSession` 回放，并收集状态提示与测量结果。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;
use tracing::{info, warn};

use zmeasure_core::entity::{Entity, EntityId, ScaleContext};
use zmeasure_core::math::Point2;
use zmeasure_core::measurement::{Measurement, MeasurementId, ToleranceSpec};
use zmeasure_tools::chain::EndpointChainSelector;
use zmeasure_tools::config::MeasureConfig;
use zmeasure_tools::session::{PointerInput, SessionEvent, StepOutcome, ToolSession};
use zmeasure_tools::tool::{PickHit, ToolKind};

fn default_true() -> bool {
    true
}

fn default_units_per_pixel() -> f64 {
    1.0
}

/// 实体的比例上下文
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaleEntry {
    pub entity: EntityId,
    pub scale: f64,
}

/// 脚本事件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    Activate {
        tool: ToolKind,
    },
    Deactivate,
    Cancel,
    Move {
        x: f64,
        y: f64,
    },
    Click {
        x: f64,
        y: f64,
        /// 命中多段线时的线段序号
        #[serde(default)]
        segment: Option<usize>,
    },
    Tolerance {
        measurement: u64,
        tolerance: Option<ToleranceSpec>,
    },
}

/// 回放脚本
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub config: MeasureConfig,
    #[serde(default = "default_true")]
    pub snapping: bool,
    #[serde(default = "default_units_per_pixel")]
    pub world_units_per_pixel: f64,
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub scales: Vec<ScaleEntry>,
    pub events: Vec<ScriptEvent>,
}

impl Script {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse script")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        Self::from_json_str(&content)
    }
}

/// 回放结果
#[derive(Debug, Default, Serialize)]
pub struct ScriptReport {
    pub statuses: Vec<String>,
    pub measurements: Vec<Measurement>,
    pub rejected: usize,
}

/// 按距离拾取：包围盒粗筛后，容差内的实体按距离从近到远排列
pub fn pick<'a>(
    entities: &'a [Entity],
    scales: &HashMap<EntityId, ScaleContext>,
    point: Point2,
    tolerance: f64,
    segment: Option<usize>,
) -> Vec<PickHit<'a>> {
    let mut hits: Vec<(f64, PickHit<'a>)> = entities
        .iter()
        .filter_map(|entity| {
            let geometry = entity.world_geometry();
            // 先用扩展后的包围盒粗筛
            if !geometry.bounding_box().inflate(tolerance).contains(&point) {
                return None;
            }
            let distance = geometry.distance_to_point(&point);
            if distance > tolerance {
                return None;
            }
            let mut hit = PickHit::new(entity)
                .with_scale(scales.get(&entity.id).copied().unwrap_or_default());
            if let Some(index) = segment {
                hit = hit.with_segment(index);
            }
            Some((distance, hit))
        })
        .collect();
    // sort_by 是稳定排序，距离相同时保持图元顺序
    hits.sort_by(|a, b| a.0.total_cmp(&b.0));
    hits.into_iter().map(|(_, hit)| hit).collect()
}

/// 回放脚本
pub fn run_script(script: &Script) -> ScriptReport {
    let statuses = Rc::new(RefCell::new(Vec::new()));

    let mut session = ToolSession::new(script.config.clone())
        .with_chain_selector(Box::new(EndpointChainSelector::new(script.entities.clone())));
    if script.snapping {
        session = session.with_snapping();
    }
    let sink = Rc::clone(&statuses);
    session.set_status_callback(move |message| {
        info!("{}", message);
        sink.borrow_mut().push(message.to_string());
    });

    let scales: HashMap<EntityId, ScaleContext> = script
        .scales
        .iter()
        .map(|s| (s.entity, ScaleContext::new(s.scale)))
        .collect();
    let wupp = script.world_units_per_pixel;
    let tolerance = script.config.snap.tolerance * wupp;
    let mut rejected = 0;

    for event in &script.events {
        match event {
            ScriptEvent::Activate { tool } => {
                session.step(SessionEvent::Activate(*tool));
            }
            ScriptEvent::Deactivate => {
                session.step(SessionEvent::Deactivate);
            }
            ScriptEvent::Cancel => {
                session.step(SessionEvent::Cancel);
            }
            ScriptEvent::Move { x, y } => {
                let point = Point2::new(*x, *y);
                let hits = pick(&script.entities, &scales, point, tolerance, None);
                session.step(SessionEvent::PointerMove(PointerInput::new(point, &hits, wupp)));
            }
            ScriptEvent::Click { x, y, segment } => {
                let point = Point2::new(*x, *y);
                let hits = pick(&script.entities, &scales, point, tolerance, *segment);
                let outcome = session.step(SessionEvent::Click(PointerInput::new(point, &hits, wupp)));
                if let StepOutcome::Rejected(_) = outcome {
                    rejected += 1;
                }
            }
            ScriptEvent::Tolerance {
                measurement,
                tolerance,
            } => {
                if let Err(e) = session.update_tolerance(MeasurementId(*measurement), *tolerance) {
                    warn!("{}", e);
                }
            }
        }
    }

    let statuses = statuses.borrow().clone();
    ScriptReport {
        statuses,
        measurements: session.measurements().to_vec(),
        rejected,
    }
}
