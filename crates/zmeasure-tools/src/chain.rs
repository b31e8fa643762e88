//! 链选择
//!
//! 面积工具点击一个实体后，需要找到与它首尾相连的整条链来计算周长。
//! 链的查找交给宿主可替换的 `ChainSelector`。

use tracing::debug;
use zmeasure_core::entity::{Entity, EntityId};
use zmeasure_core::geometry::Geometry;
use zmeasure_core::math::Point2;

/// 链选择协作者
pub trait ChainSelector {
    /// 返回从种子实体出发的连通链（世界坐标几何，种子在首位）
    fn select_chain(&self, seed: &Entity) -> Vec<Geometry>;
}

/// 按端点重合查找连通链
///
/// 圆和闭合多段线自成一条链；开放曲线之间只要有端点距离在容差内即视为相连。
pub struct EndpointChainSelector {
    entities: Vec<Entity>,
    tolerance: f64,
}

impl EndpointChainSelector {
    pub const DEFAULT_TOLERANCE: f64 = 1e-6;

    pub fn new(entities: Vec<Entity>) -> Self {
        Self {
            entities,
            tolerance: Self::DEFAULT_TOLERANCE,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    fn touches(&self, a: (Point2, Point2), b: (Point2, Point2)) -> bool {
        [a.0, a.1]
            .iter()
            .any(|p| [b.0, b.1].iter().any(|q| (*p - *q).norm() <= self.tolerance))
    }
}

impl ChainSelector for EndpointChainSelector {
    fn select_chain(&self, seed: &Entity) -> Vec<Geometry> {
        let seed_geometry = seed.world_geometry();
        let Some(seed_ends) = seed_geometry.open_endpoints() else {
            return vec![seed_geometry];
        };

        // 候选：除种子外所有开放曲线
        let candidates: Vec<(EntityId, Geometry, (Point2, Point2))> = self
            .entities
            .iter()
            .filter(|e| e.id != seed.id)
            .filter_map(|e| {
                let g = e.world_geometry();
                g.open_endpoints().map(|ends| (e.id, g, ends))
            })
            .collect();

        let mut visited = vec![false; candidates.len()];
        let mut frontier = vec![seed_ends];
        let mut chain = vec![seed_geometry];

        while let Some(ends) = frontier.pop() {
            for (i, (_, geometry, other)) in candidates.iter().enumerate() {
                if !visited[i] && self.touches(ends, *other) {
                    visited[i] = true;
                    frontier.push(*other);
                    chain.push(geometry.clone());
                }
            }
        }

        debug!("链选择: 种子 {} 连通 {} 个实体", seed.id, chain.len());
        chain
    }
}
