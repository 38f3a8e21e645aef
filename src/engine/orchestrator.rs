// ==========================================
// 成型产线产能系统 - 引擎编排器
// ==========================================
// 用途: 对一个快照依次执行一段、二段引擎并派生看板汇总
// 每次都从零全量计算, 不保留任何状态
// ==========================================

use crate::config::CapacityLimits;
use crate::domain::line::{stage_one_line_ids, Line};
use crate::domain::snapshot::FactorySnapshot;
use crate::engine::stage1::{Stage1Engine, Stage1Result};
use crate::engine::stage2::{Stage2Engine, Stage2Result};
use crate::engine::summary::FactorySummary;
use serde::{Deserialize, Serialize};

/// 全量计算结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactoryCalculations {
    pub stage1: Stage1Result,
    pub stage2: Stage2Result,
    pub summary: FactorySummary,
}

// ==========================================
// CapacityOrchestrator
// ==========================================
pub struct CapacityOrchestrator {
    stage1: Stage1Engine,
    stage2: Stage2Engine,
}

impl CapacityOrchestrator {
    pub fn new() -> Self {
        Self::with_limits(CapacityLimits::default())
    }

    pub fn with_limits(limits: CapacityLimits) -> Self {
        Self {
            stage1: Stage1Engine::with_limits(limits),
            stage2: Stage2Engine::with_limits(limits),
        }
    }

    /// 对快照执行全量计算
    pub fn calculate(&self, snapshot: &FactorySnapshot, lines: &[Line]) -> FactoryCalculations {
        let stage1 = self.stage1.compute(
            &snapshot.machines,
            &snapshot.products,
            &stage_one_line_ids(lines),
        );
        let stage2 = self.stage2.compute(
            &snapshot.machines,
            &snapshot.products,
            lines,
            &snapshot.operator_groups,
        );
        let summary = FactorySummary::from_results(
            &stage1,
            &stage2,
            &snapshot.machines,
            &snapshot.products,
            lines,
        );

        tracing::debug!(
            stage1_pieces = stage1.total_pieces_per_hour,
            stage2_pieces = stage2.total_pieces_per_hour,
            factory_alert = summary.factory_alert,
            "全量计算完成"
        );

        FactoryCalculations {
            stage1,
            stage2,
            summary,
        }
    }
}

impl Default for CapacityOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}
