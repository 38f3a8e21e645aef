// ==========================================
// 成型产线产能系统 - 一段 (吸浆) 负荷引擎
// ==========================================
// 输入: 机台 + 产品目录 + 一段产线ID
// 输出: 每条线烘炉/自然干燥负荷 + 全厂一段产量
// ==========================================
// 规则:
// 1) 只统计启用且已分配产品的机台
// 2) 产量/托盘数总是计入产线合计 (不论是否上输送线)
// 3) 操作工负荷只统计上输送线的机台, 按去向分桶
// 4) 每条线独立比较限值, 不跨线共享能力
// ==========================================

use crate::config::CapacityLimits;
use crate::domain::capacity::{round_display, LoadGauge};
use crate::domain::machine::Machine;
use crate::domain::product::Product;
use crate::domain::types::Stage1Destination;
use crate::engine::product_index;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// 一段单线结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage1LineResult {
    pub line_id: String,
    pub oven: LoadGauge,
    pub drying: LoadGauge,
    pub line_total_pieces: f64, // 件/小时
    pub line_total_trays: f64,  // 托盘/小时 (取整)
}

impl Stage1LineResult {
    pub fn is_over(&self) -> bool {
        self.oven.is_over || self.drying.is_over
    }
}

/// 一段计算结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage1Result {
    pub total_pieces_per_hour: f64,
    pub lines: Vec<Stage1LineResult>,
}

impl Stage1Result {
    pub fn line(&self, line_id: &str) -> Option<&Stage1LineResult> {
        self.lines.iter().find(|l| l.line_id == line_id)
    }
}

// ==========================================
// Stage1Engine - 一段负荷引擎
// ==========================================
pub struct Stage1Engine {
    limits: CapacityLimits,
}

impl Stage1Engine {
    pub fn new() -> Self {
        Self::with_limits(CapacityLimits::default())
    }

    pub fn with_limits(limits: CapacityLimits) -> Self {
        Self { limits }
    }

    /// 计算一段负荷
    ///
    /// # 参数
    /// - `machines`: 全部机台 (按 line_id 过滤)
    /// - `products`: 产品目录
    /// - `line_ids`: 一段产线ID (结果按此顺序输出)
    #[instrument(skip_all, fields(machines = machines.len(), lines = line_ids.len()))]
    pub fn compute(
        &self,
        machines: &[Machine],
        products: &[Product],
        line_ids: &[String],
    ) -> Stage1Result {
        let catalog = product_index(products);
        let mut total_pieces = 0.0;
        let mut lines = Vec::with_capacity(line_ids.len());

        for line_id in line_ids {
            let mut line_pieces = 0.0;
            let mut line_trays = 0.0;
            let mut oven_load = 0.0;
            let mut drying_load = 0.0;

            for machine in machines.iter().filter(|m| &m.line_id == line_id && m.is_running()) {
                let Some(product_id) = machine.product_id.as_deref() else {
                    continue;
                };
                let Some(product) = catalog.get(product_id) else {
                    tracing::debug!(machine_id = %machine.id, product_id, "产品不存在, 跳过");
                    continue;
                };

                let trays = product.stage1_trays_per_hour();
                line_pieces += product.stage1_rate;
                line_trays += trays;

                if machine.on_conveyor() {
                    match machine.destination() {
                        Stage1Destination::Oven => oven_load += trays,
                        Stage1Destination::NaturalDry => drying_load += trays,
                    }
                }
            }

            total_pieces += line_pieces;

            let result = Stage1LineResult {
                line_id: line_id.clone(),
                oven: LoadGauge::from_raw(oven_load, self.limits.stage1_oven_limit),
                drying: LoadGauge::from_raw(drying_load, self.limits.stage1_drying_limit),
                line_total_pieces: line_pieces,
                line_total_trays: round_display(line_trays),
            };

            if result.is_over() {
                tracing::debug!(
                    line_id = %line_id,
                    oven_load,
                    drying_load,
                    "一段产线负荷超限"
                );
            }
            lines.push(result);
        }

        Stage1Result {
            total_pieces_per_hour: total_pieces,
            lines,
        }
    }
}

impl Default for Stage1Engine {
    fn default() -> Self {
        Self::new()
    }
}
