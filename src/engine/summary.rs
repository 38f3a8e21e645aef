// ==========================================
// 成型产线产能系统 - 工厂看板汇总
// ==========================================
// 职责: 由两段计算结果派生看板指标
// - 一段/二段/全厂告警
// - 一段负荷汇总与利用率
// - 包装/循环工人数向上取整
// - 二段分产品产量及占比
// ==========================================

use crate::domain::capacity::utilization_pct;
use crate::domain::line::Line;
use crate::domain::machine::Machine;
use crate::domain::product::Product;
use crate::domain::types::ProductionStage;
use crate::engine::product_index;
use crate::engine::stage1::Stage1Result;
use crate::engine::stage2::Stage2Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 汇总负荷 (多条线相加)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedLoad {
    pub load: f64,
    pub limit: f64,
    pub utilization_pct: f64, // 封顶 100
}

impl AggregatedLoad {
    fn new(load: f64, limit: f64) -> Self {
        Self {
            load,
            limit,
            utilization_pct: utilization_pct(load, limit),
        }
    }
}

/// 单产品二段产量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelProduction {
    pub product_id: String,
    pub name: String,
    pub pieces_per_hour: f64,
    pub share_pct: f64, // 占二段总产量百分比
}

/// 工厂看板汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorySummary {
    pub stage1_alert: bool,
    pub stage2_alert: bool,
    pub factory_alert: bool,
    pub stage1_oven: AggregatedLoad,
    pub stage1_drying: AggregatedLoad,
    pub packaging_headcount: u32,
    pub supply_headcount: u32,
    pub production_by_model: Vec<ModelProduction>,
}

impl FactorySummary {
    /// 由计算结果和快照派生看板汇总
    pub fn from_results(
        stage1: &Stage1Result,
        stage2: &Stage2Result,
        machines: &[Machine],
        products: &[Product],
        lines: &[Line],
    ) -> Self {
        let stage1_alert = stage1.lines.iter().any(|l| l.is_over());
        let stage2_alert = stage2.groups.iter().any(|g| g.cart_overload);

        let oven_load: f64 = stage1.lines.iter().map(|l| l.oven.load).sum();
        let oven_limit: f64 = stage1.lines.iter().map(|l| l.oven.limit).sum();
        let drying_load: f64 = stage1.lines.iter().map(|l| l.drying.load).sum();
        let drying_limit: f64 = stage1.lines.iter().map(|l| l.drying.limit).sum();

        Self {
            stage1_alert,
            stage2_alert,
            factory_alert: stage1_alert || stage2_alert,
            stage1_oven: AggregatedLoad::new(oven_load, oven_limit),
            stage1_drying: AggregatedLoad::new(drying_load, drying_limit),
            packaging_headcount: headcount(stage2.total_packaging_people),
            supply_headcount: headcount(stage2.total_supply_people),
            production_by_model: production_by_model(
                machines,
                products,
                lines,
                stage2.total_pieces_per_hour,
            ),
        }
    }
}

/// 人数向上取整到整人
pub fn headcount(people: f64) -> u32 {
    if !people.is_finite() || people <= 0.0 {
        return 0;
    }
    people.ceil() as u32
}

/// 二段分产品产量 (启用 + 已分配产品 + 计产量), 按产量降序
pub fn production_by_model(
    machines: &[Machine],
    products: &[Product],
    lines: &[Line],
    stage2_total: f64,
) -> Vec<ModelProduction> {
    let catalog = product_index(products);
    let forming_lines: HashSet<&str> = lines
        .iter()
        .filter(|l| l.stage == ProductionStage::Forming)
        .map(|l| l.id.as_str())
        .collect();

    // 保持首次出现顺序, 便于同产量时稳定排序
    let mut totals: Vec<ModelProduction> = Vec::new();
    for machine in machines {
        if !forming_lines.contains(machine.line_id.as_str())
            || !machine.is_running()
            || !machine.counts_production()
        {
            continue;
        }
        let Some(product) = machine.product_id.as_deref().and_then(|id| catalog.get(id)) else {
            continue;
        };

        let pieces = product.stage2_target * machine.scale();
        match totals.iter_mut().find(|t| t.product_id == product.id) {
            Some(entry) => entry.pieces_per_hour += pieces,
            None => totals.push(ModelProduction {
                product_id: product.id.clone(),
                name: product.name.clone(),
                pieces_per_hour: pieces,
                share_pct: 0.0,
            }),
        }
    }

    for entry in totals.iter_mut() {
        entry.share_pct = if stage2_total > 0.0 {
            entry.pieces_per_hour / stage2_total * 100.0
        } else {
            0.0
        };
    }

    totals.sort_by(|a, b| b.pieces_per_hour.total_cmp(&a.pieces_per_hour));
    totals
}
