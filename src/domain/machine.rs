// ==========================================
// 成型产线产能系统 - 机台
// ==========================================
// 机台按拓扑一次生成 (每线 4 台), 会话内只改可变字段
// 可选字段缺省语义:
// - stage1_destination 缺省 => 烘炉
// - is_on_conveyor 缺省 => 不上输送线
// - stage2_supply_type 缺省 => 不计入任何操作工
// - count_production 缺省 => 计入 (仅显式 false 排除)
// - production_scale 缺省 => 100%
// ==========================================

use crate::domain::line::Line;
use crate::domain::types::{ProductionScale, ProductionStage, Stage1Destination, Stage2SupplyType};
use serde::{Deserialize, Serialize};

/// 每条产线的机台数
pub const MACHINES_PER_LINE: u32 = 4;

/// 机台
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    pub id: String,
    pub line_id: String,
    pub machine_index: u32,
    pub is_active: bool,
    #[serde(default)]
    pub product_id: Option<String>, // None 表示空闲

    // ===== 一段 =====
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage1_destination: Option<Stage1Destination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_on_conveyor: Option<bool>,

    // ===== 二段 =====
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage2_supply_type: Option<Stage2SupplyType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count_production: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_scale: Option<ProductionScale>,
}

impl Machine {
    /// 是否在运行 (启用且已分配产品)
    pub fn is_running(&self) -> bool {
        self.is_active && self.product_id.is_some()
    }

    pub fn destination(&self) -> Stage1Destination {
        self.stage1_destination.unwrap_or(Stage1Destination::Oven)
    }

    pub fn on_conveyor(&self) -> bool {
        self.is_on_conveyor.unwrap_or(false)
    }

    /// 只有显式 false 才不计产量
    pub fn counts_production(&self) -> bool {
        self.count_production != Some(false)
    }

    pub fn scale(&self) -> f64 {
        self.production_scale.unwrap_or_default().factor()
    }
}

/// 按拓扑生成机台
///
/// 一段默认: 去烘炉, M4 不上输送线
/// 二段默认: 经小车供料, 计产量, 100%
pub fn generate_machines(lines: &[Line]) -> Vec<Machine> {
    let mut machines = Vec::with_capacity(lines.len() * MACHINES_PER_LINE as usize);

    for line in lines {
        for i in 1..=MACHINES_PER_LINE {
            let mut machine = Machine {
                id: format!("{}-M{}", line.id, i),
                line_id: line.id.clone(),
                machine_index: i,
                is_active: true,
                product_id: None,
                stage1_destination: None,
                is_on_conveyor: None,
                stage2_supply_type: None,
                count_production: None,
                production_scale: None,
            };

            match line.stage {
                ProductionStage::Suction => {
                    machine.stage1_destination = Some(Stage1Destination::Oven);
                    machine.is_on_conveyor = Some(i != 4);
                }
                ProductionStage::Forming => {
                    machine.stage2_supply_type = Some(Stage2SupplyType::ViaCart);
                    machine.count_production = Some(true);
                    machine.production_scale = Some(ProductionScale::Full);
                }
            }

            machines.push(machine);
        }
    }

    machines
}
