// ==========================================
// 成型产线产能系统 - 二段 (成型) 负荷引擎
// ==========================================
// 输入: 机台 + 产品目录 + 产线拓扑 + 操作工组
// 输出: 每组小车/烘炉负荷与能力 + 全厂包装/循环工人数
// ==========================================
// 规则 (逐组 → 逐线 → 逐台运行机台):
// 1) 有效目标 = stage2_target × 生产比例
// 2) 所需托盘 = 有效目标 × 1.10 / 每托盘件数 (10% 损耗, 与是否计产量无关)
// 3) 所需托盘总是计入全厂二段托盘数
// 4) 计产量时: 有效目标计入组产量; 包装系数非零时 系数×比例 计入包装人数
// 5) 按供料方式分配: 经小车 → 小车负荷 + 循环托盘; 经烘炉 → 烘炉负荷; 托盘化 → 不计
// 6) 小车能力 = 300 (有小车工) + 300 (有烘炉工且烘炉慢速, 标记 boosted)
// 7) 超限判定: 原始小车负荷 > 小车能力
// ==========================================

use crate::config::CapacityLimits;
use crate::domain::capacity::{round_display, CapacityConstraint};
use crate::domain::line::Line;
use crate::domain::machine::Machine;
use crate::domain::operator::OperatorGroup;
use crate::domain::product::Product;
use crate::domain::types::{OvenSpeed, Stage2SupplyType};
use crate::engine::product_index;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::instrument;

/// 操作工组负荷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupLoad {
    pub group_id: String,
    pub cart_load: f64,     // 托盘/小时 (取整)
    pub oven_load: f64,     // 托盘/小时 (取整)
    pub cart_capacity: f64, // 托盘/小时
    pub cart_overload: bool,
    pub total_pieces: f64, // 件/小时
    pub is_boosted: bool,  // 烘炉工协助小车
}

impl CapacityConstraint for GroupLoad {
    fn current_load(&self) -> f64 {
        self.cart_load
    }

    fn capacity(&self) -> f64 {
        self.cart_capacity
    }

    fn is_overloaded(&self) -> bool {
        self.cart_overload
    }
}

/// 二段计算结果
///
/// 人数与托盘合计均不取整 (向上取整到整人属于展示层)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage2Result {
    pub total_pieces_per_hour: f64,
    pub total_packaging_people: f64,
    pub total_supply_people: f64,
    pub total_stage2_trays: f64,
    pub total_supply_trays: f64,
    pub groups: Vec<GroupLoad>,
}

impl Stage2Result {
    pub fn group(&self, group_id: &str) -> Option<&GroupLoad> {
        self.groups.iter().find(|g| g.group_id == group_id)
    }
}

/// 单组累计量 (原始值)
#[derive(Debug, Default)]
struct GroupAccumulator {
    cart_load: f64,
    oven_load: f64,
    total_pieces: f64,
}

// ==========================================
// Stage2Engine - 二段负荷引擎
// ==========================================
pub struct Stage2Engine {
    limits: CapacityLimits,
}

impl Stage2Engine {
    pub fn new() -> Self {
        Self::with_limits(CapacityLimits::default())
    }

    pub fn with_limits(limits: CapacityLimits) -> Self {
        Self { limits }
    }

    /// 计算二段负荷
    ///
    /// # 参数
    /// - `machines`: 全部机台
    /// - `products`: 产品目录
    /// - `lines`: 产线拓扑 (组内引用不存在的产线时跳过)
    /// - `operator_groups`: 操作工组 (结果按此顺序输出)
    #[instrument(skip_all, fields(machines = machines.len(), groups = operator_groups.len()))]
    pub fn compute(
        &self,
        machines: &[Machine],
        products: &[Product],
        lines: &[Line],
        operator_groups: &[OperatorGroup],
    ) -> Stage2Result {
        let catalog = product_index(products);
        let topology: HashMap<&str, &Line> = lines.iter().map(|l| (l.id.as_str(), l)).collect();

        let mut grand_total_pieces = 0.0;
        let mut total_packaging_people = 0.0;
        let mut total_stage2_trays = 0.0;
        let mut total_supply_trays = 0.0;
        let mut groups = Vec::with_capacity(operator_groups.len());

        for group in operator_groups {
            let mut acc = GroupAccumulator::default();

            for line_id in &group.line_ids {
                let Some(line) = topology.get(line_id.as_str()) else {
                    tracing::debug!(group_id = %group.id, line_id = %line_id, "产线不存在, 跳过");
                    continue;
                };

                for machine in machines.iter().filter(|m| &m.line_id == line_id && m.is_running()) {
                    let Some(product_id) = machine.product_id.as_deref() else {
                        continue;
                    };
                    let Some(product) = catalog.get(product_id) else {
                        tracing::debug!(machine_id = %machine.id, product_id, "产品不存在, 跳过");
                        continue;
                    };

                    let scale = machine.scale();
                    let effective_target = product.stage2_target * scale;
                    let required_trays = (effective_target * self.limits.tray_waste_factor)
                        / f64::from(product.pieces_per_tray);

                    total_stage2_trays += required_trays;

                    if machine.counts_production() {
                        acc.total_pieces += effective_target;
                        if product.packaging_factor != 0.0 {
                            total_packaging_people += product.packaging_factor * scale;
                        }
                    }

                    match machine.stage2_supply_type {
                        Some(Stage2SupplyType::ViaCart) => {
                            acc.cart_load += required_trays;
                            total_supply_trays += required_trays;
                        }
                        Some(Stage2SupplyType::ViaOven) => {
                            // 无烘炉产线同样计入烘炉负荷
                            if !line.has_oven() {
                                tracing::trace!(machine_id = %machine.id, "无烘炉产线选择经烘炉供料");
                            }
                            acc.oven_load += required_trays;
                        }
                        Some(Stage2SupplyType::Palletized) | None => {}
                    }
                }
            }

            grand_total_pieces += acc.total_pieces;
            groups.push(self.evaluate_group(group, acc));
        }

        Stage2Result {
            total_pieces_per_hour: grand_total_pieces,
            total_packaging_people,
            total_supply_people: total_supply_trays / self.limits.supply_operator_capacity,
            total_stage2_trays,
            total_supply_trays,
            groups,
        }
    }

    /// 计算小车能力与超限状态
    fn evaluate_group(&self, group: &OperatorGroup, acc: GroupAccumulator) -> GroupLoad {
        let (cart_capacity, is_boosted) = self.cart_capacity(group);
        let cart_overload = acc.cart_load > cart_capacity;

        if cart_overload {
            tracing::debug!(
                group_id = %group.id,
                cart_load = acc.cart_load,
                cart_capacity,
                "小车负荷超限"
            );
        }

        GroupLoad {
            group_id: group.id.clone(),
            cart_load: round_display(acc.cart_load),
            oven_load: round_display(acc.oven_load),
            cart_capacity,
            cart_overload,
            total_pieces: acc.total_pieces,
            is_boosted,
        }
    }

    /// 小车能力 (托盘/小时) 及是否有烘炉工加成
    pub fn cart_capacity(&self, group: &OperatorGroup) -> (f64, bool) {
        let mut capacity = if group.has_cart_operator {
            self.limits.cart_operator_max
        } else {
            0.0
        };

        let is_boosted = group.has_oven_operator && group.oven_speed == OvenSpeed::Slow;
        if is_boosted {
            capacity += self.limits.oven_operator_help;
        }
        (capacity, is_boosted)
    }
}

impl Default for Stage2Engine {
    fn default() -> Self {
        Self::new()
    }
}
