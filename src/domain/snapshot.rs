// ==========================================
// 成型产线产能系统 - 工厂快照
// ==========================================
// 引擎输入: 产品目录 + 机台 + 操作工组 (按值传入, 引擎不持有)
// 交换格式: products / machines / operatorGroups 三个数组 + 可选 timestamp
// ==========================================

use crate::domain::line::factory_lines;
use crate::domain::machine::{generate_machines, Machine};
use crate::domain::operator::{default_operator_groups, OperatorGroup};
use crate::domain::product::{initial_products, Product};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 工厂快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorySnapshot {
    pub products: Vec<Product>,
    pub machines: Vec<Machine>,
    pub operator_groups: Vec<OperatorGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl FactorySnapshot {
    /// 出厂默认快照
    pub fn factory_default() -> Self {
        Self {
            products: initial_products(),
            machines: generate_machines(&factory_lines()),
            operator_groups: default_operator_groups(),
            timestamp: None,
        }
    }

    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    pub fn machine(&self, machine_id: &str) -> Option<&Machine> {
        self.machines.iter().find(|m| m.id == machine_id)
    }
}

impl Default for FactorySnapshot {
    fn default() -> Self {
        Self::factory_default()
    }
}
