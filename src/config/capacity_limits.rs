// ==========================================
// 成型产线产能系统 - 产能限值
// ==========================================
// 一段: 每条线烘炉 400 托盘/小时, 自然干燥 300 托盘/小时
// 二段: 小车工 300, 烘炉工协助 300 (慢速烘炉时), 循环工 360
// 托盘损耗系数 1.10 (统一 10% 破损/浪费)
// ==========================================

use serde::{Deserialize, Serialize};

pub const STAGE1_OVEN_LIMIT: f64 = 400.0;
pub const STAGE1_DRYING_LIMIT: f64 = 300.0;
pub const CART_OPERATOR_MAX: f64 = 300.0;
pub const OVEN_OPERATOR_HELP: f64 = 300.0;
pub const SUPPLY_OPERATOR_CAPACITY: f64 = 360.0;
pub const TRAY_WASTE_FACTOR: f64 = 1.10;

/// 产能限值配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityLimits {
    pub stage1_oven_limit: f64,        // 托盘/小时/线
    pub stage1_drying_limit: f64,      // 托盘/小时/线
    pub cart_operator_max: f64,        // 托盘/小时/人
    pub oven_operator_help: f64,       // 托盘/小时 (慢速烘炉加成)
    pub supply_operator_capacity: f64, // 托盘/小时/人
    pub tray_waste_factor: f64,
}

impl Default for CapacityLimits {
    fn default() -> Self {
        Self {
            stage1_oven_limit: STAGE1_OVEN_LIMIT,
            stage1_drying_limit: STAGE1_DRYING_LIMIT,
            cart_operator_max: CART_OPERATOR_MAX,
            oven_operator_help: OVEN_OPERATOR_HELP,
            supply_operator_capacity: SUPPLY_OPERATOR_CAPACITY,
            tray_waste_factor: TRAY_WASTE_FACTOR,
        }
    }
}

impl CapacityLimits {
    /// 限值是否可用 (均为有限正数)
    pub fn is_valid(&self) -> bool {
        [
            self.stage1_oven_limit,
            self.stage1_drying_limit,
            self.cart_operator_max,
            self.oven_operator_help,
            self.supply_operator_capacity,
            self.tray_waste_factor,
        ]
        .iter()
        .all(|v| v.is_finite() && *v > 0.0)
    }
}
