// ==========================================
// 成型产线产能系统 - 负荷/能力领域模型
// ==========================================
// 红线: 超限判定为严格大于, 且基于未取整的累计值
// 红线: 无滞回, 每次计算都是独立快照
// ==========================================

use serde::{Deserialize, Serialize};

/// 数值展示取整 (四舍五入, 远离零)
pub fn round_display(value: f64) -> f64 {
    value.round()
}

// ==========================================
// LoadGauge - 单个负荷桶
// ==========================================
// load 为展示值 (已取整), is_over 基于原始值
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadGauge {
    pub load: f64,   // 托盘/小时 (取整)
    pub limit: f64,  // 托盘/小时
    pub is_over: bool,
}

impl LoadGauge {
    /// 由原始累计负荷构造
    pub fn from_raw(raw_load: f64, limit: f64) -> Self {
        Self {
            load: round_display(raw_load),
            limit,
            is_over: raw_load > limit,
        }
    }
}

// ==========================================
// Trait: CapacityConstraint
// ==========================================
// 用途: 看板统一读取负荷/能力
pub trait CapacityConstraint {
    /// 展示负荷
    fn current_load(&self) -> f64;

    /// 当前能力
    fn capacity(&self) -> f64;

    /// 是否超限 (计算时的判定结果)
    fn is_overloaded(&self) -> bool;

    /// 利用率百分比 (封顶 100, 能力为 0 时返回 0)
    fn utilization_pct(&self) -> f64 {
        utilization_pct(self.current_load(), self.capacity())
    }
}

impl CapacityConstraint for LoadGauge {
    fn current_load(&self) -> f64 {
        self.load
    }

    fn capacity(&self) -> f64 {
        self.limit
    }

    fn is_overloaded(&self) -> bool {
        self.is_over
    }
}

/// 利用率百分比
pub fn utilization_pct(load: f64, capacity: f64) -> f64 {
    if capacity <= 0.0 {
        return 0.0;
    }
    ((load / capacity) * 100.0).min(100.0)
}
