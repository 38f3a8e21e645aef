// ==========================================
// 成型产线产能系统 - 配置层
// ==========================================
// 职责: 产能限值默认值与 config_kv 覆写
// 存储: config_kv 表
// ==========================================

pub mod capacity_limits;
pub mod config_manager;

// 重导出核心配置
pub use capacity_limits::CapacityLimits;
pub use config_manager::{config_keys, ConfigManager};
