// ==========================================
// 成型产线产能系统 - 导入层
// ==========================================
// 职责: 场景快照/产品目录的 JSON 解析与导出
// 红线: 结构校验在边界完成, 失败返回 ImportError, 不进入引擎
// ==========================================

pub mod error;
pub mod scenario;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use scenario::{
    export_products, export_scenario, load_scenario_file, parse_product_catalog, parse_scenario,
    suggested_products_file_name, suggested_scenario_file_name,
};
