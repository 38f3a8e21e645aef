// ==========================================
// 成型产线产能系统 - 领域模型层
// ==========================================
// 职责: 定义产品、产线、机台、操作工组及快照
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod capacity;
pub mod line;
pub mod machine;
pub mod operator;
pub mod product;
pub mod snapshot;
pub mod types;

// 重导出核心类型
pub use capacity::{CapacityConstraint, LoadGauge};
pub use line::{factory_lines, stage_one_line_ids, stage_one_lines, stage_two_lines, Line};
pub use machine::{generate_machines, Machine, MACHINES_PER_LINE};
pub use operator::{default_operator_groups, OperatorGroup};
pub use product::{initial_products, Product, ProductError};
pub use snapshot::FactorySnapshot;
pub use types::{
    OperatorRole, OvenSpeed, ProductionScale, ProductionStage, Stage1Destination,
    Stage2SupplyType,
};
