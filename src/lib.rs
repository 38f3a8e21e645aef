// ==========================================
// 成型产线产能系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 两段式成型产线的实时产能/人员负荷计算
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 负荷计算
pub mod engine;

// 状态存储层 - 快照所有者
pub mod store;

// 导入层 - 场景快照交换
pub mod importer;

// 数据仓储层 - 快照持久化
pub mod repository;

// 配置层 - 产能限值
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    OperatorRole, OvenSpeed, ProductionScale, ProductionStage, Stage1Destination,
    Stage2SupplyType,
};

// 领域实体
pub use domain::{FactorySnapshot, Line, Machine, OperatorGroup, Product};

// 引擎
pub use engine::{
    CapacityOrchestrator, FactoryCalculations, FactorySummary, Stage1Engine, Stage1Result,
    Stage2Engine, Stage2Result,
};

// Store
pub use store::{FactoryStore, StoreError};

// 配置
pub use config::CapacityLimits;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "成型产线产能系统";
