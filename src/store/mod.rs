// ==========================================
// 成型产线产能系统 - 状态存储层
// ==========================================
// 职责: 持有唯一可写快照, 串行化变更, 发布变更事件
// 红线: 引擎只拿到快照的只读引用
// ==========================================

pub mod error;
pub mod factory_store;

pub use error::{StoreError, StoreResult};
pub use factory_store::{FactoryStore, NewProduct};
