// ==========================================
// 成型产线产能系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 快照三个集合的键值持久化, 屏蔽数据库细节
// 约束: 所有查询使用参数化
// ==========================================

pub mod error;
pub mod persistence_subscriber;
pub mod snapshot_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use persistence_subscriber::PersistenceSubscriber;
pub use snapshot_repo::{storage_keys, SnapshotRepository};
