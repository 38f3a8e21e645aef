// ==========================================
// 成型产线产能系统 - 持久化订阅者
// ==========================================
// 职责: 订阅快照变更事件, 按事件类型写入对应集合
// 说明: 引擎与 Store 不直接依赖 SQLite
// ==========================================

use crate::engine::events::{FactoryEvent, FactoryEventPublisher, FactoryEventType};
use crate::repository::snapshot_repo::SnapshotRepository;
use std::error::Error;
use std::sync::Arc;

pub struct PersistenceSubscriber {
    repo: Arc<SnapshotRepository>,
}

impl PersistenceSubscriber {
    pub fn new(repo: Arc<SnapshotRepository>) -> Self {
        Self { repo }
    }
}

impl FactoryEventPublisher for PersistenceSubscriber {
    fn publish(&self, event: &FactoryEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        let snapshot = &event.snapshot;
        match event.event_type {
            FactoryEventType::ProductsChanged => self.repo.save_products(&snapshot.products)?,
            FactoryEventType::MachinesChanged => self.repo.save_machines(&snapshot.machines)?,
            FactoryEventType::OperatorGroupsChanged => {
                self.repo.save_operator_groups(&snapshot.operator_groups)?
            }
            // 导入产品目录会同时清空机台产品, 两个集合都要写
            FactoryEventType::ScenarioLoaded => self.repo.save_snapshot(snapshot)?,
            FactoryEventType::FactoryReset => {
                let removed = self.repo.clear()?;
                tracing::debug!(removed = removed, "已清除持久化快照");
            }
        }

        tracing::trace!(
            event_type = event.event_type.as_str(),
            source = event.source.as_deref().unwrap_or("-"),
            "快照已持久化"
        );
        Ok(())
    }
}
