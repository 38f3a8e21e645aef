// ==========================================
// 成型产线产能系统 - 快照变更事件
// ==========================================
// 职责: 定义快照变更发布 trait，实现依赖倒置
// 说明: Store 发布事件，持久化等外部协作者订阅
// ==========================================

use crate::domain::snapshot::FactorySnapshot;
use std::error::Error;
use std::sync::Arc;

// ==========================================
// 变更事件类型
// ==========================================

/// 快照变更类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactoryEventType {
    /// 产品目录变更
    ProductsChanged,
    /// 机台配置变更
    MachinesChanged,
    /// 操作工组变更
    OperatorGroupsChanged,
    /// 整体场景载入 (三个集合同时替换)
    ScenarioLoaded,
    /// 恢复出厂默认
    FactoryReset,
}

impl FactoryEventType {
    pub fn as_str(&self) -> &str {
        match self {
            FactoryEventType::ProductsChanged => "ProductsChanged",
            FactoryEventType::MachinesChanged => "MachinesChanged",
            FactoryEventType::OperatorGroupsChanged => "OperatorGroupsChanged",
            FactoryEventType::ScenarioLoaded => "ScenarioLoaded",
            FactoryEventType::FactoryReset => "FactoryReset",
        }
    }
}

/// 快照变更事件 (携带变更后的完整快照)
#[derive(Debug, Clone)]
pub struct FactoryEvent {
    pub event_type: FactoryEventType,
    pub source: Option<String>, // 触发操作
    pub snapshot: FactorySnapshot,
}

impl FactoryEvent {
    pub fn new(event_type: FactoryEventType, source: &str, snapshot: FactorySnapshot) -> Self {
        Self {
            event_type,
            source: Some(source.to_string()),
            snapshot,
        }
    }
}

// ==========================================
// 事件发布 Trait
// ==========================================

/// 快照变更发布者
///
/// # 实现说明
/// - `repository::PersistenceSubscriber` 将变更写入 SQLite
/// - 发布失败不回滚内存中的快照
pub trait FactoryEventPublisher: Send + Sync {
    fn publish(&self, event: &FactoryEvent) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// 空操作事件发布者
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

impl FactoryEventPublisher for NoOpEventPublisher {
    fn publish(&self, event: &FactoryEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        tracing::debug!(
            "NoOpEventPublisher: 跳过事件发布 - event_type={}",
            event.event_type.as_str()
        );
        Ok(())
    }
}

/// 多订阅者广播
///
/// 每个订阅者独立发布, 单个失败只记录告警
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Arc<dyn FactoryEventPublisher>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: Arc<dyn FactoryEventPublisher>) {
        self.subscribers.push(subscriber);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// 广播事件, 返回失败的订阅者数量
    pub fn publish(&self, event: &FactoryEvent) -> usize {
        let mut failures = 0;
        for subscriber in &self.subscribers {
            if let Err(e) = subscriber.publish(event) {
                failures += 1;
                tracing::warn!(
                    event_type = event.event_type.as_str(),
                    "事件订阅者处理失败: {}",
                    e
                );
            }
        }
        failures
    }
}
