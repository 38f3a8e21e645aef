// ==========================================
// 成型产线产能系统 - 引擎层
// ==========================================
// 职责: 快照 → 负荷/能力/人数 的纯计算
// 红线: 引擎无状态、无 I/O、不修改输入
// 红线: 悬空引用 (产品/产线不存在) 贡献为零, 不报错
// ==========================================

pub mod events;
pub mod orchestrator;
pub mod stage1;
pub mod stage2;
pub mod summary;

use crate::domain::product::Product;
use std::collections::HashMap;

// 重导出核心引擎
pub use events::{EventBus, FactoryEvent, FactoryEventPublisher, FactoryEventType, NoOpEventPublisher};
pub use orchestrator::{CapacityOrchestrator, FactoryCalculations};
pub use stage1::{Stage1Engine, Stage1LineResult, Stage1Result};
pub use stage2::{GroupLoad, Stage2Engine, Stage2Result};
pub use summary::{FactorySummary, ModelProduction};

/// 产品ID索引 (重复ID时保留第一个)
pub(crate) fn product_index(products: &[Product]) -> HashMap<&str, &Product> {
    let mut index = HashMap::with_capacity(products.len());
    for product in products {
        index.entry(product.id.as_str()).or_insert(product);
    }
    index
}
