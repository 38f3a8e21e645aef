// ==========================================
// 成型产线产能系统 - 工厂状态 Store
// ==========================================
// 职责: 产品目录 / 机台 / 操作工组 的唯一所有者
// 流程: 变更 → 发布事件 (持久化等订阅者) → 调用方按需 calculate()
// 红线: 变更失败不修改快照、不发布事件
// ==========================================

use crate::config::CapacityLimits;
use crate::domain::line::{factory_lines, Line};
use crate::domain::machine::Machine;
use crate::domain::operator::OperatorGroup;
use crate::domain::product::Product;
use crate::domain::snapshot::FactorySnapshot;
use crate::domain::types::{OperatorRole, OvenSpeed, ProductionScale, Stage1Destination, Stage2SupplyType};
use crate::engine::events::{EventBus, FactoryEvent, FactoryEventPublisher, FactoryEventType};
use crate::engine::orchestrator::{CapacityOrchestrator, FactoryCalculations};
use crate::repository::snapshot_repo::SnapshotRepository;
use crate::store::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// 新增产品输入 (id 为空时自动生成)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub pieces_per_tray: u32,
    pub stage1_rate: f64,
    pub stage2_target: f64,
    #[serde(default)]
    pub packaging_factor: f64,
}

// ==========================================
// FactoryStore
// ==========================================
pub struct FactoryStore {
    snapshot: FactorySnapshot,
    lines: Vec<Line>,
    bus: EventBus,
    orchestrator: CapacityOrchestrator,
}

impl FactoryStore {
    /// 出厂默认状态
    pub fn new() -> Self {
        Self::with_snapshot(FactorySnapshot::factory_default())
    }

    fn with_snapshot(snapshot: FactorySnapshot) -> Self {
        Self {
            snapshot,
            lines: factory_lines(),
            bus: EventBus::new(),
            orchestrator: CapacityOrchestrator::new(),
        }
    }

    /// 从持久化快照恢复 (缺失集合回退默认值)
    pub fn restore(repo: &SnapshotRepository) -> StoreResult<Self> {
        let snapshot = repo.load_snapshot()?;
        info!(
            products = snapshot.products.len(),
            machines = snapshot.machines.len(),
            operator_groups = snapshot.operator_groups.len(),
            "已从持久化快照恢复"
        );
        Ok(Self::with_snapshot(snapshot))
    }

    /// 替换产能参数 (非法限值保留默认值)
    pub fn with_limits(mut self, limits: CapacityLimits) -> Self {
        if !limits.is_valid() {
            tracing::warn!(?limits, "产能限值非法, 使用默认值");
            return self;
        }
        self.orchestrator = CapacityOrchestrator::with_limits(limits);
        self
    }

    pub fn subscribe(&mut self, subscriber: Arc<dyn FactoryEventPublisher>) {
        self.bus.subscribe(subscriber);
    }

    // ==========================================
    // 读取
    // ==========================================

    /// 当前快照副本
    pub fn snapshot(&self) -> FactorySnapshot {
        self.snapshot.clone()
    }

    pub fn products(&self) -> &[Product] {
        &self.snapshot.products
    }

    pub fn machines(&self) -> &[Machine] {
        &self.snapshot.machines
    }

    pub fn operator_groups(&self) -> &[OperatorGroup] {
        &self.snapshot.operator_groups
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// 对当前快照全量计算
    pub fn calculate(&self) -> FactoryCalculations {
        self.orchestrator.calculate(&self.snapshot, &self.lines)
    }

    // ==========================================
    // 产品目录
    // ==========================================

    /// 新增产品, 返回最终产品ID
    pub fn add_product(&mut self, input: NewProduct) -> StoreResult<String> {
        let id = match input.id {
            Some(id) if !id.trim().is_empty() => id,
            _ => format!("p-{}", Uuid::new_v4()),
        };
        if self.snapshot.product(&id).is_some() {
            return Err(StoreError::DuplicateProduct(id));
        }

        let product = Product::new(
            id.clone(),
            input.name,
            input.pieces_per_tray,
            input.stage1_rate,
            input.stage2_target,
            input.packaging_factor,
        )?;

        info!(product_id = %id, name = %product.name, "新增产品");
        self.snapshot.products.push(product);
        self.emit(FactoryEventType::ProductsChanged, "add_product");
        Ok(id)
    }

    /// 删除产品 (仍引用它的机台贡献为零)
    pub fn remove_product(&mut self, product_id: &str) -> StoreResult<()> {
        let before = self.snapshot.products.len();
        self.snapshot.products.retain(|p| p.id != product_id);
        if self.snapshot.products.len() == before {
            return Err(StoreError::UnknownProduct(product_id.to_string()));
        }

        info!(product_id = product_id, "删除产品");
        self.emit(FactoryEventType::ProductsChanged, "remove_product");
        Ok(())
    }

    /// 导入产品目录: 替换目录并清空所有机台的产品
    pub fn import_products(&mut self, products: Vec<Product>) -> StoreResult<()> {
        validate_catalog(&products)?;

        info!(count = products.len(), "导入产品目录");
        self.snapshot.products = products;
        for machine in &mut self.snapshot.machines {
            machine.product_id = None;
        }
        self.emit(FactoryEventType::ScenarioLoaded, "import_products");
        Ok(())
    }

    /// 载入完整场景 (三个集合整体替换)
    pub fn load_scenario(&mut self, scenario: FactorySnapshot) -> StoreResult<()> {
        validate_catalog(&scenario.products)?;
        info!(
            products = scenario.products.len(),
            machines = scenario.machines.len(),
            operator_groups = scenario.operator_groups.len(),
            "载入场景"
        );
        self.snapshot = scenario;
        self.emit(FactoryEventType::ScenarioLoaded, "load_scenario");
        Ok(())
    }

    /// 恢复出厂默认
    pub fn reset(&mut self) {
        info!("恢复出厂默认");
        self.snapshot = FactorySnapshot::factory_default();
        self.emit(FactoryEventType::FactoryReset, "reset");
    }

    // ==========================================
    // 机台
    // ==========================================

    pub fn toggle_machine(&mut self, machine_id: &str) -> StoreResult<bool> {
        let machine = self.machine_mut(machine_id)?;
        machine.is_active = !machine.is_active;
        let is_active = machine.is_active;

        info!(machine_id = machine_id, is_active = is_active, "切换机台启停");
        self.emit(FactoryEventType::MachinesChanged, "toggle_machine");
        Ok(is_active)
    }

    /// 分配产品 (None 表示置为空闲)
    pub fn set_machine_product(&mut self, machine_id: &str, product_id: Option<&str>) -> StoreResult<()> {
        if let Some(pid) = product_id {
            if self.snapshot.product(pid).is_none() {
                return Err(StoreError::UnknownProduct(pid.to_string()));
            }
        }
        self.machine_mut(machine_id)?.product_id = product_id.map(str::to_string);

        info!(machine_id = machine_id, product_id = ?product_id, "设置机台产品");
        self.emit(FactoryEventType::MachinesChanged, "set_machine_product");
        Ok(())
    }

    pub fn set_stage1_destination(&mut self, machine_id: &str, destination: Stage1Destination) -> StoreResult<()> {
        self.machine_mut(machine_id)?.stage1_destination = Some(destination);

        info!(machine_id = machine_id, destination = %destination, "设置一段去向");
        self.emit(FactoryEventType::MachinesChanged, "set_stage1_destination");
        Ok(())
    }

    pub fn set_on_conveyor(&mut self, machine_id: &str, on_conveyor: bool) -> StoreResult<()> {
        self.machine_mut(machine_id)?.is_on_conveyor = Some(on_conveyor);

        info!(machine_id = machine_id, on_conveyor = on_conveyor, "设置输送线");
        self.emit(FactoryEventType::MachinesChanged, "set_on_conveyor");
        Ok(())
    }

    pub fn set_stage2_supply_type(&mut self, machine_id: &str, supply_type: Stage2SupplyType) -> StoreResult<()> {
        self.machine_mut(machine_id)?.stage2_supply_type = Some(supply_type);

        info!(machine_id = machine_id, supply_type = %supply_type, "设置二段供料方式");
        self.emit(FactoryEventType::MachinesChanged, "set_stage2_supply_type");
        Ok(())
    }

    pub fn set_count_production(&mut self, machine_id: &str, count: bool) -> StoreResult<()> {
        self.machine_mut(machine_id)?.count_production = Some(count);

        info!(machine_id = machine_id, count = count, "设置是否计产量");
        self.emit(FactoryEventType::MachinesChanged, "set_count_production");
        Ok(())
    }

    pub fn set_production_scale(&mut self, machine_id: &str, scale: ProductionScale) -> StoreResult<()> {
        self.machine_mut(machine_id)?.production_scale = Some(scale);

        info!(machine_id = machine_id, scale = %scale, "设置生产比例");
        self.emit(FactoryEventType::MachinesChanged, "set_production_scale");
        Ok(())
    }

    // ==========================================
    // 操作工组
    // ==========================================

    /// 切换岗位, 返回切换后的在岗状态
    pub fn toggle_operator(&mut self, group_id: &str, role: OperatorRole) -> StoreResult<bool> {
        let group = self.group_mut(group_id)?;
        group.toggle(role);
        let present = match role {
            OperatorRole::Oven => group.has_oven_operator,
            OperatorRole::Cart => group.has_cart_operator,
        };

        info!(group_id = group_id, role = %role, present = present, "切换操作工");
        self.emit(FactoryEventType::OperatorGroupsChanged, "toggle_operator");
        Ok(present)
    }

    pub fn set_oven_speed(&mut self, group_id: &str, speed: OvenSpeed) -> StoreResult<()> {
        self.group_mut(group_id)?.oven_speed = speed;

        info!(group_id = group_id, speed = %speed, "设置烘炉速度");
        self.emit(FactoryEventType::OperatorGroupsChanged, "set_oven_speed");
        Ok(())
    }

    // ==========================================
    // 内部
    // ==========================================

    fn machine_mut(&mut self, machine_id: &str) -> StoreResult<&mut Machine> {
        self.snapshot
            .machines
            .iter_mut()
            .find(|m| m.id == machine_id)
            .ok_or_else(|| StoreError::UnknownMachine(machine_id.to_string()))
    }

    fn group_mut(&mut self, group_id: &str) -> StoreResult<&mut OperatorGroup> {
        self.snapshot
            .operator_groups
            .iter_mut()
            .find(|g| g.id == group_id)
            .ok_or_else(|| StoreError::UnknownGroup(group_id.to_string()))
    }

    fn emit(&self, event_type: FactoryEventType, source: &str) {
        if self.bus.subscriber_count() == 0 {
            return;
        }
        let event = FactoryEvent::new(event_type, source, self.snapshot.clone());
        self.bus.publish(&event);
    }
}

/// 产品目录校验: 逐条校验 + ID 去重
fn validate_catalog(products: &[Product]) -> StoreResult<()> {
    let mut seen = HashSet::new();
    for product in products {
        product.validate()?;
        if !seen.insert(product.id.as_str()) {
            return Err(StoreError::DuplicateProduct(product.id.clone()));
        }
    }
    Ok(())
}

impl Default for FactoryStore {
    fn default() -> Self {
        Self::new()
    }
}
