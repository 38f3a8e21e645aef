// ==========================================
// 成型产线产能系统 - 场景快照导入/导出
// ==========================================
// 交换格式:
// - 完整场景: { products: [], machines: [], operatorGroups: [], timestamp? }
// - 产品目录: [ {product}, ... ]
// 解析步骤: JSON → 顶层结构检查 → 逐条类型化 → 产品校验 → ID 去重
// ==========================================

use crate::domain::machine::Machine;
use crate::domain::operator::OperatorGroup;
use crate::domain::product::Product;
use crate::domain::snapshot::FactorySnapshot;
use crate::importer::error::{ImportError, ImportResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;

const PRODUCTS: &str = "products";
const MACHINES: &str = "machines";
const OPERATOR_GROUPS: &str = "operatorGroups";

// ==========================================
// 导入
// ==========================================

/// 解析完整场景快照
///
/// 三个数组缺一即拒绝; timestamp 可选
pub fn parse_scenario(json: &str) -> ImportResult<FactorySnapshot> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Object(root) = value else {
        return Err(ImportError::NotAnObject);
    };

    let products_raw = required_array(&root, PRODUCTS)?;
    let machines_raw = required_array(&root, MACHINES)?;
    let groups_raw = required_array(&root, OPERATOR_GROUPS)?;

    let products = parse_products_array(products_raw)?;
    let machines: Vec<Machine> = parse_records(MACHINES, machines_raw)?;
    let operator_groups: Vec<OperatorGroup> = parse_records(OPERATOR_GROUPS, groups_raw)?;

    ensure_unique(MACHINES, machines.iter().map(|m| m.id.as_str()))?;
    ensure_unique(OPERATOR_GROUPS, operator_groups.iter().map(|g| g.id.as_str()))?;

    let timestamp = match root.get("timestamp") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(
            DateTime::parse_from_rfc3339(s)
                .map_err(|_| ImportError::InvalidTimestamp(s.clone()))?
                .with_timezone(&Utc),
        ),
        Some(other) => return Err(ImportError::InvalidTimestamp(other.to_string())),
    };

    tracing::info!(
        products = products.len(),
        machines = machines.len(),
        operator_groups = operator_groups.len(),
        "场景快照解析完成"
    );

    Ok(FactorySnapshot {
        products,
        machines,
        operator_groups,
        timestamp,
    })
}

/// 解析产品目录 (顶层为数组)
pub fn parse_product_catalog(json: &str) -> ImportResult<Vec<Product>> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(items) = value else {
        return Err(ImportError::NotAnArray);
    };
    parse_products_array(&items)
}

/// 从文件读取场景快照
pub fn load_scenario_file(path: &Path) -> ImportResult<FactorySnapshot> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    parse_scenario(&content)
}

fn required_array<'a>(root: &'a Map<String, Value>, field: &'static str) -> ImportResult<&'a Vec<Value>> {
    match root.get(field) {
        None => Err(ImportError::MissingField(field)),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(ImportError::WrongType {
            field,
            expected: "array",
        }),
    }
}

fn parse_records<T: DeserializeOwned>(section: &'static str, items: &[Value]) -> ImportResult<Vec<T>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            T::deserialize(item).map_err(|e| ImportError::InvalidRecord {
                section,
                index,
                message: e.to_string(),
            })
        })
        .collect()
}

fn parse_products_array(items: &[Value]) -> ImportResult<Vec<Product>> {
    let products: Vec<Product> = parse_records(PRODUCTS, items)?;
    for (index, product) in products.iter().enumerate() {
        product
            .validate()
            .map_err(|source| ImportError::InvalidProduct { index, source })?;
    }
    ensure_unique(PRODUCTS, products.iter().map(|p| p.id.as_str()))?;
    Ok(products)
}

fn ensure_unique<'a>(section: &'static str, ids: impl Iterator<Item = &'a str>) -> ImportResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ImportError::DuplicateId {
                section,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

// ==========================================
// 导出
// ==========================================

/// 导出完整场景 (写入导出时间)
pub fn export_scenario(snapshot: &FactorySnapshot, now: DateTime<Utc>) -> ImportResult<String> {
    let stamped = FactorySnapshot {
        timestamp: Some(now),
        ..snapshot.clone()
    };
    Ok(serde_json::to_string_pretty(&stamped)?)
}

/// 导出产品目录
pub fn export_products(products: &[Product]) -> ImportResult<String> {
    Ok(serde_json::to_string_pretty(products)?)
}

/// 场景导出文件名
pub fn suggested_scenario_file_name(date: NaiveDate) -> String {
    format!("cenario_completo_{}.json", date.format("%Y-%m-%d"))
}

/// 产品目录导出文件名
pub fn suggested_products_file_name(date: NaiveDate) -> String {
    format!("catalogo_produtos_{}.json", date.format("%Y-%m-%d"))
}
