// ==========================================
// 成型产线产能系统 - 快照键值仓储
// ==========================================
// 职责: 管理 factory_state_kv 表 (key → JSON)
// 三个集合分别存储, 缺失或损坏时按集合回退默认值
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::line::factory_lines;
use crate::domain::machine::{generate_machines, Machine};
use crate::domain::operator::{default_operator_groups, OperatorGroup};
use crate::domain::product::{initial_products, Product};
use crate::domain::snapshot::FactorySnapshot;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// 存储键
pub mod storage_keys {
    pub const PRODUCTS: &str = "factory_products_v1";
    pub const MACHINES: &str = "factory_machines_v1";
    pub const OPERATORS: &str = "factory_operators_v1";
}

pub struct SnapshotRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SnapshotRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_table()?;
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 确保表存在（如果不存在则创建）
    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS factory_state_kv (
              key TEXT PRIMARY KEY,
              value TEXT NOT NULL,
              updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;
        Ok(())
    }

    // ==========================================
    // 底层键值操作
    // ==========================================

    fn put_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> RepositoryResult<()> {
        let json = serde_json::to_string(value).map_err(|e| RepositoryError::SerializationError {
            key: key.to_string(),
            message: e.to_string(),
        })?;

        let updated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO factory_state_kv (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, json, updated_at],
        )?;
        Ok(())
    }

    fn get_raw(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM factory_state_kv WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 读取并解析; 解析失败视为缺失 (记录告警)
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> RepositoryResult<Option<T>> {
        let Some(raw) = self.get_raw(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key = key, "存储内容无法解析, 使用默认值: {}", e);
                Ok(None)
            }
        }
    }

    // ==========================================
    // 分集合读写
    // ==========================================

    pub fn save_products(&self, products: &[Product]) -> RepositoryResult<()> {
        self.put_json(storage_keys::PRODUCTS, products)
    }

    pub fn save_machines(&self, machines: &[Machine]) -> RepositoryResult<()> {
        self.put_json(storage_keys::MACHINES, machines)
    }

    pub fn save_operator_groups(&self, groups: &[OperatorGroup]) -> RepositoryResult<()> {
        self.put_json(storage_keys::OPERATORS, groups)
    }

    /// 读取产品目录; 任一产品校验失败或ID重复时整体视为缺失
    pub fn load_products(&self) -> RepositoryResult<Option<Vec<Product>>> {
        let Some(products) = self.get_json::<Vec<Product>>(storage_keys::PRODUCTS)? else {
            return Ok(None);
        };

        let mut seen = HashSet::new();
        for product in &products {
            if let Err(e) = product.validate() {
                tracing::warn!(key = storage_keys::PRODUCTS, "存储的产品非法, 使用默认目录: {}", e);
                return Ok(None);
            }
            if !seen.insert(product.id.as_str()) {
                tracing::warn!(
                    key = storage_keys::PRODUCTS,
                    product_id = %product.id,
                    "存储的产品ID重复, 使用默认目录"
                );
                return Ok(None);
            }
        }
        Ok(Some(products))
    }

    pub fn load_machines(&self) -> RepositoryResult<Option<Vec<Machine>>> {
        self.get_json(storage_keys::MACHINES)
    }

    pub fn load_operator_groups(&self) -> RepositoryResult<Option<Vec<OperatorGroup>>> {
        self.get_json(storage_keys::OPERATORS)
    }

    /// 写入完整快照
    pub fn save_snapshot(&self, snapshot: &FactorySnapshot) -> RepositoryResult<()> {
        self.save_products(&snapshot.products)?;
        self.save_machines(&snapshot.machines)?;
        self.save_operator_groups(&snapshot.operator_groups)
    }

    /// 读取完整快照 (按集合回退默认值)
    pub fn load_snapshot(&self) -> RepositoryResult<FactorySnapshot> {
        Ok(FactorySnapshot {
            products: self.load_products()?.unwrap_or_else(initial_products),
            machines: self
                .load_machines()?
                .unwrap_or_else(|| generate_machines(&factory_lines())),
            operator_groups: self
                .load_operator_groups()?
                .unwrap_or_else(default_operator_groups),
            timestamp: None,
        })
    }

    /// 清除全部存储键
    pub fn clear(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let removed = conn.execute(
            "DELETE FROM factory_state_kv WHERE key IN (?1, ?2, ?3)",
            params![storage_keys::PRODUCTS, storage_keys::MACHINES, storage_keys::OPERATORS],
        )?;
        Ok(removed)
    }
}
