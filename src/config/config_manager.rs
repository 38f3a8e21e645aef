// ==========================================
// 成型产线产能系统 - 配置管理器
// ==========================================
// 职责: 从 config_kv 表读取产能限值覆写
// 存储: config_kv 表 (scope_id + key + value)
// 缺失或格式错误的配置项回退为默认值
// ==========================================

use crate::config::capacity_limits::CapacityLimits;
use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// 配置键
pub mod config_keys {
    pub const STAGE1_OVEN_LIMIT: &str = "stage1_oven_limit";
    pub const STAGE1_DRYING_LIMIT: &str = "stage1_drying_limit";
    pub const CART_OPERATOR_MAX: &str = "cart_operator_max";
    pub const OVEN_OPERATOR_HELP: &str = "oven_operator_help";
    pub const SUPPLY_OPERATOR_CAPACITY: &str = "supply_operator_capacity";
    pub const TRAY_WASTE_FACTOR: &str = "tray_waste_factor";
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
            conn_guard.execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS config_kv (
                  scope_id TEXT NOT NULL,
                  key TEXT NOT NULL,
                  value TEXT NOT NULL,
                  updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                  PRIMARY KEY (scope_id, key)
                );
                "#,
            )?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入 global scope 配置 (UPSERT)
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取正数配置, 缺失或非法时回退
    fn get_positive_f64(&self, key: &str, default: f64) -> Result<f64, Box<dyn Error>> {
        let raw = match self.get_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };

        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
            _ => {
                tracing::warn!(key = key, value = %raw, "配置值非法, 使用默认值 {}", default);
                Ok(default)
            }
        }
    }

    /// 加载产能限值 (逐项覆写默认值)
    pub fn load_capacity_limits(&self) -> Result<CapacityLimits, Box<dyn Error>> {
        let d = CapacityLimits::default();
        Ok(CapacityLimits {
            stage1_oven_limit: self.get_positive_f64(config_keys::STAGE1_OVEN_LIMIT, d.stage1_oven_limit)?,
            stage1_drying_limit: self
                .get_positive_f64(config_keys::STAGE1_DRYING_LIMIT, d.stage1_drying_limit)?,
            cart_operator_max: self.get_positive_f64(config_keys::CART_OPERATOR_MAX, d.cart_operator_max)?,
            oven_operator_help: self
                .get_positive_f64(config_keys::OVEN_OPERATOR_HELP, d.oven_operator_help)?,
            supply_operator_capacity: self
                .get_positive_f64(config_keys::SUPPLY_OPERATOR_CAPACITY, d.supply_operator_capacity)?,
            tray_waste_factor: self.get_positive_f64(config_keys::TRAY_WASTE_FACTOR, d.tray_waste_factor)?,
        })
    }

    /// 获取所有 global 配置（用于导出/诊断）
    pub fn get_config_snapshot(&self) -> Result<HashMap<String, String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

        let mut config_map = HashMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }
        Ok(config_map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_manager() -> (NamedTempFile, ConfigManager) {
        let temp_file = NamedTempFile::new().unwrap();
        let manager = ConfigManager::new(temp_file.path().to_str().unwrap()).unwrap();
        (temp_file, manager)
    }

    #[test]
    fn test_defaults_when_empty() {
        let (_tmp, manager) = create_manager();
        let limits = manager.load_capacity_limits().unwrap();
        assert_eq!(limits, CapacityLimits::default());
    }

    #[test]
    fn test_override_and_invalid_fallback() {
        let (_tmp, manager) = create_manager();
        manager.set_global_config_value(config_keys::STAGE1_OVEN_LIMIT, "450").unwrap();
        manager.set_global_config_value(config_keys::CART_OPERATOR_MAX, "abc").unwrap();
        manager.set_global_config_value(config_keys::SUPPLY_OPERATOR_CAPACITY, "-1").unwrap();

        let limits = manager.load_capacity_limits().unwrap();
        assert_eq!(limits.stage1_oven_limit, 450.0);
        assert_eq!(limits.cart_operator_max, 300.0);
        assert_eq!(limits.supply_operator_capacity, 360.0);

        let snapshot = manager.get_config_snapshot().unwrap();
        assert_eq!(snapshot.len(), 3);
    }
}
