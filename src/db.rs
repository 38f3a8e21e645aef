// ==========================================
// 成型产线产能系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout
// - 统一默认数据库路径
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "FACTORY_CAPACITY_DB_PATH";

/// 配置 SQLite 连接的统一 PRAGMA
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 获取默认数据库路径
///
/// # 返回
/// - 环境变量 FACTORY_CAPACITY_DB_PATH（非空时优先）
/// - 用户数据目录/factory-capacity/factory_capacity.db
/// - 回退: ./factory_capacity.db
pub fn default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./factory_capacity.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("factory-capacity");
        // 目录创建失败时保留回退路径
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("factory_capacity.db");
        }
    }

    path.to_string_lossy().to_string()
}
