// ==========================================
// 成型产线产能系统 - 命令行入口
// ==========================================
// 用法: factory-capacity [scenario.json]
// - 带参数: 从场景文件载入 (不写入数据库)
// - 无参数: 从默认数据库恢复
// 输出: 一段/二段/汇总 计算结果 (JSON, stdout)
// ==========================================

use anyhow::{anyhow, Context};
use factory_capacity::config::ConfigManager;
use factory_capacity::db::default_db_path;
use factory_capacity::importer::load_scenario_file;
use factory_capacity::repository::SnapshotRepository;
use factory_capacity::{logging, CapacityLimits, FactoryStore};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("{} v{}", factory_capacity::APP_NAME, factory_capacity::VERSION);

    let db_path = default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let limits = load_limits(&db_path);

    let store = match std::env::args().nth(1) {
        Some(path) => {
            let path = PathBuf::from(path);
            let scenario = load_scenario_file(&path)
                .with_context(|| format!("场景文件载入失败: {}", path.display()))?;
            let mut store = FactoryStore::new();
            store.load_scenario(scenario)?;
            store
        }
        None => {
            let repo = SnapshotRepository::new(&db_path).context("打开快照存储失败")?;
            FactoryStore::restore(&repo)?
        }
    }
    .with_limits(limits);

    let calculations = store.calculate();
    if calculations.summary.factory_alert {
        tracing::warn!("存在超负荷的产线或操作工组");
    }

    println!("{}", serde_json::to_string_pretty(&calculations)?);
    Ok(())
}

/// 读取产能限值覆写, 失败时使用默认值
fn load_limits(db_path: &str) -> CapacityLimits {
    let loaded = ConfigManager::new(db_path)
        .and_then(|manager| manager.load_capacity_limits())
        .map_err(|e| anyhow!("{}", e));

    match loaded {
        Ok(limits) => limits,
        Err(e) => {
            tracing::warn!("产能限值读取失败, 使用默认值: {}", e);
            CapacityLimits::default()
        }
    }
}
