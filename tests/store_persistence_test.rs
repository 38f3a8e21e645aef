// ==========================================
// Store + 持久化 集成测试
// ==========================================
// 职责: 验证 变更 → 事件 → SQLite → 恢复 的完整链路
// 场景: 恢复、出厂重置、场景导入、配置覆写
// ==========================================


use factory_capacity::config::{config_keys, ConfigManager};
use factory_capacity::domain::{initial_products, FactorySnapshot, OperatorRole, OvenSpeed, Stage2SupplyType};
use factory_capacity::importer::{export_scenario, parse_product_catalog, parse_scenario};
use factory_capacity::repository::{PersistenceSubscriber, SnapshotRepository};
use factory_capacity::store::{FactoryStore, NewProduct};
use std::sync::Arc;
use test_helpers::*;

fn persistent_store(db_path: &str) -> (Arc<SnapshotRepository>, FactoryStore) {
    let repo = Arc::new(SnapshotRepository::new(db_path).unwrap());
    let mut store = FactoryStore::restore(&repo).unwrap();
    store.subscribe(Arc::new(PersistenceSubscriber::new(repo.clone())));
    (repo, store)
}

#[test]
fn test_mutations_survive_restart() {
    factory_capacity::logging::init_test();
    let (_tmp, db_path) = create_test_db();

    let before = {
        let (_repo, mut store) = persistent_store(&db_path);
        let id = store
            .add_product(NewProduct {
                id: None,
                name: "Modelo Novo".to_string(),
                pieces_per_tray: 10,
                stage1_rate: 1000.0,
                stage2_target: 500.0,
                packaging_factor: 0.2,
            })
            .unwrap();
        store.set_machine_product("S2-C-M1", Some(&id)).unwrap();
        store.set_stage2_supply_type("S2-C-M1", Stage2SupplyType::ViaOven).unwrap();
        store.set_oven_speed("CD", OvenSpeed::Slow).unwrap();
        store.toggle_operator("EF", OperatorRole::Cart).unwrap();
        store.snapshot()
    };

    let (_repo, restored) = persistent_store(&db_path);
    assert_eq!(restored.snapshot(), before);

    let calc = restored.calculate();
    let cd = calc.stage2.group("CD").unwrap();
    assert_eq!(cd.oven_load, 55.0);
    assert_eq!(cd.cart_load, 0.0);
    assert_eq!(calc.stage2.group("EF").unwrap().cart_capacity, 0.0);
}

#[test]
fn test_reset_clears_persisted_state() {
    let (_tmp, db_path) = create_test_db();

    {
        let (_repo, mut store) = persistent_store(&db_path);
        store.toggle_machine("S1-A-M1").unwrap();
        store.remove_product("p3").unwrap();
        store.reset();
    }

    let (repo, restored) = persistent_store(&db_path);
    assert!(repo.load_products().unwrap().is_none());
    assert!(repo.load_machines().unwrap().is_none());
    assert_eq!(restored.snapshot(), FactorySnapshot::factory_default());
}

#[test]
fn test_loaded_scenario_is_persisted() {
    let (_tmp, db_path) = create_test_db();

    let mut source = snapshot_with(vec![product("z", 10, 1200.0, 500.0, 0.2)]);
    assign(&mut source, "S1-B-M1", "z");
    assign(&mut source, "S2-F-M2", "z");
    let json = export_scenario(&source, chrono::Utc::now()).unwrap();

    {
        let (_repo, mut store) = persistent_store(&db_path);
        store.load_scenario(parse_scenario(&json).unwrap()).unwrap();
    }

    let (_repo, restored) = persistent_store(&db_path);
    let snapshot = restored.snapshot();
    assert_eq!(snapshot.products, source.products);
    assert_eq!(snapshot.machines, source.machines);
    assert_eq!(snapshot.operator_groups, source.operator_groups);

    let calc = restored.calculate();
    assert_eq!(calc.stage1.total_pieces_per_hour, 1200.0);
    assert_eq!(calc.stage2.total_pieces_per_hour, 500.0);
}

#[test]
fn test_catalog_import_clears_assignments_and_persists() {
    let (_tmp, db_path) = create_test_db();

    {
        let (_repo, mut store) = persistent_store(&db_path);
        store.set_machine_product("S2-A-M1", Some("p1")).unwrap();
        let catalog = parse_product_catalog(
            r#"[{"id":"c1","name":"Catalogo","piecesPerTray":5,"stage1Rate":100,"stage2Target":50,"packagingFactor":0}]"#,
        )
        .unwrap();
        store.import_products(catalog).unwrap();
    }

    let (_repo, restored) = persistent_store(&db_path);
    assert_eq!(restored.products().len(), 1);
    assert!(restored.machines().iter().all(|m| m.product_id.is_none()));
}

#[test]
fn test_configured_limits_change_verdicts() {
    let (_tmp, db_path) = create_test_db();
    let config = ConfigManager::new(&db_path).unwrap();
    config.set_global_config_value(config_keys::STAGE1_OVEN_LIMIT, "250").unwrap();

    let limits = config.load_capacity_limits().unwrap();
    let (_repo, mut store) = persistent_store(&db_path);
    store = store.with_limits(limits);

    // 3 台上输送线 × 100 = 300 > 250
    for m in ["S1-A-M1", "S1-A-M2", "S1-A-M3"] {
        store.set_machine_product(m, Some("p1")).unwrap();
    }
    let calc = store.calculate();
    let line = calc.stage1.line("S1-A").unwrap();
    assert_eq!(line.oven.limit, 250.0);
    assert!(line.oven.is_over);
    assert!(calc.summary.factory_alert);
}

#[test]
fn test_invalid_stored_catalog_never_reaches_engines() {
    let (_tmp, db_path) = create_test_db();
    let repo = SnapshotRepository::new(&db_path).unwrap();
    let mut broken = initial_products();
    broken[0].pieces_per_tray = 0;
    repo.save_products(&broken).unwrap();

    let (_repo, mut store) = persistent_store(&db_path);
    assert_eq!(store.products(), initial_products().as_slice());

    store.set_machine_product("S1-A-M1", Some("p1")).unwrap();
    store.set_machine_product("S2-A-M1", Some("p1")).unwrap();
    let calc = store.calculate();

    let line = calc.stage1.line("S1-A").unwrap();
    assert_eq!(line.oven.load, 100.0);
    assert!(!line.oven.is_over);
    assert!(calc.stage2.total_stage2_trays.is_finite());
    assert!(calc.stage2.total_supply_people.is_finite());
    assert_eq!(calc.stage2.group("AB").unwrap().cart_load, 46.0);
}
