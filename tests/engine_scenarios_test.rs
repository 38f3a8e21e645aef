// ==========================================
// 引擎场景测试
// ==========================================
// 职责: 以完整快照驱动一段/二段引擎, 验证负荷、能力与人数
// 场景: 单机基准 / 比例 / 超负荷 / 计产量开关 / 幂等
// ==========================================


use factory_capacity::domain::{
    factory_lines, stage_one_line_ids, OvenSpeed, ProductionScale, Stage1Destination,
    Stage2SupplyType,
};
use factory_capacity::engine::{CapacityOrchestrator, Stage1Engine, Stage2Engine};
use test_helpers::*;

// ==========================================
// 一段
// ==========================================

#[test]
fn test_stage1_single_oven_machine() {
    let mut snapshot = snapshot_with(vec![product("p1", 12, 1200.0, 500.0, 0.2)]);
    assign(&mut snapshot, "S1-A-M1", "p1");

    let lines = factory_lines();
    let result = Stage1Engine::new().compute(&snapshot.machines, &snapshot.products, &stage_one_line_ids(&lines));

    let line = result.line("S1-A").unwrap();
    assert_eq!(line.oven.load, 100.0);
    assert_eq!(line.drying.load, 0.0);
    assert_eq!(line.line_total_pieces, 1200.0);
    assert!(!line.oven.is_over);
    assert_eq!(result.line("S1-B").unwrap().line_total_pieces, 0.0);
}

#[test]
fn test_stage1_line_totals_sum_to_factory_total() {
    let mut snapshot = snapshot_with(vec![
        product("a", 12, 1200.0, 500.0, 0.0),
        product("b", 20, 2000.0, 800.0, 0.0),
    ]);
    assign(&mut snapshot, "S1-A-M1", "a");
    assign(&mut snapshot, "S1-A-M4", "b");
    assign(&mut snapshot, "S1-B-M2", "b");
    assign(&mut snapshot, "S1-B-M3", "missing");

    let calc = CapacityOrchestrator::new().calculate(&snapshot, &factory_lines());
    let sum: f64 = calc.stage1.lines.iter().map(|l| l.line_total_pieces).sum();

    assert_eq!(sum, calc.stage1.total_pieces_per_hour);
    assert_eq!(calc.stage1.total_pieces_per_hour, 5200.0);
}

#[test]
fn test_stage1_oven_over_limit_only_when_strictly_above() {
    // 3 台上输送线 × 134 = 402 托盘
    let mut snapshot = snapshot_with(vec![product("q", 10, 1340.0, 0.0, 0.0)]);
    for m in ["S1-A-M1", "S1-A-M2", "S1-A-M3", "S1-A-M4"] {
        assign(&mut snapshot, m, "q");
    }
    let lines = factory_lines();
    let engine = Stage1Engine::new();
    let result = engine.compute(&snapshot.machines, &snapshot.products, &stage_one_line_ids(&lines));
    let line = result.line("S1-A").unwrap();
    assert_eq!(line.oven.load, 402.0);
    assert!(line.oven.is_over);
    assert_eq!(line.line_total_trays, 536.0);

    // 正好 400 不算超
    let mut exact = snapshot_with(vec![product("q", 10, 1000.0, 0.0, 0.0)]);
    for m in ["S1-A-M1", "S1-A-M2", "S1-A-M3", "S1-A-M4"] {
        assign(&mut exact, m, "q");
    }
    machine_mut(&mut exact, "S1-A-M4").is_on_conveyor = Some(true);
    let result = engine.compute(&exact.machines, &exact.products, &stage_one_line_ids(&lines));
    assert_eq!(result.line("S1-A").unwrap().oven.load, 400.0);
    assert!(!result.line("S1-A").unwrap().oven.is_over);
}

#[test]
fn test_stage1_drying_routed_by_destination() {
    let mut snapshot = snapshot_with(vec![product("d", 10, 1100.0, 0.0, 0.0)]);
    for m in ["S1-B-M1", "S1-B-M2", "S1-B-M3"] {
        assign(&mut snapshot, m, "d");
        machine_mut(&mut snapshot, m).stage1_destination = Some(Stage1Destination::NaturalDry);
    }

    let calc = CapacityOrchestrator::new().calculate(&snapshot, &factory_lines());
    let line = calc.stage1.line("S1-B").unwrap();
    assert_eq!(line.drying.load, 330.0);
    assert!(line.drying.is_over);
    assert_eq!(line.oven.load, 0.0);
    assert!(calc.summary.stage1_alert);
    assert!(calc.summary.factory_alert);
    assert!(!calc.summary.stage2_alert);
}

// ==========================================
// 二段
// ==========================================

#[test]
fn test_stage2_single_cart_machine() {
    let mut snapshot = snapshot_with(vec![product("b", 10, 0.0, 500.0, 0.2)]);
    assign(&mut snapshot, "S2-A-M1", "b");

    let calc = CapacityOrchestrator::new().calculate(&snapshot, &factory_lines());
    let s2 = &calc.stage2;
    let ab = s2.group("AB").unwrap();

    assert_eq!(ab.cart_load, 55.0);
    assert_eq!(ab.total_pieces, 500.0);
    assert!(approx_eq(s2.total_stage2_trays, 55.0));
    assert!(approx_eq(s2.total_supply_trays, 55.0));
    assert!(approx_eq(s2.total_packaging_people, 0.2));
    assert_eq!(s2.total_pieces_per_hour, 500.0);
    assert_eq!(calc.summary.packaging_headcount, 1);
    assert_eq!(calc.summary.supply_headcount, 1);
}

#[test]
fn test_stage2_half_scale() {
    let mut snapshot = snapshot_with(vec![product("b", 10, 0.0, 500.0, 0.2)]);
    assign(&mut snapshot, "S2-A-M1", "b");
    machine_mut(&mut snapshot, "S2-A-M1").production_scale = Some(ProductionScale::Half);

    let s2 = CapacityOrchestrator::new().calculate(&snapshot, &factory_lines()).stage2;
    assert_eq!(s2.total_pieces_per_hour, 250.0);
    assert!(approx_eq(s2.total_stage2_trays, 27.5));
    assert!(approx_eq(s2.total_packaging_people, 0.1));
    // 27.5 显示取整为 28
    assert_eq!(s2.group("AB").unwrap().cart_load, 28.0);
}

#[test]
fn test_stage2_cart_overload_fast_oven() {
    // 4 台 × 87.5 = 350 托盘
    let mut snapshot = snapshot_with(vec![product("h", 11, 0.0, 875.0, 0.0)]);
    for m in ["S2-C-M1", "S2-C-M2", "S2-C-M3", "S2-C-M4"] {
        assign(&mut snapshot, m, "h");
    }

    let calc = CapacityOrchestrator::new().calculate(&snapshot, &factory_lines());
    let cd = calc.stage2.group("CD").unwrap();
    assert_eq!(cd.cart_load, 350.0);
    assert_eq!(cd.cart_capacity, 300.0);
    assert!(cd.cart_overload);
    assert!(!cd.is_boosted);
    assert!(calc.summary.stage2_alert);

    // 慢速烘炉 → 600, 不再超负荷
    snapshot
        .operator_groups
        .iter_mut()
        .find(|g| g.id == "CD")
        .unwrap()
        .oven_speed = OvenSpeed::Slow;
    let calc = CapacityOrchestrator::new().calculate(&snapshot, &factory_lines());
    let cd = calc.stage2.group("CD").unwrap();
    assert_eq!(cd.cart_capacity, 600.0);
    assert!(cd.is_boosted);
    assert!(!cd.cart_overload);
}

#[test]
fn test_stage2_count_production_disabled() {
    let mut snapshot = snapshot_with(vec![product("b", 10, 0.0, 500.0, 0.2)]);
    assign(&mut snapshot, "S2-B-M1", "b");
    assign(&mut snapshot, "S2-B-M2", "b");
    machine_mut(&mut snapshot, "S2-B-M2").count_production = Some(false);
    machine_mut(&mut snapshot, "S2-B-M2").stage2_supply_type = Some(Stage2SupplyType::ViaOven);

    let s2 = CapacityOrchestrator::new().calculate(&snapshot, &factory_lines()).stage2;
    let ab = s2.group("AB").unwrap();
    assert_eq!(ab.total_pieces, 500.0);
    assert!(approx_eq(s2.total_packaging_people, 0.2));
    assert!(approx_eq(s2.total_stage2_trays, 110.0));
    assert_eq!(ab.cart_load, 55.0);
    assert_eq!(ab.oven_load, 55.0);
}

#[test]
fn test_inactive_and_idle_machines_contribute_nothing() {
    let mut snapshot = snapshot_with(vec![product("b", 10, 1000.0, 500.0, 0.2)]);
    assign(&mut snapshot, "S1-A-M1", "b");
    assign(&mut snapshot, "S2-E-M1", "b");
    machine_mut(&mut snapshot, "S1-A-M1").is_active = false;
    machine_mut(&mut snapshot, "S2-E-M1").is_active = false;

    let calc = CapacityOrchestrator::new().calculate(&snapshot, &factory_lines());
    assert_eq!(calc.stage1.total_pieces_per_hour, 0.0);
    assert_eq!(calc.stage2.total_pieces_per_hour, 0.0);
    assert_eq!(calc.stage2.total_stage2_trays, 0.0);
    assert_eq!(calc.summary.packaging_headcount, 0);
    assert!(calc.summary.production_by_model.is_empty());
}

#[test]
fn test_supply_people_is_exact_division() {
    let mut snapshot = snapshot_with(vec![product("s", 7, 0.0, 333.0, 0.0)]);
    for m in ["S2-A-M1", "S2-C-M2", "S2-E-M3", "S2-F-M4"] {
        assign(&mut snapshot, m, "s");
    }

    let limits = factory_capacity::CapacityLimits::default();
    let s2 = Stage2Engine::new().compute(
        &snapshot.machines,
        &snapshot.products,
        &factory_lines(),
        &snapshot.operator_groups,
    );
    assert_eq!(s2.total_supply_people, s2.total_supply_trays / limits.supply_operator_capacity);
}

#[test]
fn test_production_by_model_share() {
    let mut snapshot = snapshot_with(vec![
        product("x", 10, 0.0, 300.0, 0.0),
        product("y", 10, 0.0, 100.0, 0.0),
    ]);
    assign(&mut snapshot, "S2-A-M1", "x");
    assign(&mut snapshot, "S2-D-M1", "y");

    let summary = CapacityOrchestrator::new().calculate(&snapshot, &factory_lines()).summary;
    let models = &summary.production_by_model;
    assert_eq!(models.len(), 2);
    assert_eq!(models[0].product_id, "x");
    assert!(approx_eq(models[0].share_pct, 75.0));
    assert!(approx_eq(models[1].share_pct, 25.0));
}

#[test]
fn test_repeated_calculation_is_identical() {
    let mut snapshot = snapshot_with(vec![product("b", 10, 1200.0, 500.0, 0.25)]);
    assign(&mut snapshot, "S1-A-M2", "b");
    assign(&mut snapshot, "S2-A-M1", "b");
    assign(&mut snapshot, "S2-E-M1", "b");

    let orchestrator = CapacityOrchestrator::new();
    let lines = factory_lines();
    let first = orchestrator.calculate(&snapshot, &lines);
    let second = orchestrator.calculate(&snapshot, &lines);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
