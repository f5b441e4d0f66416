//! 兩座工廠的相依分析示例
//!
//! F1 生產 Rotor，需要 Rod；F2 生產 Rod。示範缺料查詢、建立輸入，
//! 以及來源減產後的產能衝突。

use factory_planner::{
    Catalog, Factory, FactoryAnalysis, FactoryPlanner, IncrementalPlanner, Item, Mutation, PlannerConfig,
    PlanningSnapshot, ProductionLine, Recipe,
};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== 兩座工廠相依分析示例 ===\n");

    // ========== 1. 建立目錄 ==========
    let mut catalog = Catalog::new();
    catalog.add_item(Item::new("Desc_Rotor_C", "Rotor").with_stack_size(100))?;
    catalog.add_item(Item::new("Desc_IronRod_C", "Iron Rod").with_stack_size(200))?;
    catalog.add_item(Item::new("Desc_IronIngot_C", "Iron Ingot").with_stack_size(100))?;
    catalog.add_recipe(
        Recipe::new("Recipe_Rotor_C", Decimal::from(30))
            .with_name("Rotor")
            .with_ingredient("Desc_IronRod_C", Decimal::from(4))
            .with_product("Desc_Rotor_C", Decimal::from(5))
            .with_building("Desc_AssemblerMk1_C")
            .with_max_power(Decimal::from(15)),
    )?;
    catalog.add_recipe(
        Recipe::new("Recipe_IronRod_C", Decimal::from(60))
            .with_name("Iron Rod")
            .with_ingredient("Desc_IronIngot_C", Decimal::ONE)
            .with_product("Desc_IronRod_C", Decimal::ONE)
            .with_building("Desc_ConstructorMk1_C")
            .with_max_power(Decimal::from(4)),
    )?;

    // ========== 2. 建立工廠與產線 ==========
    let f1 = Factory::new("Rotor Works", "pioneer").with_position(0);
    let f2 = Factory::new("Rod Mill", "pioneer").with_position(1);
    let rod_line = ProductionLine::new(f2.id, "Desc_IronRod_C", "Recipe_IronRod_C", Decimal::from(12));
    let rod_line_id = rod_line.id;

    let snapshot = PlanningSnapshot::new()
        .with_factory(f1.clone())
        .with_factory(f2.clone())
        .with_line(ProductionLine::new(
            f1.id,
            "Desc_Rotor_C",
            "Recipe_Rotor_C",
            Decimal::from(10),
        ))
        .with_line(rod_line);

    let planner = FactoryPlanner::new(catalog, PlannerConfig::default());

    // ========== 3. 初次分析 ==========
    println!("步驟 1: 初次分析");
    for analysis in planner.analyze_all(&snapshot) {
        print_analysis(&analysis);
    }

    // ========== 4. 建立輸入（要求量會被夾限） ==========
    println!("步驟 2: 從 {} 輸入 Iron Rod（要求 100/min）", f2.name);
    let mut incremental = IncrementalPlanner::new(planner, snapshot);
    let applied = incremental.apply(Mutation::CreateImport {
        target_factory_id: f1.id,
        source_factory_id: f2.id,
        item_class_name: "Desc_IronRod_C".to_string(),
        requested_per_minute: Decimal::from(100),
    })?;
    println!("   實際寫入: {:?}/min\n", applied.applied_rate);
    incremental.refresh();
    if let Some(analysis) = incremental.analysis(f1.id) {
        print_analysis(analysis);
    }

    // ========== 5. 來源減產 ==========
    println!("步驟 3: {} 減產至 5/min", f2.name);
    incremental.apply(Mutation::UpdateLineTarget {
        line_id: rod_line_id,
        target_per_minute: Decimal::from(5),
    })?;
    incremental.refresh();
    if let Some(analysis) = incremental.analysis(f1.id) {
        print_analysis(analysis);
    }

    Ok(())
}

fn print_analysis(analysis: &FactoryAnalysis) {
    println!(
        "工廠 {}：建築 {} 棟，耗電 {} MW",
        analysis.factory_name, analysis.total_buildings, analysis.total_power_mw
    );

    for line in &analysis.lines {
        println!(
            "  - 產線 {}：{} 棟，實際 {}/min",
            line.line.item_class_name,
            line.building_count(),
            line.actual_quantity_per_minute()
        );
    }

    if analysis.is_self_sufficient() {
        println!("  原料皆已滿足");
    }
    for missing in &analysis.missing_ingredients {
        println!(
            "  ! 缺少 {}：需求 {}/min，仍缺 {}/min",
            missing.name, missing.required_per_minute, missing.still_needed_per_minute
        );
        for source in &missing.candidate_sources {
            println!(
                "      來源 {}（產量 {}/min）→ {:?} {}/min",
                source.factory_name, source.available_per_minute, source.action, source.suggested_per_minute
            );
        }
    }

    for warning in &analysis.warnings {
        println!("  [{:?}] {}: {}", warning.severity, warning.subject, warning.message);
    }
    println!();
}
