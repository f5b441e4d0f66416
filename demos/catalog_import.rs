//! 目錄載入示例
//!
//! 用法：`cargo run --example catalog_import -- <game-data.json> [planner-config.json]`
//! 未指定檔案時使用內建的小型目錄。

use factory_planner::{Catalog, PlannerConfig};
use tracing_subscriber::EnvFilter;

const SAMPLE: &str = r#"{
    "items": {
        "Desc_OreIron_C": {"name": "Iron Ore", "stackSize": 100},
        "Desc_IronIngot_C": {"name": "Iron Ingot", "stackSize": 100},
        "Desc_IronPlate_C": {"name": "Iron Plate", "stackSize": 200}
    },
    "recipes": {
        "Recipe_IngotIron_C": {
            "name": "Iron Ingot",
            "time": 2,
            "ingredients": [{"item": "Desc_OreIron_C", "amount": 1}],
            "products": [{"item": "Desc_IronIngot_C", "amount": 1}],
            "producedIn": ["Desc_SmelterMk1_C"],
            "maxPower": 4
        },
        "Recipe_IronPlate_C": {
            "name": "Iron Plate",
            "time": 6,
            "ingredients": [{"item": "Desc_IronIngot_C", "amount": 3}],
            "products": [{"item": "Desc_IronPlate_C", "amount": 2}],
            "producedIn": ["Desc_ConstructorMk1_C"],
            "maxPower": 4
        },
        "Recipe_Alternate_CoatedIronPlate_C": {
            "name": "Alternate: Coated Iron Plate",
            "alternate": true,
            "time": 0,
            "products": [{"item": "Desc_IronPlate_C", "amount": 15}]
        }
    }
}"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);

    let (catalog, report) = match args.next() {
        Some(path) => {
            println!("=== 載入目錄: {} ===\n", path);
            Catalog::load_file(path)?
        }
        None => {
            println!("=== 載入內建目錄 ===\n");
            Catalog::from_json(SAMPLE)?
        }
    };

    let config = match args.next() {
        Some(path) => PlannerConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => PlannerConfig::default(),
    };

    println!("物品: {}，配方: {}", report.items_loaded, report.recipes_loaded);
    if !report.is_clean() {
        println!("被拒絕的項目:");
        for rejected in &report.rejected {
            println!("  - {:?} {}: {}", rejected.kind, rejected.class_name, rejected.reason);
        }
    }

    println!("\n規劃參數: 容差 {}，預設耗電 {} MW", config.satisfaction_tolerance, config.default_power_per_building);

    let item = "Desc_IronPlate_C";
    println!("\n{} 的配方:", catalog.display_name(item));
    for recipe in catalog.recipes_producing(item) {
        let rate = recipe
            .product_per_minute(item)
            .map(|r| format!("{}/min", r))
            .unwrap_or_else(|| "無法計算".to_string());
        println!("  - {}（{}）單棟 {}", recipe.name, recipe.class_name, rate);
    }

    Ok(())
}
