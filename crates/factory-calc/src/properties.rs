//! 計算性質測試

use factory_core::{Catalog, Item, PlannerConfig, ProductionLine, Recipe};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::dependency::DependencyAnalyzer;
use crate::metrics::{EnrichedLine, MetricsCalculator};
use crate::reconciliation::{clamp_import_rate, increase_offer};

fn catalog(time: i64, ingredient: i64, product: i64) -> Catalog {
    let mut catalog = Catalog::new();
    for item in ["A", "B", "X"] {
        catalog.add_item(Item::new(item, item)).unwrap();
    }
    catalog
        .add_recipe(
            Recipe::new("R_A", Decimal::from(time))
                .with_ingredient("X", Decimal::from(ingredient))
                .with_product("A", Decimal::from(product)),
        )
        .unwrap();
    catalog
        .add_recipe(
            Recipe::new("R_B", Decimal::from(time))
                .with_ingredient("X", Decimal::from(ingredient))
                .with_product("B", Decimal::from(product)),
        )
        .unwrap();
    catalog
        .add_recipe(Recipe::new("R_X", Decimal::from(time)).with_product("X", Decimal::from(product)))
        .unwrap();
    catalog
}

fn enrich(catalog: &Catalog, lines: &[ProductionLine]) -> Vec<EnrichedLine> {
    let config = PlannerConfig::default();
    lines
        .iter()
        .map(|l| MetricsCalculator::calculate(l, catalog, &config))
        .collect()
}

fn rate(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

proptest! {
    #[test]
    fn building_count_is_exact_ceiling(
        time in 1i64..=120,
        product in 1i64..50,
        target_cents in 0i64..1_000_000,
    ) {
        let catalog = catalog(time, 1, product);
        let target = rate(target_cents);
        let line = ProductionLine::new(Uuid::new_v4(), "A", "R_A", target);
        let metrics = MetricsCalculator::calculate(&line, &catalog, &PlannerConfig::default())
            .metrics
            .unwrap();

        // 以整數運算：目標(分) × 時間 對 每棟(分/min) = 產量 × 60 × 100
        let demand = i128::from(target_cents) * i128::from(time);
        let per_building = i128::from(product) * 6000;
        let expected = (demand + per_building - 1) / per_building;
        let buildings = i128::from(metrics.building_count);

        prop_assert_eq!(buildings, expected);
        prop_assert!(buildings * per_building >= demand);
        if buildings > 0 {
            prop_assert!((buildings - 1) * per_building < demand);
        }
        prop_assert!(metrics.actual_quantity_per_minute >= target);
    }

    #[test]
    fn dependency_analysis_is_idempotent(
        time in 1i64..120,
        ingredient in 1i64..20,
        product in 1i64..20,
        a in 1i64..100_000,
        b in 1i64..100_000,
    ) {
        let catalog = catalog(time, ingredient, product);
        let factory = Uuid::new_v4();
        let lines = enrich(&catalog, &[
            ProductionLine::new(factory, "A", "R_A", rate(a)),
            ProductionLine::new(factory, "B", "R_B", rate(b)),
        ]);
        let config = PlannerConfig::default();

        prop_assert_eq!(
            DependencyAnalyzer::analyze(&lines, &config),
            DependencyAnalyzer::analyze(&lines, &config)
        );
    }

    #[test]
    fn shared_ingredient_is_summed(
        time in 1i64..120,
        ingredient in 1i64..20,
        product in 1i64..20,
        a in 1i64..100_000,
        b in 1i64..100_000,
    ) {
        let catalog = catalog(time, ingredient, product);
        let factory = Uuid::new_v4();
        let lines = enrich(&catalog, &[
            ProductionLine::new(factory, "A", "R_A", rate(a)),
            ProductionLine::new(factory, "B", "R_B", rate(b)),
        ]);

        let individual: Decimal = lines
            .iter()
            .flat_map(DependencyAnalyzer::line_requirements)
            .map(|(_, _, amount)| amount)
            .sum();
        let requirements = DependencyAnalyzer::analyze(&lines, &PlannerConfig::default());

        prop_assert_eq!(requirements.len(), 1);
        prop_assert_eq!(requirements[0].required_per_minute, individual);
    }

    #[test]
    fn locally_produced_ingredient_is_never_missing(
        time in 1i64..120,
        ingredient in 1i64..20,
        product in 1i64..20,
        a in 1i64..100_000,
        x in 0i64..100_000,
    ) {
        let catalog = catalog(time, ingredient, product);
        let factory = Uuid::new_v4();
        let lines = enrich(&catalog, &[
            ProductionLine::new(factory, "A", "R_A", rate(a)),
            ProductionLine::new(factory, "X", "R_X", rate(x)),
        ]);

        let requirements = DependencyAnalyzer::analyze(&lines, &PlannerConfig::default());

        prop_assert!(requirements.iter().all(|r| r.item_class_name != "X"));
    }

    #[test]
    fn import_suggestions_never_exceed_capacity(
        requested in 0i64..100_000,
        still_needed in 0i64..100_000,
        available in 0i64..100_000,
        existing in 0i64..100_000,
    ) {
        let available = rate(available);
        let existing = rate(existing).min(available);

        prop_assert!(clamp_import_rate(rate(requested), rate(still_needed), available) <= available);

        let offer = increase_offer(available, existing, rate(still_needed));
        prop_assert!(offer >= Decimal::ZERO);
        prop_assert!(existing + offer <= available);
    }
}
