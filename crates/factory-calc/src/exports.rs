//! 工廠輸出彙總（輸入記錄的來源端視角）

use std::collections::BTreeMap;

use factory_core::{Catalog, PlanningSnapshot};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 輸出到單一目標工廠的物品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedItem {
    pub item_class_name: String,
    pub name: String,
    pub total_per_minute: Decimal,
}

/// 目標工廠
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportTarget {
    pub factory_id: Uuid,
    pub factory_name: String,
    pub items: Vec<ExportedItem>,
}

/// 工廠輸出彙總
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSummary {
    pub source_factory_id: Uuid,
    pub targets: Vec<ExportTarget>,
    pub total_per_minute: Decimal,
}

impl ExportSummary {
    /// 彙總來源工廠的有效輸出，依目標工廠、物品分組
    ///
    /// `item_filter` 指定時只計算該物品。
    pub fn build(
        snapshot: &PlanningSnapshot,
        catalog: &Catalog,
        source_factory_id: Uuid,
        item_filter: Option<&str>,
    ) -> Self {
        let mut grouped: BTreeMap<Uuid, BTreeMap<&str, Decimal>> = BTreeMap::new();
        let mut total = Decimal::ZERO;

        for import in snapshot
            .imports_from(source_factory_id)
            .filter(|i| item_filter.map_or(true, |item| i.item_class_name == item))
        {
            *grouped
                .entry(import.target_factory_id)
                .or_default()
                .entry(import.item_class_name.as_str())
                .or_insert(Decimal::ZERO) += import.required_amount;
            total += import.required_amount;
        }

        let mut targets: Vec<ExportTarget> = grouped
            .into_iter()
            .map(|(factory_id, items)| ExportTarget {
                factory_id,
                factory_name: snapshot
                    .factory_name(factory_id)
                    .unwrap_or("Unknown Factory")
                    .to_string(),
                items: items
                    .into_iter()
                    .map(|(item, amount)| ExportedItem {
                        item_class_name: item.to_string(),
                        name: catalog.display_name(item).to_string(),
                        total_per_minute: amount,
                    })
                    .collect(),
            })
            .collect();
        targets.sort_by(|a, b| a.factory_name.cmp(&b.factory_name));

        Self {
            source_factory_id,
            targets,
            total_per_minute: total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use factory_core::{Factory, FactoryImport, Item};

    #[test]
    fn test_grouped_exports() {
        let mut catalog = Catalog::new();
        catalog.add_item(Item::new("B", "Item B")).unwrap();

        let source = Factory::new("Source", "u");
        let alpha = Factory::new("Alpha", "u");
        let beta = Factory::new("Beta", "u");

        let snapshot = PlanningSnapshot::new()
            .with_factory(source.clone())
            .with_factory(alpha.clone())
            .with_factory(beta.clone())
            .with_import(FactoryImport::new(alpha.id, source.id, "B", Decimal::from(3)))
            .with_import(FactoryImport::new(alpha.id, source.id, "B", Decimal::from(2)))
            .with_import(FactoryImport::new(alpha.id, source.id, "C", Decimal::from(1)))
            .with_import(FactoryImport::new(beta.id, source.id, "B", Decimal::from(4)))
            .with_import(FactoryImport::new(beta.id, source.id, "B", Decimal::from(9)).inactive());

        let summary = ExportSummary::build(&snapshot, &catalog, source.id, None);

        assert_eq!(summary.total_per_minute, Decimal::from(10));
        assert_eq!(summary.targets.len(), 2);
        assert_eq!(summary.targets[0].factory_name, "Alpha");
        assert_eq!(summary.targets[0].items.len(), 2);
        assert_eq!(summary.targets[0].items[0].name, "Item B");
        assert_eq!(summary.targets[0].items[0].total_per_minute, Decimal::from(5));
        assert_eq!(summary.targets[0].items[1].name, "C");
        assert_eq!(summary.targets[1].items[0].total_per_minute, Decimal::from(4));

        let only_c = ExportSummary::build(&snapshot, &catalog, source.id, Some("C"));
        assert_eq!(only_c.total_per_minute, Decimal::ONE);
        assert_eq!(only_c.targets.len(), 1);

        assert!(ExportSummary::build(&snapshot, &catalog, alpha.id, None).is_empty());
    }
}
