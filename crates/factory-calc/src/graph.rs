//! 工廠相依圖資料
//!
//! 節點為工廠，邊為有效的輸入記錄（依來源、目標、物品合併）。只產生資料，不負責繪製。

use std::collections::{BTreeMap, BTreeSet};

use factory_core::{Catalog, PlanningSnapshot};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: Uuid,
    pub target: Uuid,
    pub item_class_name: String,
    pub item_name: String,
    pub amount_per_minute: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl DependencyGraph {
    /// 由快照建立相依圖；端點不在快照中的輸入會被略過
    pub fn build(snapshot: &PlanningSnapshot, catalog: &Catalog) -> Self {
        let nodes: Vec<GraphNode> = snapshot
            .factories_ordered()
            .into_iter()
            .map(|f| GraphNode {
                id: f.id,
                name: f.name.clone(),
            })
            .collect();
        let known: BTreeSet<Uuid> = nodes.iter().map(|n| n.id).collect();

        let mut merged: BTreeMap<(Uuid, Uuid, &str), Decimal> = BTreeMap::new();
        for import in snapshot.imports.iter().filter(|i| i.active) {
            if !known.contains(&import.source_factory_id) || !known.contains(&import.target_factory_id) {
                tracing::debug!("輸入 {} 的端點不在快照中，略過", import.id);
                continue;
            }
            *merged
                .entry((
                    import.source_factory_id,
                    import.target_factory_id,
                    import.item_class_name.as_str(),
                ))
                .or_insert(Decimal::ZERO) += import.required_amount;
        }

        let edges = merged
            .into_iter()
            .map(|((source, target, item), amount)| GraphEdge {
                source,
                target,
                item_class_name: item.to_string(),
                item_name: catalog.display_name(item).to_string(),
                amount_per_minute: amount,
            })
            .collect();

        Self { nodes, edges }
    }

    /// 供應給指定工廠的來源工廠
    pub fn suppliers_of(&self, factory_id: Uuid) -> BTreeSet<Uuid> {
        self.edges
            .iter()
            .filter(|e| e.target == factory_id)
            .map(|e| e.source)
            .collect()
    }

    /// 指定工廠供應的目標工廠
    pub fn consumers_of(&self, factory_id: Uuid) -> BTreeSet<Uuid> {
        self.edges
            .iter()
            .filter(|e| e.source == factory_id)
            .map(|e| e.target)
            .collect()
    }
}
