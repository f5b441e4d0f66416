//! 跨工廠供應查詢

use std::collections::BTreeMap;

use factory_core::PlannerConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dependency::{DependencyAnalyzer, IngredientRequirement};
use crate::metrics::EnrichedLine;

/// 工廠的物品產量彙總
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoryOutput {
    pub factory_id: Uuid,
    pub factory_name: String,
    /// 物品 -> 每分鐘實際產量（同物品多條產線相加）
    pub produced: BTreeMap<String, Decimal>,
}

impl FactoryOutput {
    /// 由已計算指標的產線彙總產量
    pub fn from_lines(
        factory_id: Uuid,
        factory_name: impl Into<String>,
        lines: &[EnrichedLine],
        config: &PlannerConfig,
    ) -> Self {
        let mut produced: BTreeMap<String, Decimal> = BTreeMap::new();
        for line in lines
            .iter()
            .filter(|l| DependencyAnalyzer::is_considered(l, config))
        {
            *produced
                .entry(line.line.item_class_name.clone())
                .or_insert(Decimal::ZERO) += line.actual_quantity_per_minute();
        }

        Self {
            factory_id,
            factory_name: factory_name.into(),
            produced,
        }
    }

    /// 指定物品的每分鐘產量
    pub fn rate_of(&self, item: &str) -> Decimal {
        self.produced.get(item).copied().unwrap_or(Decimal::ZERO)
    }
}

/// 可供應的來源工廠
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSource {
    pub factory_id: Uuid,
    pub factory_name: String,
    pub available_per_minute: Decimal,
}

/// 附來源清單的原料需求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRequirement {
    pub requirement: IngredientRequirement,
    pub candidates: Vec<CandidateSource>,
}

/// 跨工廠供應查詢器
pub struct AvailabilityResolver;

impl AvailabilityResolver {
    /// 為每項需求找出可供應的其他工廠
    ///
    /// 只列出產量大於零的工廠，且永遠排除目前工廠本身。
    pub fn resolve(
        current_factory_id: Uuid,
        requirements: Vec<IngredientRequirement>,
        others: &[FactoryOutput],
    ) -> Vec<ResolvedRequirement> {
        requirements
            .into_iter()
            .map(|requirement| {
                let candidates = Self::candidates_for(
                    current_factory_id,
                    &requirement.item_class_name,
                    others,
                );
                tracing::debug!(
                    "原料 {} 可由 {} 座工廠供應",
                    requirement.item_class_name,
                    candidates.len()
                );
                ResolvedRequirement {
                    requirement,
                    candidates,
                }
            })
            .collect()
    }

    /// 指定物品的來源工廠
    pub fn candidates_for(
        current_factory_id: Uuid,
        item: &str,
        others: &[FactoryOutput],
    ) -> Vec<CandidateSource> {
        others
            .iter()
            .filter(|o| o.factory_id != current_factory_id)
            .filter_map(|o| {
                let rate = o.rate_of(item);
                (rate > Decimal::ZERO).then(|| CandidateSource {
                    factory_id: o.factory_id,
                    factory_name: o.factory_name.clone(),
                    available_per_minute: rate,
                })
            })
            .collect()
    }
}
