//! 原料相依分析
//!
//! 找出工廠配方所需、但本工廠沒有任何產線生產的原料，並依實際產量換算每分鐘需求。

use std::collections::{HashMap, HashSet};

use factory_core::PlannerConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::metrics::EnrichedLine;

/// 單一原料的總需求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientRequirement {
    /// 原料物品
    pub item_class_name: String,

    /// 顯示名稱
    pub name: String,

    /// 所有產線合計的每分鐘需求
    pub required_per_minute: Decimal,

    /// 消耗此原料的產線
    pub consumer_line_ids: Vec<Uuid>,
}

/// 原料相依分析器
pub struct DependencyAnalyzer;

impl DependencyAnalyzer {
    /// 分析工廠的外部原料需求
    ///
    /// 結果依原料首次出現的順序排列；相同快照重複分析結果相同。
    pub fn analyze(lines: &[EnrichedLine], config: &PlannerConfig) -> Vec<IngredientRequirement> {
        let considered: Vec<&EnrichedLine> = lines
            .iter()
            .filter(|l| Self::is_considered(l, config))
            .collect();

        let local = Self::locally_produced(&considered);

        let mut requirements: Vec<IngredientRequirement> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for enriched in considered {
            if enriched.metrics.is_none() {
                tracing::debug!("產線 {} 尚未解析配方，本次略過", enriched.line.id);
                continue;
            }

            for (item, name, rate) in Self::line_requirements(enriched) {
                if local.contains(item.as_str()) {
                    continue;
                }

                match index.get(&item) {
                    Some(&i) => {
                        let existing = &mut requirements[i];
                        existing.required_per_minute += rate;
                        existing.consumer_line_ids.push(enriched.line.id);
                    }
                    None => {
                        index.insert(item.clone(), requirements.len());
                        requirements.push(IngredientRequirement {
                            item_class_name: item,
                            name,
                            required_per_minute: rate,
                            consumer_line_ids: vec![enriched.line.id],
                        });
                    }
                }
            }
        }

        tracing::debug!("外部原料需求 {} 項", requirements.len());
        requirements
    }

    /// 產線是否納入分析
    pub fn is_considered(line: &EnrichedLine, config: &PlannerConfig) -> bool {
        line.line.active || config.include_inactive_lines
    }

    /// 本工廠生產的物品集合
    pub fn locally_produced<'a>(lines: &[&'a EnrichedLine]) -> HashSet<&'a str> {
        lines
            .iter()
            .map(|l| l.line.item_class_name.as_str())
            .collect()
    }

    /// 單一產線各原料的每分鐘需求
    ///
    /// 需求 = (原料數量 / 循環時間) × 60 × (實際產量 / 單棟產量)。
    /// 實際產量 / 單棟產量即為建築數量，先乘完再除以循環時間，只做一次除法。
    pub fn line_requirements(line: &EnrichedLine) -> Vec<(String, String, Decimal)> {
        let Some(metrics) = &line.metrics else {
            return Vec::new();
        };
        if metrics.recipe_time <= Decimal::ZERO {
            return Vec::new();
        }

        let buildings = Decimal::from(metrics.building_count);
        metrics
            .ingredients
            .iter()
            .filter_map(|ingredient| {
                let rate = ingredient
                    .amount
                    .checked_mul(factory_core::recipe::SECONDS_PER_MINUTE)?
                    .checked_mul(buildings)?
                    .checked_div(metrics.recipe_time)?;
                Some((ingredient.item.clone(), ingredient.name.clone(), rate))
            })
            .collect()
    }
}
