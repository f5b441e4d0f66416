//! 產線指標計算
//!
//! 由目標產量推算建築數量、實際產量與功率。建築數量一律無條件進位，
//! 下游的相依計算必須使用進位後的實際產量。

use factory_core::recipe::SECONDS_PER_MINUTE;
use factory_core::{Catalog, PlannerConfig, ProductionLine, Recipe};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 附顯示名稱的配方項目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedAmount {
    pub item: String,
    pub amount: Decimal,
    pub name: String,
}

/// 產線指標
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineMetrics {
    /// 建築數量
    pub building_count: u32,

    /// 單一建築每分鐘產量
    pub items_per_minute_per_building: Decimal,

    /// 實際產量（每分鐘），必定不小於目標產量
    pub actual_quantity_per_minute: Decimal,

    /// 功率（MW）
    pub power_consumption_mw: Decimal,

    /// 建築類型
    pub building_type: String,

    /// 配方循環時間（秒）
    pub recipe_time: Decimal,

    /// 附名稱的原料
    pub ingredients: Vec<EnrichedAmount>,

    /// 附名稱的產品
    pub products: Vec<EnrichedAmount>,
}

/// 無法計算指標的原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineIssue {
    /// 目錄中找不到配方
    MissingRecipe(String),
    /// 目錄中找不到物品
    MissingItem(String),
    /// 配方不生產產線的物品
    RecipeMismatch { recipe: String, item: String },
    /// 循環時間或產量非正值，無法相除
    DivisionGuard { recipe: String },
}

impl LineIssue {
    pub fn describe(&self) -> String {
        match self {
            LineIssue::MissingRecipe(recipe) => format!("找不到配方 {}", recipe),
            LineIssue::MissingItem(item) => format!("找不到物品 {}", item),
            LineIssue::RecipeMismatch { recipe, item } => {
                format!("配方 {} 不生產 {}", recipe, item)
            }
            LineIssue::DivisionGuard { recipe } => {
                format!("配方 {} 的循環時間或產量無效", recipe)
            }
        }
    }
}

/// 已計算指標的產線
///
/// 無法計算時 `metrics` 為 `None`，產線原樣保留並附上原因。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedLine {
    pub line: ProductionLine,
    pub metrics: Option<LineMetrics>,
    pub issue: Option<LineIssue>,
}

impl EnrichedLine {
    fn resolved(line: ProductionLine, metrics: LineMetrics) -> Self {
        Self {
            line,
            metrics: Some(metrics),
            issue: None,
        }
    }

    fn unresolved(line: ProductionLine, issue: LineIssue) -> Self {
        Self {
            line,
            metrics: None,
            issue: Some(issue),
        }
    }

    /// 實際產量，未解析的產線視為零
    pub fn actual_quantity_per_minute(&self) -> Decimal {
        self.metrics
            .as_ref()
            .map(|m| m.actual_quantity_per_minute)
            .unwrap_or(Decimal::ZERO)
    }

    /// 功率，未解析的產線視為零
    pub fn power_consumption_mw(&self) -> Decimal {
        self.metrics
            .as_ref()
            .map(|m| m.power_consumption_mw)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn building_count(&self) -> u32 {
        self.metrics.as_ref().map(|m| m.building_count).unwrap_or(0)
    }

    pub fn is_resolved(&self) -> bool {
        self.metrics.is_some()
    }
}

/// 產線指標計算器
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// 計算單一產線的指標
    pub fn calculate(line: &ProductionLine, catalog: &Catalog, config: &PlannerConfig) -> EnrichedLine {
        let Some(recipe) = catalog.recipe(&line.recipe_class_name) else {
            return EnrichedLine::unresolved(
                line.clone(),
                LineIssue::MissingRecipe(line.recipe_class_name.clone()),
            );
        };

        if catalog.item(&line.item_class_name).is_none() {
            return EnrichedLine::unresolved(
                line.clone(),
                LineIssue::MissingItem(line.item_class_name.clone()),
            );
        }

        match Self::calculate_with_recipe(line, recipe, catalog, config) {
            Ok(metrics) => EnrichedLine::resolved(line.clone(), metrics),
            Err(issue) => {
                tracing::debug!("產線 {} 無法計算指標: {}", line.id, issue.describe());
                EnrichedLine::unresolved(line.clone(), issue)
            }
        }
    }

    /// 以指定配方計算指標
    pub fn calculate_with_recipe(
        line: &ProductionLine,
        recipe: &Recipe,
        catalog: &Catalog,
        config: &PlannerConfig,
    ) -> Result<LineMetrics, LineIssue> {
        if !recipe.produces(&line.item_class_name) {
            return Err(LineIssue::RecipeMismatch {
                recipe: recipe.class_name.clone(),
                item: line.item_class_name.clone(),
            });
        }

        let division_guard = || LineIssue::DivisionGuard {
            recipe: recipe.class_name.clone(),
        };

        let amount_per_cycle = recipe
            .product_amount(&line.item_class_name)
            .ok_or_else(division_guard)?;
        let items_per_minute = recipe
            .per_minute(amount_per_cycle)
            .filter(|rate| *rate > Decimal::ZERO)
            .ok_or_else(division_guard)?;

        let building_count =
            Self::building_count(line.target_quantity_per_minute, amount_per_cycle, recipe.time)
                .ok_or_else(division_guard)?;

        let actual_quantity_per_minute = recipe
            .per_minute_for(amount_per_cycle, building_count)
            .ok_or_else(division_guard)?;
        let power_consumption_mw = Decimal::from(building_count)
            * recipe.power_per_building(config.default_power_per_building);

        let building_type = recipe
            .building_type()
            .unwrap_or(config.unknown_building_label.as_str())
            .to_string();

        let enrich = |entries: &[factory_core::ItemAmount]| -> Vec<EnrichedAmount> {
            entries
                .iter()
                .map(|entry| EnrichedAmount {
                    item: entry.item.clone(),
                    amount: entry.amount,
                    name: catalog.display_name(&entry.item).to_string(),
                })
                .collect()
        };

        Ok(LineMetrics {
            building_count,
            items_per_minute_per_building: items_per_minute,
            actual_quantity_per_minute,
            power_consumption_mw,
            building_type,
            recipe_time: recipe.time,
            ingredients: enrich(&recipe.ingredients),
            products: enrich(&recipe.products),
        })
    }

    /// 建築數量 = ceil(目標 / 單棟產量) = ceil(目標 × 循環時間 / (每循環數量 × 60))
    ///
    /// 以單一除法計算，單棟產量為循環小數（如 7 秒配方）時不會多算一棟。
    /// 目標為零或負值時回傳 0；每循環數量或循環時間非正值、或數量溢位時回傳 `None`。
    pub fn building_count(
        target_per_minute: Decimal,
        amount_per_cycle: Decimal,
        recipe_time: Decimal,
    ) -> Option<u32> {
        if amount_per_cycle <= Decimal::ZERO || recipe_time <= Decimal::ZERO {
            return None;
        }
        if target_per_minute <= Decimal::ZERO {
            return Some(0);
        }
        let per_cycle_minute = amount_per_cycle.checked_mul(SECONDS_PER_MINUTE)?;
        target_per_minute
            .checked_mul(recipe_time)?
            .checked_div(per_cycle_minute)?
            .ceil()
            .to_u32()
    }
}
