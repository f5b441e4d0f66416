//! 物品與配方目錄
//!
//! 遊戲資料檔在此一次性載入並驗證，之後各計算模組直接信任目錄內容。
//! 資料檔格式：`{"items": {className: {...}}, "recipes": {className: {...}}}`

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::item::Item;
use crate::recipe::{ItemAmount, Recipe};
use crate::{PlanError, Result};

/// 被拒絕的目錄項目類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    Item,
    Recipe,
}

/// 被拒絕的目錄項目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedEntry {
    pub class_name: String,
    pub kind: EntryKind,
    pub reason: String,
}

/// 目錄載入報告
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogLoadReport {
    /// 載入的物品數量
    pub items_loaded: usize,
    /// 載入的配方數量
    pub recipes_loaded: usize,
    /// 被拒絕的項目
    pub rejected: Vec<RejectedEntry>,
}

impl CatalogLoadReport {
    /// 是否全部載入成功
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// 資料檔頂層結構
#[derive(Debug, Deserialize)]
struct RawGameData {
    #[serde(default)]
    items: BTreeMap<String, RawItem>,
    #[serde(default)]
    recipes: BTreeMap<String, RawRecipe>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawItem {
    slug: Option<String>,
    name: Option<String>,
    description: Option<String>,
    sink_points: Option<u64>,
    stack_size: Option<u32>,
    energy_value: Option<Decimal>,
    radioactive_decay: Option<Decimal>,
    liquid: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawRecipe {
    name: Option<String>,
    alternate: Option<bool>,
    time: Option<Decimal>,
    ingredients: Vec<ItemAmount>,
    products: Vec<ItemAmount>,
    produced_in: Vec<String>,
    is_variable_power: Option<bool>,
    min_power: Option<Decimal>,
    max_power: Option<Decimal>,
}

/// 物品與配方目錄
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: HashMap<String, Item>,
    recipes: HashMap<String, Recipe>,
}

impl Catalog {
    /// 創建空目錄
    pub fn new() -> Self {
        Self::default()
    }

    /// 從 JSON 字串載入目錄
    ///
    /// 只有 JSON 本身無法解析才會失敗；個別不合法的項目會被拒絕並記錄在報告中。
    pub fn from_json(json: &str) -> Result<(Self, CatalogLoadReport)> {
        let raw: RawGameData = serde_json::from_str(json)?;
        Ok(Self::from_raw(raw))
    }

    /// 從資料檔載入目錄
    pub fn load_file(path: impl AsRef<Path>) -> Result<(Self, CatalogLoadReport)> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| PlanError::Other(format!("無法讀取資料檔 {}: {}", path.display(), e)))?;
        let raw: RawGameData = serde_json::from_slice(&bytes)?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawGameData) -> (Self, CatalogLoadReport) {
        tracing::info!(
            "開始載入目錄：物品 {} 筆，配方 {} 筆",
            raw.items.len(),
            raw.recipes.len()
        );

        let mut catalog = Self::new();
        let mut report = CatalogLoadReport::default();

        for (class_name, data) in raw.items {
            let item = Item {
                slug: data.slug.unwrap_or_else(|| class_name.to_lowercase()),
                name: data.name.unwrap_or_else(|| class_name.clone()),
                description: data.description.unwrap_or_default(),
                sink_points: data.sink_points.unwrap_or(0),
                stack_size: data.stack_size.filter(|s| *s > 0).unwrap_or(1),
                energy_value: data.energy_value.unwrap_or(Decimal::ZERO),
                radioactive_decay: data.radioactive_decay.unwrap_or(Decimal::ZERO),
                liquid: data.liquid.unwrap_or(false),
                class_name,
            };
            match catalog.add_item(item.clone()) {
                Ok(()) => report.items_loaded += 1,
                Err(err) => report.rejected.push(RejectedEntry {
                    class_name: item.class_name,
                    kind: EntryKind::Item,
                    reason: err.to_string(),
                }),
            }
        }

        for (class_name, data) in raw.recipes {
            let recipe = Recipe {
                name: data.name.unwrap_or_else(|| class_name.clone()),
                alternate: data.alternate.unwrap_or(false),
                time: data.time.unwrap_or(Decimal::ONE),
                ingredients: data.ingredients,
                products: data.products,
                produced_in: data.produced_in,
                is_variable_power: data.is_variable_power.unwrap_or(false),
                min_power: data.min_power.unwrap_or(Decimal::ZERO),
                max_power: data.max_power,
                class_name: class_name.clone(),
            };
            match catalog.add_recipe(recipe) {
                Ok(()) => report.recipes_loaded += 1,
                Err(err) => {
                    tracing::warn!("拒絕配方 {}: {}", class_name, err);
                    report.rejected.push(RejectedEntry {
                        class_name,
                        kind: EntryKind::Recipe,
                        reason: err.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "目錄載入完成：物品 {} 筆，配方 {} 筆，拒絕 {} 筆",
            report.items_loaded,
            report.recipes_loaded,
            report.rejected.len()
        );

        (catalog, report)
    }

    /// 加入物品
    pub fn add_item(&mut self, item: Item) -> Result<()> {
        if item.class_name.trim().is_empty() {
            return Err(PlanError::InvalidItem(item.class_name));
        }
        self.items.insert(item.class_name.clone(), item);
        Ok(())
    }

    /// 加入配方（驗證循環時間與數量）
    pub fn add_recipe(&mut self, recipe: Recipe) -> Result<()> {
        Self::validate_recipe(&recipe)?;
        self.recipes.insert(recipe.class_name.clone(), recipe);
        Ok(())
    }

    fn validate_recipe(recipe: &Recipe) -> Result<()> {
        let invalid = |reason: &str| PlanError::InvalidRecipe {
            recipe: recipe.class_name.clone(),
            reason: reason.to_string(),
        };

        if recipe.class_name.trim().is_empty() {
            return Err(invalid("識別碼為空"));
        }
        if !recipe.has_valid_time() {
            return Err(invalid("循環時間必須大於零"));
        }
        if recipe
            .ingredients
            .iter()
            .chain(recipe.products.iter())
            .any(|entry| entry.amount < Decimal::ZERO)
        {
            return Err(invalid("數量不可為負"));
        }
        if recipe.max_power.is_some_and(|p| p < Decimal::ZERO) {
            return Err(invalid("功率不可為負"));
        }
        Ok(())
    }

    /// 查詢物品
    pub fn item(&self, class_name: &str) -> Option<&Item> {
        self.items.get(class_name)
    }

    /// 查詢配方
    pub fn recipe(&self, class_name: &str) -> Option<&Recipe> {
        self.recipes.get(class_name)
    }

    /// 物品顯示名稱，查無時退回識別碼
    pub fn display_name<'a>(&'a self, class_name: &'a str) -> &'a str {
        self.items
            .get(class_name)
            .map(|item| item.name.as_str())
            .unwrap_or(class_name)
    }

    /// 所有生產指定物品的配方（依識別碼排序）
    pub fn recipes_producing(&self, item: &str) -> Vec<&Recipe> {
        let mut recipes: Vec<_> = self.recipes.values().filter(|r| r.produces(item)).collect();
        recipes.sort_by(|a, b| a.class_name.cmp(&b.class_name));
        recipes
    }

    /// 驗證產線的物品與配方組合
    pub fn validate_line(&self, item: &str, recipe: &str) -> Result<()> {
        if self.item(item).is_none() {
            return Err(PlanError::InvalidItem(item.to_string()));
        }
        let found = self.recipe(recipe).ok_or_else(|| PlanError::InvalidRecipe {
            recipe: recipe.to_string(),
            reason: "目錄中不存在".to_string(),
        })?;
        if !found.produces(item) {
            return Err(PlanError::RecipeMismatch {
                recipe: recipe.to_string(),
                item: item.to_string(),
            });
        }
        Ok(())
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }
}
