//! 配方模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 每分鐘的秒數
pub const SECONDS_PER_MINUTE: Decimal = Decimal::from_parts(60, 0, 0, false, 0);

/// 配方中的物品與每循環數量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAmount {
    /// 物品識別碼
    pub item: String,
    /// 每循環數量
    pub amount: Decimal,
}

impl ItemAmount {
    pub fn new(item: impl Into<String>, amount: Decimal) -> Self {
        Self {
            item: item.into(),
            amount,
        }
    }
}

/// 配方（參考資料，載入後不可變）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// 配方識別碼
    pub class_name: String,

    /// 顯示名稱
    pub name: String,

    /// 是否為替代配方
    pub alternate: bool,

    /// 循環時間（秒）
    pub time: Decimal,

    /// 原料（有序）
    pub ingredients: Vec<ItemAmount>,

    /// 產品（有序）
    pub products: Vec<ItemAmount>,

    /// 可執行此配方的建築
    pub produced_in: Vec<String>,

    /// 是否為變動功率
    pub is_variable_power: bool,

    /// 最小功率（MW）
    pub min_power: Decimal,

    /// 最大功率（MW），缺省時由設定提供預設值
    pub max_power: Option<Decimal>,
}

impl Recipe {
    /// 創建新的配方
    pub fn new(class_name: impl Into<String>, time: Decimal) -> Self {
        let class_name = class_name.into();
        Self {
            name: class_name.clone(),
            class_name,
            alternate: false,
            time,
            ingredients: Vec::new(),
            products: Vec::new(),
            produced_in: Vec::new(),
            is_variable_power: false,
            min_power: Decimal::ZERO,
            max_power: None,
        }
    }

    /// 建構器模式：設置顯示名稱
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// 建構器模式：添加原料
    pub fn with_ingredient(mut self, item: impl Into<String>, amount: Decimal) -> Self {
        self.ingredients.push(ItemAmount::new(item, amount));
        self
    }

    /// 建構器模式：添加產品
    pub fn with_product(mut self, item: impl Into<String>, amount: Decimal) -> Self {
        self.products.push(ItemAmount::new(item, amount));
        self
    }

    /// 建構器模式：添加建築
    pub fn with_building(mut self, building: impl Into<String>) -> Self {
        self.produced_in.push(building.into());
        self
    }

    /// 建構器模式：設置最大功率
    pub fn with_max_power(mut self, max_power: Decimal) -> Self {
        self.max_power = Some(max_power);
        self
    }

    /// 建構器模式：設置為替代配方
    pub fn as_alternate(mut self) -> Self {
        self.alternate = true;
        self
    }

    /// 配方是否生產指定物品
    pub fn produces(&self, item: &str) -> bool {
        self.products.iter().any(|p| p.item == item)
    }

    /// 配方是否消耗指定物品
    pub fn consumes(&self, item: &str) -> bool {
        self.ingredients.iter().any(|i| i.item == item)
    }

    /// 指定產品的每循環數量
    pub fn product_amount(&self, item: &str) -> Option<Decimal> {
        self.products
            .iter()
            .find(|p| p.item == item)
            .map(|p| p.amount)
    }

    /// 循環時間是否有效（必須大於零）
    pub fn has_valid_time(&self) -> bool {
        self.time > Decimal::ZERO
    }

    /// 單一建築每分鐘處理的數量
    ///
    /// 循環時間非正值時回傳 `None`，呼叫端不得自行相除。
    pub fn per_minute(&self, amount_per_cycle: Decimal) -> Option<Decimal> {
        if !self.has_valid_time() {
            return None;
        }
        amount_per_cycle
            .checked_mul(SECONDS_PER_MINUTE)?
            .checked_div(self.time)
    }

    /// `buildings` 棟建築每分鐘處理的數量
    ///
    /// 先乘後除，只做一次除法，避免單棟產量先被截斷再放大。
    pub fn per_minute_for(&self, amount_per_cycle: Decimal, buildings: u32) -> Option<Decimal> {
        if !self.has_valid_time() {
            return None;
        }
        amount_per_cycle
            .checked_mul(SECONDS_PER_MINUTE)?
            .checked_mul(Decimal::from(buildings))?
            .checked_div(self.time)
    }

    /// 單一建築每分鐘的指定產品產量
    pub fn product_per_minute(&self, item: &str) -> Option<Decimal> {
        self.per_minute(self.product_amount(item)?)
    }

    /// 建築類型（第一個宣告的建築）
    pub fn building_type(&self) -> Option<&str> {
        self.produced_in.first().map(String::as_str)
    }

    /// 每棟建築功率，缺省時使用 `fallback`
    pub fn power_per_building(&self, fallback: Decimal) -> Decimal {
        self.max_power.unwrap_or(fallback)
    }
}
