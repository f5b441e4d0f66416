//! 物品模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 物品（參考資料，載入後不可變）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// 物品識別碼
    pub class_name: String,

    /// URL 代稱
    pub slug: String,

    /// 顯示名稱
    pub name: String,

    /// 說明
    #[serde(default)]
    pub description: String,

    /// 堆疊上限
    pub stack_size: u32,

    /// 能量值（MJ）
    pub energy_value: Decimal,

    /// 回收點數
    pub sink_points: u64,

    /// 放射衰變
    pub radioactive_decay: Decimal,

    /// 是否為液體
    pub liquid: bool,
}

impl Item {
    /// 創建新的物品，其餘欄位採預設值
    pub fn new(class_name: impl Into<String>, name: impl Into<String>) -> Self {
        let class_name = class_name.into();
        Self {
            slug: class_name.to_lowercase(),
            name: name.into(),
            class_name,
            description: String::new(),
            stack_size: 1,
            energy_value: Decimal::ZERO,
            sink_points: 0,
            radioactive_decay: Decimal::ZERO,
            liquid: false,
        }
    }

    /// 建構器模式：設置堆疊上限
    pub fn with_stack_size(mut self, stack_size: u32) -> Self {
        self.stack_size = stack_size;
        self
    }

    /// 建構器模式：設置為液體
    pub fn as_liquid(mut self) -> Self {
        self.liquid = true;
        self
    }

    /// 建構器模式：設置能量值
    pub fn with_energy_value(mut self, energy_value: Decimal) -> Self {
        self.energy_value = energy_value;
        self
    }

    /// 是否為固體
    pub fn is_solid(&self) -> bool {
        !self.liquid
    }
}
