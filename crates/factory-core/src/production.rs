//! 產線模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 產線：工廠以指定配方、目標速率生產一種物品
///
/// 建築數量、實際產量、功率等衍生值由計算模組產生，不存放於此。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionLine {
    /// 產線ID
    pub id: Uuid,

    /// 所屬工廠
    pub factory_id: Uuid,

    /// 生產的物品
    pub item_class_name: String,

    /// 使用的配方
    pub recipe_class_name: String,

    /// 目標產量（每分鐘）
    pub target_quantity_per_minute: Decimal,

    /// 是否啟用
    pub active: bool,

    /// 備註
    pub notes: Option<String>,
}

impl ProductionLine {
    /// 創建新的產線（預設啟用）
    pub fn new(
        factory_id: Uuid,
        item_class_name: impl Into<String>,
        recipe_class_name: impl Into<String>,
        target_quantity_per_minute: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            factory_id,
            item_class_name: item_class_name.into(),
            recipe_class_name: recipe_class_name.into(),
            target_quantity_per_minute,
            active: true,
            notes: None,
        }
    }

    /// 建構器模式：設置為停用
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// 建構器模式：設置備註
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// 目標產量是否為正值
    pub fn has_positive_target(&self) -> bool {
        self.target_quantity_per_minute > Decimal::ZERO
    }
}
