//! # Factory Core
//!
//! 核心資料模型與類型定義：物品、配方、工廠、產線、工廠間輸入與快照

pub mod catalog;
pub mod config;
pub mod factory;
pub mod item;
pub mod production;
pub mod recipe;
pub mod snapshot;
pub mod supply;

// Re-export 主要類型
pub use catalog::{Catalog, CatalogLoadReport, RejectedEntry};
pub use config::PlannerConfig;
pub use factory::Factory;
pub use item::Item;
pub use production::ProductionLine;
pub use recipe::{ItemAmount, Recipe};
pub use snapshot::PlanningSnapshot;
pub use supply::{FactoryImport, ImportKey};

use rust_decimal::Decimal;
use uuid::Uuid;

/// 規劃錯誤類型
///
/// 只有在協調邊界（快照、目錄載入、變更操作）才會出現；
/// 單一產線或原料的問題以警告形式降級，不會中止整個分析。
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("找不到工廠: {0}")]
    FactoryNotFound(Uuid),

    #[error("找不到產線: {0}")]
    ProductionLineNotFound(Uuid),

    #[error("找不到輸入記錄: {0}")]
    UnknownImport(Uuid),

    #[error("目錄解析錯誤: {0}")]
    CatalogParse(#[from] serde_json::Error),

    #[error("無效的配方 {recipe}: {reason}")]
    InvalidRecipe { recipe: String, reason: String },

    #[error("無效的物品 {0}")]
    InvalidItem(String),

    #[error("配方 {recipe} 不生產物品 {item}")]
    RecipeMismatch { recipe: String, item: String },

    #[error("產能不足：{source_factory} 的 {item} 僅有 {available}/min，要求 {requested}/min")]
    CapacityViolation {
        source_factory: Uuid,
        item: String,
        available: Decimal,
        requested: Decimal,
    },

    #[error("無效的速率: {0}")]
    InvalidRate(Decimal),

    #[error("工廠不可輸入自身產品: {0}")]
    SelfImport(Uuid),

    #[error("來源工廠 {source_factory} 與目標工廠 {target_factory} 屬於不同擁有者")]
    ForeignSource {
        target_factory: Uuid,
        source_factory: Uuid,
    },

    #[error("相同來源與物品的輸入已存在: {0}")]
    DuplicateImport(Uuid),

    #[error("工廠 {factory} 的原料 {item} 已滿足，無需輸入")]
    IngredientSatisfied { factory: Uuid, item: String },

    #[error("其他錯誤: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;
