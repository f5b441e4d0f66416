//! 工廠間供應關係（輸入）模型

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 輸入記錄的唯一組合：(目標工廠, 來源工廠, 物品)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImportKey {
    pub target_factory_id: Uuid,
    pub source_factory_id: Uuid,
    pub item_class_name: String,
}

impl ImportKey {
    pub fn new(target: Uuid, source: Uuid, item: impl Into<String>) -> Self {
        Self {
            target_factory_id: target,
            source_factory_id: source,
            item_class_name: item.into(),
        }
    }
}

/// 工廠輸入：目標工廠從來源工廠取得物品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoryImport {
    /// 輸入ID
    pub id: Uuid,

    /// 目標工廠（消費者）
    pub target_factory_id: Uuid,

    /// 來源工廠（生產者）
    pub source_factory_id: Uuid,

    /// 物品
    pub item_class_name: String,

    /// 需求速率（每分鐘）
    pub required_amount: Decimal,

    /// 擁有者
    pub owner_id: String,

    /// 建立時間
    pub created_at: DateTime<Utc>,

    /// 是否有效（停用即軟刪除）
    pub active: bool,
}

impl FactoryImport {
    /// 創建新的輸入
    pub fn new(
        target_factory_id: Uuid,
        source_factory_id: Uuid,
        item_class_name: impl Into<String>,
        required_amount: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            target_factory_id,
            source_factory_id,
            item_class_name: item_class_name.into(),
            required_amount,
            owner_id: String::new(),
            created_at: Utc::now(),
            active: true,
        }
    }

    /// 建構器模式：設置擁有者
    pub fn with_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = owner_id.into();
        self
    }

    /// 建構器模式：設置為停用
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// 唯一組合鍵
    pub fn key(&self) -> ImportKey {
        ImportKey::new(
            self.target_factory_id,
            self.source_factory_id,
            self.item_class_name.clone(),
        )
    }

    /// 是否符合指定組合
    pub fn matches(&self, target: Uuid, source: Uuid, item: &str) -> bool {
        self.target_factory_id == target
            && self.source_factory_id == source
            && self.item_class_name == item
    }

    /// 軟刪除
    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_import() {
        let target = Uuid::new_v4();
        let source = Uuid::new_v4();
        let import = FactoryImport::new(target, source, "Desc_IronIngot_C", Decimal::from(8))
            .with_owner("user-1");

        assert_eq!(import.required_amount, Decimal::from(8));
        assert_eq!(import.owner_id, "user-1");
        assert!(import.active);
        assert!(import.matches(target, source, "Desc_IronIngot_C"));
        assert!(!import.matches(source, target, "Desc_IronIngot_C"));
    }

    #[test]
    fn test_import_key_and_soft_delete() {
        let target = Uuid::new_v4();
        let source = Uuid::new_v4();
        let mut import = FactoryImport::new(target, source, "A", Decimal::ONE);

        assert_eq!(import.key(), ImportKey::new(target, source, "A"));

        import.deactivate();
        assert!(!import.active);
    }
}
