//! 工廠模型

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 工廠
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Factory {
    /// 工廠ID
    pub id: Uuid,

    /// 顯示名稱
    pub name: String,

    /// 排序位置
    pub position: u32,

    /// 擁有者
    pub owner_id: String,
}

impl Factory {
    /// 創建新的工廠
    pub fn new(name: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            position: 0,
            owner_id: owner_id.into(),
        }
    }

    /// 建構器模式：設置排序位置
    pub fn with_position(mut self, position: u32) -> Self {
        self.position = position;
        self
    }

    /// 重新命名
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}
