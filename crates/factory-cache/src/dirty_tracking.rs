//! 髒標記追蹤

use std::collections::HashSet;

use uuid::Uuid;

/// 髒標記追蹤器：記錄分析結果已過期的工廠
#[derive(Debug, Clone, Default)]
pub struct DirtyTracker {
    dirty_factories: HashSet<Uuid>,
}

impl DirtyTracker {
    /// 創建新的追蹤器
    pub fn new() -> Self {
        Self::default()
    }

    /// 標記工廠為髒
    pub fn mark_dirty(&mut self, factory_id: Uuid) {
        self.dirty_factories.insert(factory_id);
    }

    /// 一次標記多座工廠
    pub fn mark_all(&mut self, factory_ids: impl IntoIterator<Item = Uuid>) {
        self.dirty_factories.extend(factory_ids);
    }

    /// 檢查工廠是否為髒
    pub fn is_dirty(&self, factory_id: Uuid) -> bool {
        self.dirty_factories.contains(&factory_id)
    }

    /// 清除單一工廠的髒標記
    pub fn clear_factory(&mut self, factory_id: Uuid) {
        self.dirty_factories.remove(&factory_id);
    }

    /// 清除所有髒標記
    pub fn clear(&mut self) {
        self.dirty_factories.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.dirty_factories.is_empty()
    }

    /// 獲取所有髒工廠（排序後，確保重算順序固定）
    pub fn get_dirty_factories(&self) -> Vec<Uuid> {
        let mut factories: Vec<Uuid> = self.dirty_factories.iter().copied().collect();
        factories.sort();
        factories
    }
}
