//! 規劃快照
//!
//! 一次分析所需的全部資料。呼叫端在分析前一次取得，分析期間不再變動；
//! 任何變更都應產生新的快照並重新分析。

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::factory::Factory;
use crate::production::ProductionLine;
use crate::supply::FactoryImport;
use crate::{PlanError, Result};

/// 規劃快照
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanningSnapshot {
    /// 工廠清單
    pub factories: Vec<Factory>,

    /// 所有工廠的產線
    pub production_lines: Vec<ProductionLine>,

    /// 所有輸入記錄（含停用）
    pub imports: Vec<FactoryImport>,
}

impl PlanningSnapshot {
    /// 創建空快照
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：添加工廠
    pub fn with_factory(mut self, factory: Factory) -> Self {
        self.factories.push(factory);
        self
    }

    /// 建構器模式：添加產線
    pub fn with_line(mut self, line: ProductionLine) -> Self {
        self.production_lines.push(line);
        self
    }

    /// 建構器模式：添加輸入
    pub fn with_import(mut self, import: FactoryImport) -> Self {
        self.imports.push(import);
        self
    }

    /// 從 JSON 載入快照
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 查詢工廠
    pub fn factory(&self, factory_id: Uuid) -> Option<&Factory> {
        self.factories.iter().find(|f| f.id == factory_id)
    }

    /// 查詢工廠，查無時回傳錯誤
    pub fn require_factory(&self, factory_id: Uuid) -> Result<&Factory> {
        self.factory(factory_id)
            .ok_or(PlanError::FactoryNotFound(factory_id))
    }

    /// 取得與目標工廠同一擁有者的來源工廠
    ///
    /// 輸入只能在同一擁有者的工廠之間建立。
    pub fn require_sibling(&self, target_factory_id: Uuid, source_factory_id: Uuid) -> Result<&Factory> {
        let target = self.require_factory(target_factory_id)?;
        let source = self.require_factory(source_factory_id)?;
        if source.owner_id != target.owner_id {
            return Err(PlanError::ForeignSource {
                target_factory: target_factory_id,
                source_factory: source_factory_id,
            });
        }
        Ok(source)
    }

    /// 工廠顯示名稱
    pub fn factory_name(&self, factory_id: Uuid) -> Option<&str> {
        self.factory(factory_id).map(|f| f.name.as_str())
    }

    /// 依排序位置排列的工廠
    pub fn factories_ordered(&self) -> Vec<&Factory> {
        let mut factories: Vec<_> = self.factories.iter().collect();
        factories.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.name.cmp(&b.name)));
        factories
    }

    /// 指定擁有者的工廠（依排序位置）
    pub fn factories_of(&self, owner_id: &str) -> Vec<&Factory> {
        self.factories_ordered()
            .into_iter()
            .filter(|f| f.owner_id == owner_id)
            .collect()
    }

    /// 同一擁有者的其他工廠
    pub fn sibling_factories(&self, factory_id: Uuid) -> Vec<&Factory> {
        let owner = self.factory(factory_id).map(|f| f.owner_id.as_str());
        self.factories
            .iter()
            .filter(|f| f.id != factory_id && Some(f.owner_id.as_str()) == owner)
            .collect()
    }

    /// 工廠的所有產線
    pub fn lines_of(&self, factory_id: Uuid) -> impl Iterator<Item = &ProductionLine> + '_ {
        self.production_lines
            .iter()
            .filter(move |l| l.factory_id == factory_id)
    }

    /// 輸入到工廠的有效記錄
    pub fn imports_into(&self, factory_id: Uuid) -> impl Iterator<Item = &FactoryImport> + '_ {
        self.imports
            .iter()
            .filter(move |i| i.active && i.target_factory_id == factory_id)
    }

    /// 從工廠輸出的有效記錄
    pub fn imports_from(&self, factory_id: Uuid) -> impl Iterator<Item = &FactoryImport> + '_ {
        self.imports
            .iter()
            .filter(move |i| i.active && i.source_factory_id == factory_id)
    }

    /// 查詢產線
    pub fn line(&self, line_id: Uuid) -> Option<&ProductionLine> {
        self.production_lines.iter().find(|l| l.id == line_id)
    }

    /// 查詢輸入
    pub fn import(&self, import_id: Uuid) -> Option<&FactoryImport> {
        self.imports.iter().find(|i| i.id == import_id)
    }
}
