//! 增量規劃器
//!
//! 持有快照並作為唯一寫入者套用變更。每次變更只標記受影響的工廠，
//! `refresh` 時對髒工廠重新跑完整分析流程，不對既有結果做局部修補。
//! 建立或追加輸入前會先依同一快照計算來源產量並夾限，輸入量不會超過來源產量。

use std::collections::HashMap;
use std::time::Instant;

use factory_calc::{clamp_import_rate, increase_offer, FactoryAnalysis, FactoryPlanner};
use factory_core::{FactoryImport, PlanError, PlanningSnapshot, ProductionLine, Result};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::dirty_tracking::DirtyTracker;
use crate::generation::{PassTicket, PassTracker};

/// 快照變更
#[derive(Debug, Clone)]
pub enum Mutation {
    /// 新增產線（需通過目錄驗證）
    AddLine(ProductionLine),

    /// 調整產線目標產量
    UpdateLineTarget {
        line_id: Uuid,
        target_per_minute: Decimal,
    },

    /// 啟用或停用產線
    SetLineActive { line_id: Uuid, active: bool },

    RemoveLine(Uuid),

    /// 建立輸入；實際量為 min(要求量, 缺口, 來源產量)
    CreateImport {
        target_factory_id: Uuid,
        source_factory_id: Uuid,
        item_class_name: String,
        requested_per_minute: Decimal,
    },

    /// 追加輸入；追加量為 min(要求量, 來源餘量, 缺口)
    IncreaseImport {
        import_id: Uuid,
        additional_per_minute: Decimal,
    },

    /// 直接設定輸入量；不超過來源產量扣除同組合其他輸入
    UpdateImport {
        import_id: Uuid,
        required_per_minute: Decimal,
    },

    /// 軟刪除
    DeactivateImport(Uuid),

    DeleteImport(Uuid),
}

/// 變更套用結果
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedMutation {
    /// 分析結果因此過期的工廠
    pub affected_factories: Vec<Uuid>,

    /// 建立或調整的輸入
    pub import_id: Option<Uuid>,

    /// 夾限後實際寫入的量（建立或設定時為總量，追加時為增加量）
    pub applied_rate: Option<Decimal>,
}

impl AppliedMutation {
    fn factories(affected_factories: Vec<Uuid>) -> Self {
        Self {
            affected_factories,
            import_id: None,
            applied_rate: None,
        }
    }

    fn import(target_factory_id: Uuid, import_id: Uuid, applied_rate: Option<Decimal>) -> Self {
        Self {
            affected_factories: vec![target_factory_id],
            import_id: Some(import_id),
            applied_rate,
        }
    }
}

/// 增量規劃器
pub struct IncrementalPlanner {
    planner: FactoryPlanner,
    snapshot: PlanningSnapshot,
    dirty: DirtyTracker,
    passes: PassTracker,
    results: HashMap<Uuid, FactoryAnalysis>,
}

impl IncrementalPlanner {
    /// 創建規劃器；所有工廠初始皆為髒
    pub fn new(planner: FactoryPlanner, snapshot: PlanningSnapshot) -> Self {
        let mut dirty = DirtyTracker::new();
        dirty.mark_all(snapshot.factories.iter().map(|f| f.id));

        Self {
            planner,
            snapshot,
            dirty,
            passes: PassTracker::new(),
            results: HashMap::new(),
        }
    }

    pub fn snapshot(&self) -> &PlanningSnapshot {
        &self.snapshot
    }

    pub fn planner(&self) -> &FactoryPlanner {
        &self.planner
    }

    pub fn is_dirty(&self, factory_id: Uuid) -> bool {
        self.dirty.is_dirty(factory_id)
    }

    /// 最近一次被接受的分析結果（可能已過期，見 `is_dirty`）
    pub fn analysis(&self, factory_id: Uuid) -> Option<&FactoryAnalysis> {
        self.results.get(&factory_id)
    }

    /// 套用變更並標記受影響的工廠
    pub fn apply(&mut self, mutation: Mutation) -> Result<AppliedMutation> {
        tracing::debug!("套用變更: {:?}", mutation);

        let applied = match mutation {
            Mutation::AddLine(line) => {
                self.snapshot.require_factory(line.factory_id)?;
                check_target(line.target_quantity_per_minute)?;
                self.planner
                    .catalog()
                    .validate_line(&line.item_class_name, &line.recipe_class_name)?;
                let factory_id = line.factory_id;
                self.snapshot.production_lines.push(line);
                self.line_changed(factory_id)
            }
            Mutation::UpdateLineTarget {
                line_id,
                target_per_minute,
            } => {
                check_target(target_per_minute)?;
                let line = self.line_mut(line_id)?;
                line.target_quantity_per_minute = target_per_minute;
                let factory_id = line.factory_id;
                self.line_changed(factory_id)
            }
            Mutation::SetLineActive { line_id, active } => {
                let line = self.line_mut(line_id)?;
                line.active = active;
                let factory_id = line.factory_id;
                self.line_changed(factory_id)
            }
            Mutation::RemoveLine(line_id) => {
                let index = self
                    .snapshot
                    .production_lines
                    .iter()
                    .position(|l| l.id == line_id)
                    .ok_or(PlanError::ProductionLineNotFound(line_id))?;
                let line = self.snapshot.production_lines.remove(index);
                self.line_changed(line.factory_id)
            }
            Mutation::CreateImport {
                target_factory_id,
                source_factory_id,
                item_class_name,
                requested_per_minute,
            } => self.create_import(
                target_factory_id,
                source_factory_id,
                item_class_name,
                requested_per_minute,
            )?,
            Mutation::IncreaseImport {
                import_id,
                additional_per_minute,
            } => self.increase_import(import_id, additional_per_minute)?,
            Mutation::UpdateImport {
                import_id,
                required_per_minute,
            } => self.update_import(import_id, required_per_minute)?,
            Mutation::DeactivateImport(import_id) => {
                let import = self.import_mut(import_id)?;
                import.deactivate();
                let target = import.target_factory_id;
                self.import_changed(target, import_id, None)
            }
            Mutation::DeleteImport(import_id) => {
                let index = self
                    .snapshot
                    .imports
                    .iter()
                    .position(|i| i.id == import_id)
                    .ok_or(PlanError::UnknownImport(import_id))?;
                let import = self.snapshot.imports.remove(index);
                self.import_changed(import.target_factory_id, import_id, None)
            }
        };

        Ok(applied)
    }

    /// 重算所有髒工廠，回傳結果被接受的工廠
    pub fn refresh(&mut self) -> Vec<Uuid> {
        let start_time = Instant::now();
        let dirty = self.dirty.get_dirty_factories();
        let mut refreshed = Vec::with_capacity(dirty.len());

        for factory_id in dirty {
            let ticket = self.passes.begin(factory_id);
            match self.planner.analyze_factory(&self.snapshot, factory_id) {
                Ok(analysis) => {
                    if self.submit(ticket, analysis) {
                        refreshed.push(factory_id);
                    }
                }
                Err(err) => {
                    tracing::warn!("工廠 {} 重算失敗: {}", factory_id, err);
                    self.results.remove(&factory_id);
                }
            }
            self.dirty.clear_factory(factory_id);
        }

        tracing::info!(
            "增量重算完成：{} 座工廠，耗時 {}ms",
            refreshed.len(),
            start_time.elapsed().as_millis()
        );
        refreshed
    }

    /// 開始外部分析批次
    pub fn begin_pass(&mut self, factory_id: Uuid) -> PassTicket {
        self.passes.begin(factory_id)
    }

    /// 提交分析結果；過期批次的結果會被捨棄
    pub fn submit(&mut self, ticket: PassTicket, analysis: FactoryAnalysis) -> bool {
        if !self.passes.complete(ticket) {
            return false;
        }
        self.results.insert(ticket.factory_id, analysis);
        true
    }

    fn create_import(
        &mut self,
        target_factory_id: Uuid,
        source_factory_id: Uuid,
        item_class_name: String,
        requested: Decimal,
    ) -> Result<AppliedMutation> {
        if target_factory_id == source_factory_id {
            return Err(PlanError::SelfImport(target_factory_id));
        }
        check_import_rate(requested)?;
        let owner_id = self
            .snapshot
            .require_sibling(target_factory_id, source_factory_id)?
            .owner_id
            .clone();

        if let Some(existing) = self
            .snapshot
            .imports
            .iter()
            .find(|i| i.active && i.matches(target_factory_id, source_factory_id, &item_class_name))
        {
            return Err(PlanError::DuplicateImport(existing.id));
        }

        let still_needed = self.still_needed(target_factory_id, &item_class_name)?;
        let available = self
            .planner
            .available_rate(&self.snapshot, source_factory_id, &item_class_name);
        let rate = clamp_import_rate(requested, still_needed, available);

        if !self.planner.config().exceeds_tolerance(rate) {
            return Err(PlanError::CapacityViolation {
                source_factory: source_factory_id,
                item: item_class_name,
                available,
                requested,
            });
        }

        tracing::debug!(
            "建立輸入 {}：要求 {}，缺口 {}，來源產量 {}，寫入 {}",
            item_class_name,
            requested,
            still_needed,
            available,
            rate
        );

        let import = FactoryImport::new(target_factory_id, source_factory_id, item_class_name, rate)
            .with_owner(owner_id);
        let import_id = import.id;
        self.snapshot.imports.push(import);

        Ok(self.import_changed(target_factory_id, import_id, Some(rate)))
    }

    fn increase_import(&mut self, import_id: Uuid, additional: Decimal) -> Result<AppliedMutation> {
        check_import_rate(additional)?;
        let import = self.active_import(import_id)?.clone();

        let still_needed = self.still_needed(import.target_factory_id, &import.item_class_name)?;
        let existing = self.key_total(&import, None);
        let available = self
            .planner
            .available_rate(&self.snapshot, import.source_factory_id, &import.item_class_name);
        let added = additional.min(increase_offer(available, existing, still_needed));

        if !self.planner.config().exceeds_tolerance(added) {
            return Err(PlanError::CapacityViolation {
                source_factory: import.source_factory_id,
                item: import.item_class_name,
                available,
                requested: existing + additional,
            });
        }

        self.import_mut(import_id)?.required_amount += added;
        Ok(self.import_changed(import.target_factory_id, import_id, Some(added)))
    }

    fn update_import(&mut self, import_id: Uuid, required: Decimal) -> Result<AppliedMutation> {
        check_import_rate(required)?;
        let import = self.active_import(import_id)?.clone();

        let others = self.key_total(&import, Some(import_id));
        let available = self
            .planner
            .available_rate(&self.snapshot, import.source_factory_id, &import.item_class_name);
        let rate = required.min((available - others).max(Decimal::ZERO));

        if !self.planner.config().exceeds_tolerance(rate) {
            return Err(PlanError::CapacityViolation {
                source_factory: import.source_factory_id,
                item: import.item_class_name,
                available,
                requested: others + required,
            });
        }

        self.import_mut(import_id)?.required_amount = rate;
        Ok(self.import_changed(import.target_factory_id, import_id, Some(rate)))
    }

    /// 目標工廠指定原料的剩餘缺口；已滿足時回傳錯誤
    fn still_needed(&self, target_factory_id: Uuid, item: &str) -> Result<Decimal> {
        let analysis = self.planner.analyze_factory(&self.snapshot, target_factory_id)?;
        analysis
            .missing(item)
            .map(|m| m.still_needed_per_minute)
            .ok_or_else(|| PlanError::IngredientSatisfied {
                factory: target_factory_id,
                item: item.to_string(),
            })
    }

    /// 同組合有效輸入的合計量
    fn key_total(&self, import: &FactoryImport, excluding: Option<Uuid>) -> Decimal {
        self.snapshot
            .imports
            .iter()
            .filter(|i| i.active && Some(i.id) != excluding)
            .filter(|i| i.matches(import.target_factory_id, import.source_factory_id, &import.item_class_name))
            .map(|i| i.required_amount)
            .sum()
    }

    /// 產線變更會影響本工廠與同擁有者其他工廠的供應清單
    fn line_changed(&mut self, factory_id: Uuid) -> AppliedMutation {
        let mut affected = vec![factory_id];
        affected.extend(self.snapshot.sibling_factories(factory_id).iter().map(|f| f.id));
        self.dirty.mark_all(affected.iter().copied());
        AppliedMutation::factories(affected)
    }

    fn import_changed(
        &mut self,
        target_factory_id: Uuid,
        import_id: Uuid,
        applied_rate: Option<Decimal>,
    ) -> AppliedMutation {
        self.dirty.mark_dirty(target_factory_id);
        AppliedMutation::import(target_factory_id, import_id, applied_rate)
    }

    fn line_mut(&mut self, line_id: Uuid) -> Result<&mut ProductionLine> {
        self.snapshot
            .production_lines
            .iter_mut()
            .find(|l| l.id == line_id)
            .ok_or(PlanError::ProductionLineNotFound(line_id))
    }

    fn active_import(&self, import_id: Uuid) -> Result<&FactoryImport> {
        self.snapshot
            .import(import_id)
            .filter(|i| i.active)
            .ok_or(PlanError::UnknownImport(import_id))
    }

    fn import_mut(&mut self, import_id: Uuid) -> Result<&mut FactoryImport> {
        self.snapshot
            .imports
            .iter_mut()
            .find(|i| i.id == import_id)
            .ok_or(PlanError::UnknownImport(import_id))
    }
}

fn check_target(target: Decimal) -> Result<()> {
    if target < Decimal::ZERO {
        return Err(PlanError::InvalidRate(target));
    }
    Ok(())
}

fn check_import_rate(rate: Decimal) -> Result<()> {
    if rate <= Decimal::ZERO {
        return Err(PlanError::InvalidRate(rate));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use factory_core::{Catalog, Factory, Item, PlannerConfig, Recipe};
    use rstest::rstest;

    struct Fixture {
        planner: IncrementalPlanner,
        f1: Uuid,
        f2: Uuid,
        foreign: Uuid,
        b_line: Uuid,
    }

    /// F1 以 R_A 生產 A 10/min（需 B 8/min）；F2 以 R_B 生產 B 12/min（每棟 1/min）。
    /// Foreign 屬於其他擁有者，同樣生產 B 12/min。
    fn fixture() -> Fixture {
        let mut catalog = Catalog::new();
        for item in ["A", "B", "Ore"] {
            catalog.add_item(Item::new(item, item)).unwrap();
        }
        catalog
            .add_recipe(
                Recipe::new("R_A", Decimal::from(30))
                    .with_ingredient("B", Decimal::from(4))
                    .with_product("A", Decimal::from(5)),
            )
            .unwrap();
        catalog
            .add_recipe(
                Recipe::new("R_B", Decimal::from(60))
                    .with_ingredient("Ore", Decimal::ONE)
                    .with_product("B", Decimal::ONE),
            )
            .unwrap();

        let f1 = Factory::new("F1", "u").with_position(0);
        let f2 = Factory::new("F2", "u").with_position(1);
        let foreign = Factory::new("Foreign", "other-user");
        let b_line = ProductionLine::new(f2.id, "B", "R_B", Decimal::from(12));
        let b_line_id = b_line.id;

        let snapshot = PlanningSnapshot::new()
            .with_factory(f1.clone())
            .with_factory(f2.clone())
            .with_line(ProductionLine::new(f1.id, "A", "R_A", Decimal::from(10)))
            .with_factory(foreign.clone())
            .with_line(b_line)
            .with_line(ProductionLine::new(foreign.id, "B", "R_B", Decimal::from(12)));

        Fixture {
            planner: IncrementalPlanner::new(
                FactoryPlanner::new(catalog, PlannerConfig::default()),
                snapshot,
            ),
            f1: f1.id,
            f2: f2.id,
            foreign: foreign.id,
            b_line: b_line_id,
        }
    }

    fn create_b(target: Uuid, source: Uuid, requested: i64) -> Mutation {
        Mutation::CreateImport {
            target_factory_id: target,
            source_factory_id: source,
            item_class_name: "B".to_string(),
            requested_per_minute: Decimal::from(requested),
        }
    }

    #[test]
    fn test_initial_refresh() {
        let mut fx = fixture();
        assert!(fx.planner.is_dirty(fx.f1));
        assert!(fx.planner.analysis(fx.f1).is_none());

        let refreshed = fx.planner.refresh();

        assert_eq!(refreshed.len(), 3);
        assert!(!fx.planner.is_dirty(fx.f1));
        let b = fx.planner.analysis(fx.f1).unwrap().missing("B").unwrap();
        assert_eq!(b.still_needed_per_minute, Decimal::from(8));
    }

    #[rstest]
    #[case(100, 8)]
    #[case(8, 8)]
    #[case(3, 3)]
    fn test_create_import_is_clamped(#[case] requested: i64, #[case] expected: i64) {
        let mut fx = fixture();
        let mutation = create_b(fx.f1, fx.f2, requested);

        let applied = fx.planner.apply(mutation).unwrap();

        assert_eq!(applied.applied_rate, Some(Decimal::from(expected)));
        assert_eq!(applied.affected_factories, vec![fx.f1]);
        let import = fx.planner.snapshot().import(applied.import_id.unwrap()).unwrap();
        assert_eq!(import.required_amount, Decimal::from(expected));
        assert_eq!(import.owner_id, "u");
    }

    #[test]
    fn test_import_satisfies_after_refresh() {
        let mut fx = fixture();
        fx.planner.refresh();
        let mutation = create_b(fx.f1, fx.f2, 8);
        fx.planner.apply(mutation).unwrap();

        assert!(fx.planner.is_dirty(fx.f1));
        assert!(!fx.planner.is_dirty(fx.f2));
        fx.planner.refresh();

        assert!(fx.planner.analysis(fx.f1).unwrap().missing("B").is_none());
    }

    #[test]
    fn test_create_import_rejects_other_owner() {
        let mut fx = fixture();
        fx.planner.refresh();

        let result = fx.planner.apply(create_b(fx.f1, fx.foreign, 8));

        assert!(matches!(
            result,
            Err(PlanError::ForeignSource { source_factory, .. }) if source_factory == fx.foreign
        ));
        assert!(fx.planner.snapshot().imports.is_empty());
        assert!(!fx.planner.is_dirty(fx.f1));

        // 同一擁有者的來源仍可輸入，且不產生產能衝突
        fx.planner.apply(create_b(fx.f1, fx.f2, 8)).unwrap();
        fx.planner.refresh();
        let analysis = fx.planner.analysis(fx.f1).unwrap();
        assert!(analysis.capacity_violations.is_empty());
        assert!(analysis.missing("B").is_none());
    }

    #[test]
    fn test_create_import_rejections() {
        let mut fx = fixture();

        let self_import = Mutation::CreateImport {
            target_factory_id: fx.f2,
            source_factory_id: fx.f2,
            item_class_name: "B".to_string(),
            requested_per_minute: Decimal::ONE,
        };
        assert!(matches!(fx.planner.apply(self_import), Err(PlanError::SelfImport(_))));
        assert!(matches!(
            fx.planner.apply(create_b(fx.f1, fx.f2, 0)),
            Err(PlanError::InvalidRate(_))
        ));

        // F1 不生產 Ore
        let no_capacity = Mutation::CreateImport {
            target_factory_id: fx.f2,
            source_factory_id: fx.f1,
            item_class_name: "Ore".to_string(),
            requested_per_minute: Decimal::ONE,
        };
        assert!(matches!(
            fx.planner.apply(no_capacity),
            Err(PlanError::CapacityViolation { .. })
        ));

        fx.planner.apply(create_b(fx.f1, fx.f2, 8)).unwrap();
        assert!(matches!(
            fx.planner.apply(create_b(fx.f1, fx.f2, 1)),
            Err(PlanError::DuplicateImport(_))
        ));
    }

    #[test]
    fn test_create_import_for_satisfied_ingredient() {
        let mut fx = fixture();
        let mutation = Mutation::CreateImport {
            target_factory_id: fx.f1,
            source_factory_id: fx.f2,
            item_class_name: "Ore".to_string(),
            requested_per_minute: Decimal::ONE,
        };

        assert!(matches!(
            fx.planner.apply(mutation),
            Err(PlanError::IngredientSatisfied { .. })
        ));
    }

    #[test]
    fn test_increase_import() {
        let mut fx = fixture();
        let applied = fx.planner.apply(create_b(fx.f1, fx.f2, 5)).unwrap();
        let import_id = applied.import_id.unwrap();

        // 缺口 3，來源餘量 7 => 只追加 3
        let increased = fx
            .planner
            .apply(Mutation::IncreaseImport {
                import_id,
                additional_per_minute: Decimal::from(10),
            })
            .unwrap();

        assert_eq!(increased.applied_rate, Some(Decimal::from(3)));
        assert_eq!(
            fx.planner.snapshot().import(import_id).unwrap().required_amount,
            Decimal::from(8)
        );

        // 已滿足，無法再追加
        let again = fx.planner.apply(Mutation::IncreaseImport {
            import_id,
            additional_per_minute: Decimal::ONE,
        });
        assert!(matches!(again, Err(PlanError::IngredientSatisfied { .. })));
    }

    #[test]
    fn test_update_import_clamped_to_capacity() {
        let mut fx = fixture();
        let import_id = fx.planner.apply(create_b(fx.f1, fx.f2, 8)).unwrap().import_id.unwrap();

        let applied = fx
            .planner
            .apply(Mutation::UpdateImport {
                import_id,
                required_per_minute: Decimal::from(20),
            })
            .unwrap();

        assert_eq!(applied.applied_rate, Some(Decimal::from(12)));
    }

    #[test]
    fn test_source_drop_surfaces_violation() {
        let mut fx = fixture();
        fx.planner.apply(create_b(fx.f1, fx.f2, 8)).unwrap();
        fx.planner.refresh();

        let applied = fx
            .planner
            .apply(Mutation::UpdateLineTarget {
                line_id: fx.b_line,
                target_per_minute: Decimal::from(5),
            })
            .unwrap();

        assert!(applied.affected_factories.contains(&fx.f1));
        assert!(fx.planner.is_dirty(fx.f1));
        fx.planner.refresh();

        let analysis = fx.planner.analysis(fx.f1).unwrap();
        assert_eq!(analysis.capacity_violations.len(), 1);
        assert_eq!(analysis.capacity_violations[0].imported_per_minute, Decimal::from(8));
        assert_eq!(analysis.capacity_violations[0].available_per_minute, Decimal::from(5));
    }

    #[test]
    fn test_deactivate_and_delete_import() {
        let mut fx = fixture();
        let import_id = fx.planner.apply(create_b(fx.f1, fx.f2, 8)).unwrap().import_id.unwrap();

        fx.planner.apply(Mutation::DeactivateImport(import_id)).unwrap();
        fx.planner.refresh();
        assert!(fx.planner.analysis(fx.f1).unwrap().missing("B").is_some());
        assert!(matches!(
            fx.planner.apply(Mutation::IncreaseImport {
                import_id,
                additional_per_minute: Decimal::ONE,
            }),
            Err(PlanError::UnknownImport(_))
        ));

        fx.planner.apply(Mutation::DeleteImport(import_id)).unwrap();
        assert!(fx.planner.snapshot().import(import_id).is_none());
        assert!(matches!(
            fx.planner.apply(Mutation::DeleteImport(import_id)),
            Err(PlanError::UnknownImport(_))
        ));
    }

    #[test]
    fn test_line_mutations() {
        let mut fx = fixture();
        fx.planner.refresh();

        let mismatch = ProductionLine::new(fx.f1, "A", "R_B", Decimal::ONE);
        assert!(matches!(
            fx.planner.apply(Mutation::AddLine(mismatch)),
            Err(PlanError::RecipeMismatch { .. })
        ));
        let unknown_factory = ProductionLine::new(Uuid::new_v4(), "B", "R_B", Decimal::ONE);
        assert!(matches!(
            fx.planner.apply(Mutation::AddLine(unknown_factory)),
            Err(PlanError::FactoryNotFound(_))
        ));

        // F1 自行生產 B 之後不再缺 B
        let own_b = ProductionLine::new(fx.f1, "B", "R_B", Decimal::from(8));
        let applied = fx.planner.apply(Mutation::AddLine(own_b)).unwrap();
        assert_eq!(applied.affected_factories, vec![fx.f1, fx.f2]);
        fx.planner.refresh();
        assert!(fx.planner.analysis(fx.f1).unwrap().missing("B").is_none());

        fx.planner
            .apply(Mutation::SetLineActive {
                line_id: fx.b_line,
                active: false,
            })
            .unwrap();
        fx.planner.apply(Mutation::RemoveLine(fx.b_line)).unwrap();
        assert!(matches!(
            fx.planner.apply(Mutation::RemoveLine(fx.b_line)),
            Err(PlanError::ProductionLineNotFound(_))
        ));
        assert!(matches!(
            fx.planner.apply(Mutation::UpdateLineTarget {
                line_id: fx.b_line,
                target_per_minute: Decimal::from(-1),
            }),
            Err(PlanError::InvalidRate(_))
        ));
    }

    #[test]
    fn test_stale_pass_is_discarded() {
        let mut fx = fixture();
        fx.planner.refresh();

        let older = fx.planner.begin_pass(fx.f1);
        let stale = fx.planner.planner().analyze_factory(fx.planner.snapshot(), fx.f1).unwrap();

        fx.planner.apply(create_b(fx.f1, fx.f2, 8)).unwrap();
        let newer = fx.planner.begin_pass(fx.f1);
        let fresh = fx.planner.planner().analyze_factory(fx.planner.snapshot(), fx.f1).unwrap();

        assert!(fx.planner.submit(newer, fresh));
        assert!(!fx.planner.submit(older, stale));
        assert!(fx.planner.analysis(fx.f1).unwrap().missing("B").is_none());
    }
}
