//! 工廠規劃主計算器
//!
//! 每次分析都從快照完整重算：指標 → 相依分析 → 跨工廠供應 → 輸入對帳。
//! 不保留任何中間狀態，相同快照必得相同結果。

use std::collections::HashMap;

use chrono::Utc;
use factory_core::{Catalog, Factory, FactoryImport, PlanError, PlannerConfig, PlanningSnapshot};
use rayon::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::availability::{AvailabilityResolver, FactoryOutput};
use crate::dependency::DependencyAnalyzer;
use crate::exports::ExportSummary;
use crate::graph::DependencyGraph;
use crate::metrics::{EnrichedLine, MetricsCalculator};
use crate::reconciliation::{ImportProposal, ImportReconciler, ProposalKind, ReconciliationOutcome};
use crate::{FactoryAnalysis, PlanWarning};

/// 工廠規劃計算器
pub struct FactoryPlanner {
    /// 物品與配方目錄
    catalog: Catalog,

    /// 規劃參數
    config: PlannerConfig,
}

impl FactoryPlanner {
    /// 創建新的計算器
    pub fn new(catalog: Catalog, config: PlannerConfig) -> Self {
        Self { catalog, config }
    }

    /// 單一工廠分析入口
    pub fn analyze_factory(
        &self,
        snapshot: &PlanningSnapshot,
        factory_id: Uuid,
    ) -> factory_core::Result<FactoryAnalysis> {
        let factory = snapshot.require_factory(factory_id)?;
        let enriched = self.enrich_all(snapshot);
        Ok(self.assemble(snapshot, factory, &enriched))
    }

    /// 分析快照中所有工廠（依排序位置）
    ///
    /// 快照可包含多個擁有者；每座工廠的候選來源仍只限同一擁有者。
    pub fn analyze_all(&self, snapshot: &PlanningSnapshot) -> Vec<FactoryAnalysis> {
        tracing::info!("開始全工廠分析：工廠 {} 座", snapshot.factories.len());
        self.analyze_factories(snapshot, snapshot.factories_ordered())
    }

    /// 分析指定擁有者的所有工廠（依排序位置）
    pub fn analyze_owner(&self, snapshot: &PlanningSnapshot, owner_id: &str) -> Vec<FactoryAnalysis> {
        let factories = snapshot.factories_of(owner_id);
        tracing::info!("開始擁有者 {} 的工廠分析：工廠 {} 座", owner_id, factories.len());
        self.analyze_factories(snapshot, factories)
    }

    fn analyze_factories(&self, snapshot: &PlanningSnapshot, factories: Vec<&Factory>) -> Vec<FactoryAnalysis> {
        let enriched = self.enrich_all(snapshot);

        factories
            .into_par_iter()
            .map(|factory| self.assemble(snapshot, factory, &enriched))
            .collect()
    }

    /// 計算工廠所有產線的指標
    pub fn enrich_lines(&self, snapshot: &PlanningSnapshot, factory_id: Uuid) -> Vec<EnrichedLine> {
        snapshot
            .lines_of(factory_id)
            .map(|line| MetricsCalculator::calculate(line, &self.catalog, &self.config))
            .collect()
    }

    /// 計算快照中所有產線的指標，依工廠分組
    fn enrich_all(&self, snapshot: &PlanningSnapshot) -> HashMap<Uuid, Vec<EnrichedLine>> {
        let enriched: Vec<EnrichedLine> = snapshot
            .production_lines
            .par_iter()
            .map(|line| MetricsCalculator::calculate(line, &self.catalog, &self.config))
            .collect();

        let mut grouped: HashMap<Uuid, Vec<EnrichedLine>> = HashMap::new();
        for line in enriched {
            grouped.entry(line.line.factory_id).or_default().push(line);
        }
        grouped
    }

    /// 同擁有者其他工廠的產量
    fn sibling_outputs(
        &self,
        snapshot: &PlanningSnapshot,
        factory_id: Uuid,
        enriched: &HashMap<Uuid, Vec<EnrichedLine>>,
    ) -> Vec<FactoryOutput> {
        snapshot
            .sibling_factories(factory_id)
            .into_iter()
            .map(|f| {
                let lines = enriched.get(&f.id).map(Vec::as_slice).unwrap_or(&[]);
                FactoryOutput::from_lines(f.id, f.name.clone(), lines, &self.config)
            })
            .collect()
    }

    fn assemble(
        &self,
        snapshot: &PlanningSnapshot,
        factory: &Factory,
        enriched: &HashMap<Uuid, Vec<EnrichedLine>>,
    ) -> FactoryAnalysis {
        let start_time = std::time::Instant::now();
        tracing::debug!("分析工廠 {} ({})", factory.name, factory.id);

        let lines: Vec<EnrichedLine> = enriched.get(&factory.id).cloned().unwrap_or_default();

        // Step 1: 外部原料需求
        let requirements = DependencyAnalyzer::analyze(&lines, &self.config);

        // Step 2: 跨工廠供應
        let outputs = self.sibling_outputs(snapshot, factory.id, enriched);
        let resolved = AvailabilityResolver::resolve(factory.id, requirements, &outputs);

        // Step 3: 輸入對帳
        let imports: Vec<&FactoryImport> = snapshot.imports_into(factory.id).collect();
        let outcome = ImportReconciler::reconcile(factory.id, resolved, &imports, &outputs, &self.config);

        let warnings = Self::collect_warnings(&lines, &outcome);
        let total_power_mw = lines
            .iter()
            .map(EnrichedLine::power_consumption_mw)
            .sum::<Decimal>();
        let total_buildings = lines.iter().map(EnrichedLine::building_count).sum::<u32>();

        tracing::debug!(
            "工廠 {} 缺少原料 {} 項，產能衝突 {} 筆，多餘輸入 {} 筆",
            factory.name,
            outcome.missing.len(),
            outcome.violations.len(),
            outcome.redundant.len()
        );

        FactoryAnalysis {
            factory_id: factory.id,
            factory_name: factory.name.clone(),
            lines,
            missing_ingredients: outcome.missing,
            capacity_violations: outcome.violations,
            redundant_imports: outcome.redundant,
            total_power_mw,
            total_buildings,
            warnings,
            computed_at: Utc::now(),
            calculation_time_ms: Some(start_time.elapsed().as_millis()),
        }
    }

    fn collect_warnings(lines: &[EnrichedLine], outcome: &ReconciliationOutcome) -> Vec<PlanWarning> {
        let mut warnings = Vec::new();

        for line in lines {
            if let Some(issue) = &line.issue {
                tracing::warn!("產線 {} 無法計算指標: {}", line.line.id, issue.describe());
                warnings.push(PlanWarning::warning(line.line.id.to_string(), issue.describe()));
            }
        }

        for violation in &outcome.violations {
            warnings.push(PlanWarning::error(
                violation.key.item_class_name.clone(),
                format!(
                    "來源工廠 {} 僅生產 {}/min，但已輸入 {}/min",
                    violation.key.source_factory_id,
                    violation.available_per_minute,
                    violation.imported_per_minute
                ),
            ));
        }

        for redundant in &outcome.redundant {
            warnings.push(PlanWarning::info(
                redundant.item_class_name.clone(),
                format!("輸入 {} 已不再需要", redundant.import_id),
            ));
        }

        for missing in outcome.missing.iter().filter(|m| !m.has_sources()) {
            warnings.push(PlanWarning::info(
                missing.item_class_name.clone(),
                "沒有其他工廠生產此原料".to_string(),
            ));
        }

        warnings
    }

    /// 來源工廠指定物品的目前產量
    pub fn available_rate(&self, snapshot: &PlanningSnapshot, source_factory_id: Uuid, item: &str) -> Decimal {
        let lines = self.enrich_lines(snapshot, source_factory_id);
        FactoryOutput::from_lines(source_factory_id, "", &lines, &self.config).rate_of(item)
    }

    /// 建議從來源工廠新建輸入，量為 min(缺口, 來源產量)
    ///
    /// 原料已滿足、來源無產量或已有輸入時回傳 `None`。
    pub fn propose_new_import(
        &self,
        snapshot: &PlanningSnapshot,
        target_factory_id: Uuid,
        source_factory_id: Uuid,
        item: &str,
    ) -> factory_core::Result<Option<ImportProposal>> {
        Ok(self
            .proposal_for(snapshot, target_factory_id, source_factory_id, item)?
            .filter(|p| p.kind == ProposalKind::Create))
    }

    /// 建議追加既有輸入，量為 min(來源餘量, 缺口)
    pub fn propose_increase(
        &self,
        snapshot: &PlanningSnapshot,
        target_factory_id: Uuid,
        source_factory_id: Uuid,
        item: &str,
    ) -> factory_core::Result<Option<ImportProposal>> {
        Ok(self
            .proposal_for(snapshot, target_factory_id, source_factory_id, item)?
            .filter(|p| p.kind == ProposalKind::Increase))
    }

    fn proposal_for(
        &self,
        snapshot: &PlanningSnapshot,
        target_factory_id: Uuid,
        source_factory_id: Uuid,
        item: &str,
    ) -> factory_core::Result<Option<ImportProposal>> {
        if target_factory_id == source_factory_id {
            return Err(PlanError::SelfImport(target_factory_id));
        }
        snapshot.require_sibling(target_factory_id, source_factory_id)?;
        let analysis = self.analyze_factory(snapshot, target_factory_id)?;

        Ok(analysis.missing(item).and_then(|missing| {
            ImportReconciler::propose(target_factory_id, missing, source_factory_id, &self.config)
        }))
    }

    /// 工廠輸出彙總
    pub fn exports(
        &self,
        snapshot: &PlanningSnapshot,
        factory_id: Uuid,
        item_filter: Option<&str>,
    ) -> factory_core::Result<ExportSummary> {
        snapshot.require_factory(factory_id)?;
        Ok(ExportSummary::build(snapshot, &self.catalog, factory_id, item_filter))
    }

    /// 工廠相依圖
    pub fn dependency_graph(&self, snapshot: &PlanningSnapshot) -> DependencyGraph {
        DependencyGraph::build(snapshot, &self.catalog)
    }

    /// 獲取目錄引用
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// 獲取配置引用
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use factory_core::{Item, ProductionLine, Recipe};

    fn planner() -> FactoryPlanner {
        let mut catalog = Catalog::new();
        catalog.add_item(Item::new("A", "Item A")).unwrap();
        catalog.add_item(Item::new("B", "Item B")).unwrap();
        catalog.add_item(Item::new("Ore", "Ore")).unwrap();
        catalog
            .add_recipe(
                Recipe::new("R_A", Decimal::from(30))
                    .with_ingredient("B", Decimal::from(4))
                    .with_product("A", Decimal::from(5))
                    .with_max_power(Decimal::from(15)),
            )
            .unwrap();
        catalog
            .add_recipe(
                Recipe::new("R_B", Decimal::from(60))
                    .with_ingredient("Ore", Decimal::from(12))
                    .with_product("B", Decimal::from(12))
                    .with_max_power(Decimal::from(4)),
            )
            .unwrap();
        FactoryPlanner::new(catalog, PlannerConfig::default())
    }

    #[test]
    fn test_unknown_factory() {
        let result = planner().analyze_factory(&PlanningSnapshot::new(), Uuid::new_v4());
        assert!(matches!(result, Err(factory_core::PlanError::FactoryNotFound(_))));
    }

    #[test]
    fn test_full_pipeline() {
        let f1 = Factory::new("F1", "u").with_position(0);
        let f2 = Factory::new("F2", "u").with_position(1);
        let other_owner = Factory::new("Other", "someone-else").with_position(2);

        let snapshot = PlanningSnapshot::new()
            .with_factory(f1.clone())
            .with_factory(f2.clone())
            .with_factory(other_owner.clone())
            .with_line(ProductionLine::new(f1.id, "A", "R_A", Decimal::from(10)))
            .with_line(ProductionLine::new(f1.id, "A", "R_Missing", Decimal::from(10)))
            .with_line(ProductionLine::new(f2.id, "B", "R_B", Decimal::from(12)))
            .with_line(ProductionLine::new(other_owner.id, "B", "R_B", Decimal::from(12)));

        let analysis = planner().analyze_factory(&snapshot, f1.id).unwrap();

        assert_eq!(analysis.total_buildings, 1);
        assert_eq!(analysis.total_power_mw, Decimal::from(15));
        assert_eq!(analysis.lines.len(), 2);
        assert_eq!(analysis.warnings.len(), 1);

        let b = analysis.missing("B").unwrap();
        assert_eq!(b.still_needed_per_minute, Decimal::from(8));
        assert_eq!(b.candidate_sources.len(), 1);
        assert_eq!(b.candidate_sources[0].factory_id, f2.id);
        assert_eq!(b.candidate_sources[0].available_per_minute, Decimal::from(12));
    }

    #[test]
    fn test_analyze_all_ordered() {
        let f1 = Factory::new("F1", "u").with_position(1);
        let f2 = Factory::new("F2", "u").with_position(0);
        let snapshot = PlanningSnapshot::new()
            .with_factory(f1.clone())
            .with_factory(f2.clone())
            .with_line(ProductionLine::new(f1.id, "A", "R_A", Decimal::from(10)))
            .with_line(ProductionLine::new(f2.id, "B", "R_B", Decimal::from(12)));

        let results = planner().analyze_all(&snapshot);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].factory_id, f2.id);
        assert_eq!(results[1].factory_id, f1.id);
        // F2 缺 Ore，且沒有其他工廠生產
        assert!(results[0].missing("Ore").unwrap().candidate_sources.is_empty());
    }

    #[test]
    fn test_propose_new_import_and_increase() {
        let f1 = Factory::new("F1", "u");
        let f2 = Factory::new("F2", "u");
        let snapshot = PlanningSnapshot::new()
            .with_factory(f1.clone())
            .with_factory(f2.clone())
            .with_line(ProductionLine::new(f1.id, "A", "R_A", Decimal::from(10)))
            .with_line(ProductionLine::new(f2.id, "B", "R_B", Decimal::from(12)));
        let planner = planner();

        let proposal = planner
            .propose_new_import(&snapshot, f1.id, f2.id, "B")
            .unwrap()
            .unwrap();
        assert_eq!(proposal.kind, ProposalKind::Create);
        assert_eq!(proposal.rate_per_minute, Decimal::from(8));
        assert!(planner.propose_increase(&snapshot, f1.id, f2.id, "B").unwrap().is_none());

        // 已輸入 5/min：缺口 3，來源餘量 7 => 追加 3
        let partial = snapshot
            .clone()
            .with_import(FactoryImport::new(f1.id, f2.id, "B", Decimal::from(5)));
        let increase = planner
            .propose_increase(&partial, f1.id, f2.id, "B")
            .unwrap()
            .unwrap();
        assert_eq!(increase.rate_per_minute, Decimal::from(3));
        assert!(planner.propose_new_import(&partial, f1.id, f2.id, "B").unwrap().is_none());

        assert!(planner.propose_new_import(&snapshot, f1.id, f2.id, "Ore").unwrap().is_none());
        assert!(matches!(
            planner.propose_new_import(&snapshot, f1.id, f1.id, "B"),
            Err(PlanError::SelfImport(_))
        ));

        let foreign = Factory::new("Foreign", "someone-else");
        let with_foreign = snapshot
            .clone()
            .with_factory(foreign.clone())
            .with_line(ProductionLine::new(foreign.id, "B", "R_B", Decimal::from(12)));
        assert!(matches!(
            planner.propose_new_import(&with_foreign, f1.id, foreign.id, "B"),
            Err(PlanError::ForeignSource { .. })
        ));
    }

    #[test]
    fn test_analyze_owner_skips_other_owners() {
        let f1 = Factory::new("F1", "u").with_position(1);
        let f2 = Factory::new("F2", "u").with_position(0);
        let other = Factory::new("Other", "someone-else");
        let snapshot = PlanningSnapshot::new()
            .with_factory(f1.clone())
            .with_factory(f2.clone())
            .with_factory(other.clone())
            .with_line(ProductionLine::new(f1.id, "A", "R_A", Decimal::from(10)))
            .with_line(ProductionLine::new(other.id, "B", "R_B", Decimal::from(12)));
        let planner = planner();

        let owned: Vec<_> = planner.analyze_owner(&snapshot, "u").iter().map(|a| a.factory_id).collect();
        assert_eq!(owned, vec![f2.id, f1.id]);
        assert_eq!(planner.analyze_all(&snapshot).len(), 3);
        assert!(planner.analyze_owner(&snapshot, "nobody").is_empty());

        // 其他擁有者的 B 不列為候選來源
        let f1_analysis = &planner.analyze_owner(&snapshot, "u")[1];
        assert!(f1_analysis.missing("B").unwrap().candidate_sources.is_empty());
    }

    #[test]
    fn test_available_rate() {
        let f2 = Factory::new("F2", "u");
        let snapshot = PlanningSnapshot::new()
            .with_factory(f2.clone())
            .with_line(ProductionLine::new(f2.id, "B", "R_B", Decimal::from(13)));

        assert_eq!(planner().available_rate(&snapshot, f2.id, "B"), Decimal::from(24));
        assert_eq!(planner().available_rate(&snapshot, f2.id, "A"), Decimal::ZERO);
    }
}
