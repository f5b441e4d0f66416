//! 輸入對帳
//!
//! 以既有輸入記錄沖銷原料需求，只保留仍未滿足的部分，並為每個來源工廠
//! 給出可執行的動作。任何建議的輸入量都不會超過來源工廠的實際產量。

use std::collections::{BTreeMap, HashMap, HashSet};

use factory_core::{FactoryImport, ImportKey, PlannerConfig};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::availability::{FactoryOutput, ResolvedRequirement};

/// 來源工廠可執行的動作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportAction {
    /// 尚無輸入，可建立
    Import,
    /// 已有輸入，來源仍有餘量且仍有缺口，可追加
    Increase,
    /// 已有輸入，無法再追加
    Imported,
}

/// 來源工廠選項
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceOption {
    pub factory_id: Uuid,
    pub factory_name: String,
    /// 來源工廠的總產量
    pub available_per_minute: Decimal,
    /// 已從此來源輸入的量
    pub existing_import_per_minute: Option<Decimal>,
    pub action: ImportAction,
    /// 建立或追加時建議的量（已夾限）
    pub suggested_per_minute: Decimal,
}

/// 仍未滿足的原料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingIngredient {
    pub item_class_name: String,
    pub name: String,
    /// 總需求
    pub required_per_minute: Decimal,
    /// 已輸入合計
    pub imported_per_minute: Decimal,
    /// 剩餘缺口
    pub still_needed_per_minute: Decimal,
    pub candidate_sources: Vec<SourceOption>,
}

impl MissingIngredient {
    /// 指定來源的選項
    pub fn source(&self, factory_id: Uuid) -> Option<&SourceOption> {
        self.candidate_sources
            .iter()
            .find(|s| s.factory_id == factory_id)
    }

    /// 是否有其他工廠可供應
    pub fn has_sources(&self) -> bool {
        !self.candidate_sources.is_empty()
    }
}

/// 輸入超過來源產量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityViolation {
    pub key: ImportKey,
    pub import_ids: Vec<Uuid>,
    pub imported_per_minute: Decimal,
    pub available_per_minute: Decimal,
}

impl CapacityViolation {
    /// 超出的量
    pub fn oversubscribed_by(&self) -> Decimal {
        self.imported_per_minute - self.available_per_minute
    }
}

/// 已不再需要的輸入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedundantImport {
    pub import_id: Uuid,
    pub source_factory_id: Uuid,
    pub item_class_name: String,
    pub required_amount: Decimal,
}

/// 建議的輸入變更
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalKind {
    Create,
    Increase,
}

/// 輸入建議（量已夾限在缺口與來源產量之內）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportProposal {
    pub key: ImportKey,
    pub kind: ProposalKind,
    /// 建立時為新輸入量；追加時為增加量
    pub rate_per_minute: Decimal,
}

/// 對帳結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationOutcome {
    pub missing: Vec<MissingIngredient>,
    pub violations: Vec<CapacityViolation>,
    pub redundant: Vec<RedundantImport>,
}

/// 輸入對帳器
pub struct ImportReconciler;

impl ImportReconciler {
    /// 以既有輸入沖銷需求
    ///
    /// * `imports` - 目標工廠的有效輸入記錄
    /// * `outputs` - 同擁有者其他工廠的產量，用於檢查既有輸入是否超過來源產量
    pub fn reconcile(
        target_factory_id: Uuid,
        resolved: Vec<ResolvedRequirement>,
        imports: &[&FactoryImport],
        outputs: &[FactoryOutput],
        config: &PlannerConfig,
    ) -> ReconciliationOutcome {
        let imports: Vec<&FactoryImport> = imports
            .iter()
            .copied()
            .filter(|i| i.active && i.target_factory_id == target_factory_id)
            .collect();

        let imported_by_item = Self::sum_by_item(&imports);
        let imported_by_source = Self::sum_by_source(&imports);

        let required_items: HashSet<&str> = resolved
            .iter()
            .map(|r| r.requirement.item_class_name.as_str())
            .collect();

        let redundant = imports
            .iter()
            .filter(|i| !required_items.contains(i.item_class_name.as_str()))
            .map(|i| RedundantImport {
                import_id: i.id,
                source_factory_id: i.source_factory_id,
                item_class_name: i.item_class_name.clone(),
                required_amount: i.required_amount,
            })
            .collect();

        let violations = Self::capacity_violations(&imports, outputs, config);

        let mut missing = Vec::new();
        for entry in resolved {
            let requirement = entry.requirement;
            let imported = imported_by_item
                .get(requirement.item_class_name.as_str())
                .copied()
                .unwrap_or(Decimal::ZERO);
            let still_needed = requirement.required_per_minute - imported;

            if config.is_satisfied(still_needed) {
                tracing::debug!(
                    "原料 {} 已由輸入滿足（需求 {}，已輸入 {}）",
                    requirement.item_class_name,
                    requirement.required_per_minute,
                    imported
                );
                continue;
            }

            let candidate_sources = entry
                .candidates
                .into_iter()
                .map(|candidate| {
                    let existing = imported_by_source
                        .get(&(candidate.factory_id, requirement.item_class_name.as_str()))
                        .copied();
                    let (action, suggested) = match existing {
                        None => (
                            ImportAction::Import,
                            clamp_import_rate(still_needed, still_needed, candidate.available_per_minute),
                        ),
                        Some(current) => {
                            let offer = increase_offer(candidate.available_per_minute, current, still_needed);
                            if config.exceeds_tolerance(offer) {
                                (ImportAction::Increase, offer)
                            } else {
                                (ImportAction::Imported, Decimal::ZERO)
                            }
                        }
                    };
                    SourceOption {
                        factory_id: candidate.factory_id,
                        factory_name: candidate.factory_name,
                        available_per_minute: candidate.available_per_minute,
                        existing_import_per_minute: existing,
                        action,
                        suggested_per_minute: suggested,
                    }
                })
                .collect();

            missing.push(MissingIngredient {
                item_class_name: requirement.item_class_name,
                name: requirement.name,
                required_per_minute: requirement.required_per_minute,
                imported_per_minute: imported,
                still_needed_per_minute: still_needed,
                candidate_sources,
            });
        }

        ReconciliationOutcome {
            missing,
            violations,
            redundant,
        }
    }

    /// 依物品合計輸入量（跨來源）
    pub fn sum_by_item<'a>(imports: &[&'a FactoryImport]) -> HashMap<&'a str, Decimal> {
        let mut totals: HashMap<&str, Decimal> = HashMap::new();
        for import in imports {
            *totals
                .entry(import.item_class_name.as_str())
                .or_insert(Decimal::ZERO) += import.required_amount;
        }
        totals
    }

    fn sum_by_source<'a>(imports: &[&'a FactoryImport]) -> HashMap<(Uuid, &'a str), Decimal> {
        let mut totals: HashMap<(Uuid, &str), Decimal> = HashMap::new();
        for import in imports {
            *totals
                .entry((import.source_factory_id, import.item_class_name.as_str()))
                .or_insert(Decimal::ZERO) += import.required_amount;
        }
        totals
    }

    /// 找出超過來源產量的輸入
    ///
    /// 同一 (目標, 來源, 物品) 的多筆記錄合併計算。來源不在 `outputs` 中
    /// 或已停產時，可用量視為零。
    pub fn capacity_violations(
        imports: &[&FactoryImport],
        outputs: &[FactoryOutput],
        config: &PlannerConfig,
    ) -> Vec<CapacityViolation> {
        let mut grouped: BTreeMap<ImportKey, (Vec<Uuid>, Decimal)> = BTreeMap::new();
        for import in imports.iter().filter(|i| i.active) {
            let slot = grouped
                .entry(import.key())
                .or_insert_with(|| (Vec::new(), Decimal::ZERO));
            slot.0.push(import.id);
            slot.1 += import.required_amount;
        }

        grouped
            .into_iter()
            .filter_map(|(key, (import_ids, imported))| {
                let available = outputs
                    .iter()
                    .find(|o| o.factory_id == key.source_factory_id)
                    .map(|o| o.rate_of(&key.item_class_name))
                    .unwrap_or(Decimal::ZERO);

                if !config.exceeds_tolerance(imported - available) {
                    return None;
                }

                tracing::warn!(
                    "輸入超過來源產量：{} -> {} 的 {}，輸入 {}/min，產量 {}/min",
                    key.source_factory_id,
                    key.target_factory_id,
                    key.item_class_name,
                    imported,
                    available
                );
                Some(CapacityViolation {
                    key,
                    import_ids,
                    imported_per_minute: imported,
                    available_per_minute: available,
                })
            })
            .collect()
    }

    /// 依對帳結果為指定來源產生輸入建議
    ///
    /// 來源已無法追加或量在容差內時回傳 `None`。
    pub fn propose(
        target_factory_id: Uuid,
        missing: &MissingIngredient,
        source_factory_id: Uuid,
        config: &PlannerConfig,
    ) -> Option<ImportProposal> {
        let option = missing.source(source_factory_id)?;
        let kind = match option.action {
            ImportAction::Import => ProposalKind::Create,
            ImportAction::Increase => ProposalKind::Increase,
            ImportAction::Imported => return None,
        };
        if !config.exceeds_tolerance(option.suggested_per_minute) {
            return None;
        }
        Some(ImportProposal {
            key: ImportKey::new(
                target_factory_id,
                source_factory_id,
                missing.item_class_name.clone(),
            ),
            kind,
            rate_per_minute: option.suggested_per_minute,
        })
    }
}

/// 新輸入量 = min(要求量, 缺口, 來源產量)，不小於零
pub fn clamp_import_rate(requested: Decimal, still_needed: Decimal, available: Decimal) -> Decimal {
    requested
        .min(still_needed)
        .min(available)
        .max(Decimal::ZERO)
}

/// 追加量 = min(來源餘量, 缺口)，不小於零
pub fn increase_offer(available: Decimal, existing: Decimal, still_needed: Decimal) -> Decimal {
    (available - existing).min(still_needed).max(Decimal::ZERO)
}
