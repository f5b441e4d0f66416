//! # Factory Calculation Engine
//!
//! 產線指標、跨工廠原料相依與輸入對帳的計算引擎

pub mod availability;
pub mod calculator;
pub mod dependency;
pub mod exports;
pub mod graph;
pub mod metrics;
pub mod reconciliation;

#[cfg(test)]
mod properties;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Re-export 主要類型
pub use availability::{AvailabilityResolver, CandidateSource, FactoryOutput, ResolvedRequirement};
pub use calculator::FactoryPlanner;
pub use dependency::{DependencyAnalyzer, IngredientRequirement};
pub use exports::{ExportSummary, ExportTarget, ExportedItem};
pub use graph::{DependencyGraph, GraphEdge, GraphNode};
pub use metrics::{EnrichedAmount, EnrichedLine, LineIssue, LineMetrics, MetricsCalculator};
pub use reconciliation::{
    clamp_import_rate, increase_offer, CapacityViolation, ImportAction, ImportProposal,
    ImportReconciler, MissingIngredient, ProposalKind, RedundantImport, ReconciliationOutcome,
    SourceOption,
};

/// 單一工廠分析結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactoryAnalysis {
    pub factory_id: Uuid,
    pub factory_name: String,

    /// 附指標的產線（無法計算者帶有 issue）
    pub lines: Vec<EnrichedLine>,

    /// 仍未滿足的原料
    pub missing_ingredients: Vec<MissingIngredient>,

    /// 超過來源產量的既有輸入
    pub capacity_violations: Vec<CapacityViolation>,

    /// 已不再需要的輸入
    pub redundant_imports: Vec<RedundantImport>,

    /// 總耗電（MW）
    pub total_power_mw: Decimal,

    /// 總建築數
    pub total_buildings: u32,

    /// 警告信息
    pub warnings: Vec<PlanWarning>,

    pub computed_at: DateTime<Utc>,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl FactoryAnalysis {
    /// 是否不缺任何原料
    pub fn is_self_sufficient(&self) -> bool {
        self.missing_ingredients.is_empty()
    }

    /// 查詢指定原料的缺口
    pub fn missing(&self, item: &str) -> Option<&MissingIngredient> {
        self.missing_ingredients
            .iter()
            .find(|m| m.item_class_name == item)
    }

    /// 添加警告
    pub fn add_warning(&mut self, warning: PlanWarning) {
        self.warnings.push(warning);
    }
}

/// 規劃警告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanWarning {
    /// 產線 ID 或物品 className
    pub subject: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl PlanWarning {
    pub fn new(subject: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            subject,
            message,
            severity,
        }
    }

    pub fn info(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Info)
    }

    pub fn warning(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Warning)
    }

    pub fn error(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningSeverity {
    Info,
    Warning,
    Error,
}
