//! # Factory Planner
//!
//! 工廠規劃引擎：產線指標、跨工廠原料相依、輸入對帳與增量重算

pub use factory_cache::{AppliedMutation, DirtyTracker, IncrementalPlanner, Mutation, PassTracker};
pub use factory_calc::{
    CapacityViolation, DependencyGraph, ExportSummary, FactoryAnalysis, FactoryPlanner, ImportAction,
    ImportProposal, MissingIngredient, PlanWarning, SourceOption, WarningSeverity,
};
pub use factory_core::{
    Catalog, CatalogLoadReport, Factory, FactoryImport, Item, PlanError, PlannerConfig, PlanningSnapshot,
    ProductionLine, Recipe, Result,
};
