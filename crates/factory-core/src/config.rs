//! 規劃參數配置

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Result;

/// 規劃參數配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// 滿足容差（剩餘需求不超過此值即視為已滿足）
    pub satisfaction_tolerance: Decimal,

    /// 配方未提供功率時每棟建築的預設功率（MW）
    pub default_power_per_building: Decimal,

    /// 配方未宣告建築時的建築名稱
    pub unknown_building_label: String,

    /// 是否將停用的產線納入相依分析
    /// - false: 只分析啟用中的產線（預設）
    /// - true: 所有產線都視為實際生產
    pub include_inactive_lines: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            satisfaction_tolerance: Decimal::new(1, 2),
            default_power_per_building: Decimal::ONE,
            unknown_building_label: "Unknown".to_string(),
            include_inactive_lines: false,
        }
    }
}

impl PlannerConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 從 JSON 載入配置，缺少的欄位採預設值
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 建構器模式：設置滿足容差
    pub fn with_satisfaction_tolerance(mut self, tolerance: Decimal) -> Self {
        self.satisfaction_tolerance = tolerance.abs();
        self
    }

    /// 建構器模式：設置預設功率
    pub fn with_default_power_per_building(mut self, power: Decimal) -> Self {
        self.default_power_per_building = power;
        self
    }

    /// 建構器模式：設置未知建築名稱
    pub fn with_unknown_building_label(mut self, label: impl Into<String>) -> Self {
        self.unknown_building_label = label.into();
        self
    }

    /// 建構器模式：設置是否納入停用產線
    pub fn with_include_inactive_lines(mut self, include: bool) -> Self {
        self.include_inactive_lines = include;
        self
    }

    /// 剩餘需求是否已在容差內
    pub fn is_satisfied(&self, still_needed: Decimal) -> bool {
        still_needed <= self.satisfaction_tolerance
    }

    /// 數量是否超過容差（視為有意義的正值）
    pub fn exceeds_tolerance(&self, amount: Decimal) -> bool {
        amount > self.satisfaction_tolerance
    }
}
