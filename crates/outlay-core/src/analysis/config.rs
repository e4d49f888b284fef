//! Analysis configuration
//!
//! Every threshold the engine branches on lives here rather than as a
//! hidden constant, so callers and tests can exercise boundary values
//! deterministically.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Tunable thresholds for the budget analysis engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Trailing analysis window in days, ending at `as_of`
    pub window_days: i64,
    /// A month's total must deviate from the mean by more than this
    /// percentage to be recorded in `monthly_deviations`
    pub deviation_threshold_pct: Decimal,
    /// Fixed category drift: std_dev above this fraction of the monthly
    /// average triggers a high-priority reduce recommendation
    pub fixed_drift_ratio: Decimal,
    /// Variable category steadiness: std_dev below this fraction of the
    /// monthly average marks a saving opportunity
    pub steady_ratio: Decimal,
    /// Std_dev above this fraction of the monthly average flags a
    /// high-variability spending pattern
    pub high_variability_ratio: Decimal,
    /// Monthly average above this amount flags high variable spending
    pub high_spend_threshold: Decimal,
    /// Recommended amount for drifting fixed categories, as a fraction
    /// of the monthly average
    pub fixed_reduce_ratio: Decimal,
    /// Recommended amount for high variable spend, as a fraction of the
    /// monthly average
    pub variable_reduce_ratio: Decimal,
    /// Fraction of the monthly average treated as attainable savings for
    /// steady categories
    pub savings_ratio: Decimal,
    /// Per-period compounding growth applied to variable projections
    pub growth_per_period: Decimal,
    /// How many future calendar periods to project
    pub forecast_periods: u32,
    /// Months of data at which confidence reaches its maximum
    pub full_confidence_months: u32,
    /// Below this many months of data, projections carry a limited-data note
    pub limited_data_months: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_days: 180,
            deviation_threshold_pct: dec!(10),
            fixed_drift_ratio: dec!(0.1),
            steady_ratio: dec!(0.2),
            high_variability_ratio: dec!(0.3),
            high_spend_threshold: dec!(10000),
            fixed_reduce_ratio: dec!(0.9),
            variable_reduce_ratio: dec!(0.8),
            savings_ratio: dec!(0.1),
            growth_per_period: dec!(0.02),
            forecast_periods: 3,
            full_confidence_months: 6,
            limited_data_months: 3,
        }
    }
}

impl AnalysisConfig {
    pub fn with_window_days(mut self, days: i64) -> Self {
        self.window_days = days;
        self
    }

    pub fn with_deviation_threshold_pct(mut self, pct: Decimal) -> Self {
        self.deviation_threshold_pct = pct;
        self
    }

    pub fn with_high_spend_threshold(mut self, threshold: Decimal) -> Self {
        self.high_spend_threshold = threshold;
        self
    }
}
