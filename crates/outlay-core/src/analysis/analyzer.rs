//! Budget analyzer - orchestrates statistics, recommendations, and forecasts
//!
//! One analyzer serves one user for one analysis run and completes
//! synchronously before returning. Concurrent runs for different users
//! are independent; the caller is responsible for serializing runs for
//! the same user, since replace-set persistence is not safe under
//! interleaving.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use tracing::{debug, info};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{Expense, PatternKind, Projection, Recommendation, SpendingPattern};

use super::config::AnalysisConfig;
use super::stats::CategoryStatistics;
use super::{forecast, recommend};

/// Per-user budget analysis engine
pub struct BudgetAnalyzer<'a> {
    db: &'a Database,
    user_id: i64,
    /// End of the trailing analysis window and the current period for
    /// forecasting
    as_of: NaiveDate,
    config: AnalysisConfig,
}

impl<'a> BudgetAnalyzer<'a> {
    /// Create an analyzer with the default configuration
    pub fn new(db: &'a Database, user_id: i64, as_of: NaiveDate) -> Self {
        Self {
            db,
            user_id,
            as_of,
            config: AnalysisConfig::default(),
        }
    }

    /// Override the analysis configuration
    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Resolve and validate the analysis window
    ///
    /// Rejects non-positive windows synchronously, before any read, so
    /// the caller can distinguish bad input from a no-data run.
    fn window(&self) -> Result<(NaiveDate, NaiveDate)> {
        if self.config.window_days < 1 {
            return Err(Error::InvalidWindow(format!(
                "window must be at least 1 day, got {}",
                self.config.window_days
            )));
        }
        let start = self.as_of - Duration::days(self.config.window_days);
        Ok((start, self.as_of))
    }

    /// Compute per-category statistics over the analysis window
    ///
    /// Categories with no expenses in the window are omitted. Pure with
    /// respect to the data store: reads only.
    pub fn category_statistics(&self) -> Result<BTreeMap<i64, CategoryStatistics>> {
        let (start, end) = self.window()?;

        let categories = self.db.list_categories(self.user_id)?;
        let expenses = self.db.list_expenses_in_range(self.user_id, start, end)?;

        let mut by_category: BTreeMap<i64, Vec<Expense>> = BTreeMap::new();
        for expense in expenses {
            by_category
                .entry(expense.category_id)
                .or_default()
                .push(expense);
        }

        let mut stats = BTreeMap::new();
        for category in categories {
            let Some(expenses) = by_category.get(&category.id) else {
                continue;
            };
            let category_id = category.id;
            if let Some(s) = CategoryStatistics::compute(
                category,
                expenses,
                self.config.deviation_threshold_pct,
            ) {
                stats.insert(category_id, s);
            }
        }

        debug!(
            user_id = self.user_id,
            categories = stats.len(),
            window_start = %start,
            window_end = %end,
            "Computed category statistics"
        );
        Ok(stats)
    }

    /// Flag notable spending patterns across categories
    ///
    /// Patterns are advisory and not persisted; unlike recommendations,
    /// a category can carry several at once.
    pub fn analyze_spending_patterns(&self) -> Result<Vec<SpendingPattern>> {
        let stats = self.category_statistics()?;
        let mut patterns = Vec::new();

        for s in stats.values() {
            if s.std_dev > s.monthly_average * self.config.high_variability_ratio {
                patterns.push(SpendingPattern {
                    category_id: s.category.id,
                    category_name: s.category.name.clone(),
                    kind: PatternKind::HighVariability,
                    message: format!("High spending variability in {}", s.category.name),
                });
            }

            if s.monthly_average > self.config.high_spend_threshold {
                patterns.push(SpendingPattern {
                    category_id: s.category.id,
                    category_name: s.category.name.clone(),
                    kind: PatternKind::HighSpending,
                    message: format!("High monthly spending in {}", s.category.name),
                });
            }
        }

        Ok(patterns)
    }

    /// Generate and persist the user's recommendation set
    ///
    /// Replaces any prior recommendations atomically and returns the new
    /// set, largest potential savings first. Repeated runs against
    /// unchanged expense data persist an identical set.
    pub fn generate_recommendations(&self) -> Result<Vec<Recommendation>> {
        let stats = self.category_statistics()?;

        let mut drafts: Vec<_> = stats
            .values()
            .filter_map(|s| recommend::recommend(s, &self.config))
            .collect();
        drafts.sort_by(|a, b| b.potential_savings().cmp(&a.potential_savings()));

        let persisted = self.db.replace_recommendations(self.user_id, &drafts)?;
        info!(
            user_id = self.user_id,
            count = persisted.len(),
            "Generated budget recommendations"
        );
        Ok(persisted)
    }

    /// Project per-category spending for the upcoming periods
    ///
    /// Replaces the user's future-dated projections atomically and
    /// returns the new set.
    pub fn predict_future_expenses(&self) -> Result<Vec<Projection>> {
        let stats = self.category_statistics()?;
        let (year, month) = (self.as_of.year(), self.as_of.month());

        let drafts: Vec<_> = stats
            .values()
            .flat_map(|s| forecast::project(s, year, month, &self.config))
            .collect();

        let persisted = self
            .db
            .replace_future_projections(self.user_id, year, month, &drafts)?;
        info!(
            user_id = self.user_id,
            count = persisted.len(),
            "Projected future expenses"
        );
        Ok(persisted)
    }
}
