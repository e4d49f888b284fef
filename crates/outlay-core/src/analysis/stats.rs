//! Statistics aggregator
//!
//! Scans a user's expenses within the analysis window and produces
//! per-category descriptive statistics. Pure functions of the expense
//! snapshot; no side effects.

use std::collections::BTreeMap;

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Category, Expense};

/// Summed spending for one calendar month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub year: i32,
    pub month: u32,
    pub total: Decimal,
}

/// A month whose total deviates from the mean beyond the threshold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyDeviation {
    pub year: i32,
    pub month: u32,
    /// Absolute deviation from the mean, as a percentage of the mean
    pub deviation_pct: Decimal,
}

/// Descriptive statistics for one (user, category) pair over the window
///
/// Derived and transient: recomputed on every run, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryStatistics {
    pub category: Category,
    /// Number of expenses in the window
    pub count: u64,
    pub total: Decimal,
    /// Mean expense amount (per transaction, not per month)
    pub mean: Decimal,
    /// Population standard deviation of expense amounts; 0 when count <= 1
    pub std_dev: Decimal,
    /// Inclusive month span between the earliest and latest expense
    /// observed in the window, floored at 1. Derived from the data, not
    /// the configured window, so a single expense always yields 1 even
    /// inside a 180-day window.
    pub months_of_data: u32,
    /// total / months_of_data
    pub monthly_average: Decimal,
    pub monthly_totals: Vec<MonthlyTotal>,
    pub monthly_deviations: Vec<MonthlyDeviation>,
}

impl CategoryStatistics {
    /// Compute statistics for one category's expenses
    ///
    /// Returns `None` when the category has no expenses in the window --
    /// the no-data condition, which is silence rather than an error.
    pub fn compute(
        category: Category,
        expenses: &[Expense],
        deviation_threshold_pct: Decimal,
    ) -> Option<Self> {
        if expenses.is_empty() {
            return None;
        }

        let count = expenses.len() as u64;
        let total: Decimal = expenses.iter().map(|e| e.amount).sum();
        let mean = total / Decimal::from(count);
        let std_dev = population_std_dev(expenses, mean);

        let first = expenses.iter().map(|e| e.date).min()?;
        let last = expenses.iter().map(|e| e.date).max()?;
        let months_of_data = month_span(first, last);
        let monthly_average = total / Decimal::from(months_of_data);

        let mut by_month: BTreeMap<(i32, u32), Decimal> = BTreeMap::new();
        for expense in expenses {
            let key = (expense.date.year(), expense.date.month());
            *by_month.entry(key).or_insert(Decimal::ZERO) += expense.amount;
        }

        let mut monthly_totals = Vec::with_capacity(by_month.len());
        let mut monthly_deviations = Vec::new();
        for (&(year, month), &month_total) in &by_month {
            monthly_totals.push(MonthlyTotal {
                year,
                month,
                total: month_total,
            });

            // Percentage checks only make sense against a positive mean
            if mean > Decimal::ZERO {
                let deviation_pct = ((month_total - mean).abs() / mean) * Decimal::from(100);
                if deviation_pct > deviation_threshold_pct {
                    monthly_deviations.push(MonthlyDeviation {
                        year,
                        month,
                        deviation_pct,
                    });
                }
            }
        }

        Some(Self {
            category,
            count,
            total,
            mean,
            std_dev,
            months_of_data,
            monthly_average,
            monthly_totals,
            monthly_deviations,
        })
    }

    /// Human-readable clause listing the deviating months
    ///
    /// e.g. "Notable variations in: March 2024 (12.5% variation)."
    /// Kept separate from the classification logic so decisions stay
    /// independently testable from their explanations.
    pub fn deviation_summary(&self) -> Option<String> {
        if self.monthly_deviations.is_empty() {
            return None;
        }

        let parts: Vec<String> = self
            .monthly_deviations
            .iter()
            .map(|d| {
                format!(
                    "{} {} ({}% variation)",
                    month_name(d.month),
                    d.year,
                    d.deviation_pct.round_dp(1)
                )
            })
            .collect();

        Some(format!("Notable variations in: {}.", parts.join(", ")))
    }
}

/// Population standard deviation; defined as 0 when count <= 1
fn population_std_dev(expenses: &[Expense], mean: Decimal) -> Decimal {
    if expenses.len() <= 1 {
        return Decimal::ZERO;
    }

    let sum_sq: Decimal = expenses
        .iter()
        .map(|e| {
            let diff = e.amount - mean;
            diff * diff
        })
        .sum();
    let variance = sum_sq / Decimal::from(expenses.len() as u64);

    use rust_decimal::MathematicalOps;
    variance.sqrt().unwrap_or(Decimal::ZERO)
}

/// Inclusive month span between two dates (Jan 15 to Mar 3 spans 3 months)
fn month_span(first: chrono::NaiveDate, last: chrono::NaiveDate) -> u32 {
    let first_idx = first.year() * 12 + first.month0() as i32;
    let last_idx = last.year() * 12 + last.month0() as i32;
    (last_idx - first_idx + 1).max(1) as u32
}

/// English month name for a 1-based month number
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}
