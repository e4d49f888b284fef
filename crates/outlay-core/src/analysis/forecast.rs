//! Expense forecaster
//!
//! Projects per-category amounts for the next calendar periods with a
//! confidence score blending data sufficiency and spending consistency.

use rust_decimal::Decimal;

use crate::models::NewProjection;

use super::config::AnalysisConfig;
use super::stats::CategoryStatistics;

/// Blended forecast confidence in [0, 100]
///
/// Averages a data-sufficiency component (months of data against the
/// full-confidence horizon) with a consistency component (how small the
/// standard deviation is relative to the monthly average). A zero
/// monthly average short-circuits consistency to 0 rather than dividing.
pub(crate) fn confidence_score(stats: &CategoryStatistics, config: &AnalysisConfig) -> Decimal {
    let hundred = Decimal::from(100);

    let data_confidence = if config.full_confidence_months == 0 {
        hundred
    } else {
        (Decimal::from(stats.months_of_data) / Decimal::from(config.full_confidence_months)
            * hundred)
            .min(hundred)
    };

    let consistency_confidence = if stats.monthly_average > Decimal::ZERO {
        (hundred - stats.std_dev / stats.monthly_average * hundred)
            .max(Decimal::ZERO)
            .min(hundred)
    } else {
        Decimal::ZERO
    };

    (data_confidence + consistency_confidence) / Decimal::from(2)
}

/// The calendar period `offset` months after (year, month)
pub(crate) fn future_period(year: i32, month: u32, offset: u32) -> (i32, u32) {
    let index = month - 1 + offset;
    (year + (index / 12) as i32, index % 12 + 1)
}

/// Build the projections for one category over the forecast horizon
pub(crate) fn project(
    stats: &CategoryStatistics,
    year: i32,
    month: u32,
    config: &AnalysisConfig,
) -> Vec<NewProjection> {
    let confidence = confidence_score(stats, config);
    let note = projection_note(stats, config);

    (1..=config.forecast_periods)
        .map(|i| {
            let (future_year, future_month) = future_period(year, month, i);

            let predicted_amount = if stats.category.is_fixed {
                // Fixed obligations project flat
                stats.monthly_average
            } else {
                // Fixed 2%-per-period growth heuristic, not an observed trend
                stats.monthly_average
                    * (Decimal::ONE + config.growth_per_period * Decimal::from(i))
            };

            NewProjection {
                category_id: stats.category.id,
                predicted_amount,
                month: future_month,
                year: future_year,
                confidence_score: confidence,
                note: note.clone(),
            }
        })
        .collect()
}

/// Informational note attached to a category's projections, if any
fn projection_note(stats: &CategoryStatistics, config: &AnalysisConfig) -> Option<String> {
    if stats.months_of_data < config.limited_data_months {
        return Some("Based on limited data.".to_string());
    }
    if stats.category.is_fixed {
        return stats.deviation_summary();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Expense};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn stats_for(is_fixed: bool, monthly_amounts: &[Decimal]) -> CategoryStatistics {
        let category = Category {
            id: 7,
            user_id: 1,
            name: "Groceries".to_string(),
            description: None,
            is_fixed,
            created_at: chrono::Utc::now(),
        };
        let expenses: Vec<Expense> = monthly_amounts
            .iter()
            .enumerate()
            .map(|(i, &amount)| Expense {
                id: i as i64,
                user_id: 1,
                category_id: 7,
                amount,
                date: NaiveDate::from_ymd_opt(2024, 1 + i as u32, 10).unwrap(),
                description: None,
                created_at: chrono::Utc::now(),
            })
            .collect();
        CategoryStatistics::compute(category, &expenses, dec!(10)).unwrap()
    }

    #[test]
    fn test_future_period_wraps_year() {
        assert_eq!(future_period(2024, 3, 1), (2024, 4));
        assert_eq!(future_period(2024, 11, 1), (2024, 12));
        assert_eq!(future_period(2024, 11, 2), (2025, 1));
        assert_eq!(future_period(2024, 12, 3), (2025, 3));
    }

    #[test]
    fn test_single_transaction_confidence() {
        // One expense: months_of_data = 1, std_dev = 0.
        // data_confidence = 100/6 ~ 16.67, consistency = 100.
        let stats = stats_for(false, &[dec!(5000)]);
        let confidence = confidence_score(&stats, &AnalysisConfig::default());

        assert_eq!(confidence.round_dp(2), dec!(58.33));
        assert!(confidence >= Decimal::ZERO && confidence <= dec!(100));
    }

    #[test]
    fn test_zero_monthly_average_short_circuits() {
        let stats = stats_for(false, &[dec!(0), dec!(0)]);
        let confidence = confidence_score(&stats, &AnalysisConfig::default());

        // consistency is 0, data is 2/6*100; average of the two
        assert_eq!(confidence.round_dp(2), dec!(16.67));
    }

    #[test]
    fn test_confidence_clamped_for_wild_variance() {
        // std_dev far above the monthly average would push consistency
        // negative without the clamp
        let mut stats = stats_for(false, &[dec!(100), dec!(100)]);
        stats.std_dev = dec!(500);
        let confidence = confidence_score(&stats, &AnalysisConfig::default());
        assert!(confidence >= Decimal::ZERO && confidence <= dec!(100));
    }

    #[test]
    fn test_variable_growth_heuristic() {
        // Scenario: single 5000 expense, variable category -> projections
        // at +2%, +4%, +6%
        let stats = stats_for(false, &[dec!(5000)]);
        let projections = project(&stats, 2024, 3, &AnalysisConfig::default());

        assert_eq!(projections.len(), 3);
        assert_eq!(projections[0].predicted_amount, dec!(5100.00));
        assert_eq!(projections[1].predicted_amount, dec!(5200.00));
        assert_eq!(projections[2].predicted_amount, dec!(5300.00));
        assert_eq!(
            (projections[0].year, projections[0].month),
            (2024, 4)
        );
        assert_eq!(
            (projections[2].year, projections[2].month),
            (2024, 6)
        );
    }

    #[test]
    fn test_fixed_projects_flat() {
        let stats = stats_for(true, &[dec!(20000), dec!(20000), dec!(20000)]);
        let projections = project(&stats, 2024, 3, &AnalysisConfig::default());

        for p in &projections {
            assert_eq!(p.predicted_amount, dec!(20000));
            assert!(p.note.is_none());
        }
    }

    #[test]
    fn test_limited_data_note() {
        let stats = stats_for(false, &[dec!(5000)]);
        let projections = project(&stats, 2024, 3, &AnalysisConfig::default());
        assert_eq!(
            projections[0].note.as_deref(),
            Some("Based on limited data.")
        );
    }

    #[test]
    fn test_fixed_deviation_note() {
        let stats = stats_for(true, &[dec!(20000), dec!(20000), dec!(24000)]);
        let projections = project(&stats, 2024, 3, &AnalysisConfig::default());

        let note = projections[0].note.as_deref().unwrap();
        assert!(note.starts_with("Notable variations in:"));
        assert!(note.contains("March 2024"));
    }

    #[test]
    fn test_all_periods_strictly_future() {
        let stats = stats_for(false, &[dec!(100), dec!(200), dec!(300)]);
        let projections = project(&stats, 2024, 12, &AnalysisConfig::default());

        for p in &projections {
            assert!(
                (p.year, p.month) > (2024, 12),
                "projection period must lie after the current period"
            );
        }
    }
}
