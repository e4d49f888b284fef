//! Recommendation generator
//!
//! Classifies each category's statistics against heuristic thresholds
//! and composes a reason string for the resulting recommendation. The
//! classification decision and the human-readable explanation are kept
//! as separate pure functions.

use rust_decimal::Decimal;

use crate::models::{NewRecommendation, Priority, RecommendationKind};

use super::config::AnalysisConfig;
use super::stats::CategoryStatistics;

/// Which heuristic branch matched for a category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Basis {
    /// Fixed category whose amounts drift more than expected
    FixedDrift,
    /// Variable category with a high monthly average
    HighVariableSpend,
    /// Variable category with very steady spending
    SteadySpending,
}

#[derive(Debug, Clone)]
pub(crate) struct Classification {
    pub kind: RecommendationKind,
    pub priority: Priority,
    pub recommended_amount: Decimal,
    pub basis: Basis,
}

/// Classify a category's statistics
///
/// Branches are evaluated in order and are mutually exclusive: the first
/// match wins, so a category yields at most one recommendation per run.
pub(crate) fn classify(
    stats: &CategoryStatistics,
    config: &AnalysisConfig,
) -> Option<Classification> {
    let monthly_average = stats.monthly_average;
    let std_dev = stats.std_dev;

    if stats.category.is_fixed && std_dev > monthly_average * config.fixed_drift_ratio {
        return Some(Classification {
            kind: RecommendationKind::Reduce,
            priority: Priority::High,
            recommended_amount: monthly_average * config.fixed_reduce_ratio,
            basis: Basis::FixedDrift,
        });
    }

    if !stats.category.is_fixed && monthly_average > config.high_spend_threshold {
        return Some(Classification {
            kind: RecommendationKind::Reduce,
            priority: Priority::Medium,
            recommended_amount: monthly_average * config.variable_reduce_ratio,
            basis: Basis::HighVariableSpend,
        });
    }

    if !stats.category.is_fixed && std_dev < monthly_average * config.steady_ratio {
        return Some(Classification {
            kind: RecommendationKind::Save,
            priority: Priority::Low,
            recommended_amount: monthly_average - monthly_average * config.savings_ratio,
            basis: Basis::SteadySpending,
        });
    }

    None
}

/// Compose the reason text for a classified category
///
/// The confidence factor min(1, months/full_confidence_months) only ever
/// adds a disclaimer clause; it never changes which branch fired or the
/// recommended amounts.
pub(crate) fn compose_reason(
    stats: &CategoryStatistics,
    basis: Basis,
    config: &AnalysisConfig,
) -> String {
    let name = &stats.category.name;

    let mut reason = match basis {
        Basis::FixedDrift => {
            let mut text = format!(
                "Unexpected variation in fixed expense {}. Consider reviewing and optimizing.",
                name
            );
            if let Some(clause) = stats.deviation_summary() {
                text.push(' ');
                text.push_str(&clause);
            }
            text
        }
        Basis::HighVariableSpend => format!(
            "High variable spending in {}. Consider setting a budget limit.",
            name
        ),
        Basis::SteadySpending => {
            let potential = stats.monthly_average * config.savings_ratio;
            format!(
                "Consistent spending in {}. Potential for {} monthly savings.",
                name,
                potential.round_dp(2)
            )
        }
    };

    let confidence = confidence_factor(stats.months_of_data, config.full_confidence_months);
    if confidence < rust_decimal_macros::dec!(0.5) {
        reason.push_str(" This recommendation is based on limited transaction history.");
    }

    reason
}

/// min(1, months_of_data / full_confidence_months)
fn confidence_factor(months_of_data: u32, full_confidence_months: u32) -> Decimal {
    if full_confidence_months == 0 {
        return Decimal::ONE;
    }
    let factor = Decimal::from(months_of_data) / Decimal::from(full_confidence_months);
    factor.min(Decimal::ONE)
}

/// Build the recommendation for one category, if any branch matches
pub(crate) fn recommend(
    stats: &CategoryStatistics,
    config: &AnalysisConfig,
) -> Option<NewRecommendation> {
    let classification = classify(stats, config)?;
    let reason = compose_reason(stats, classification.basis, config);

    Some(NewRecommendation {
        category_id: stats.category.id,
        kind: classification.kind,
        priority: classification.priority,
        current_amount: stats.monthly_average,
        recommended_amount: classification.recommended_amount,
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Expense};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn stats_for(is_fixed: bool, monthly_amounts: &[Decimal]) -> CategoryStatistics {
        let category = Category {
            id: 1,
            user_id: 1,
            name: "Rent".to_string(),
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
                category_id: 1,
                amount,
                date: NaiveDate::from_ymd_opt(2024, 1 + i as u32, 1).unwrap(),
                description: None,
                created_at: chrono::Utc::now(),
            })
            .collect();
        CategoryStatistics::compute(category, &expenses, dec!(10)).unwrap()
    }

    #[test]
    fn test_fixed_drift_wins_first() {
        // Scenario: fixed rent 20000, 20000, 24000 -> drift above 10%
        let stats = stats_for(true, &[dec!(20000), dec!(20000), dec!(24000)]);
        let config = AnalysisConfig::default();

        let c = classify(&stats, &config).unwrap();
        assert_eq!(c.kind, RecommendationKind::Reduce);
        assert_eq!(c.priority, Priority::High);
        assert_eq!(c.basis, Basis::FixedDrift);
        assert_eq!(
            c.recommended_amount.round_dp(2),
            (stats.monthly_average * dec!(0.9)).round_dp(2)
        );

        let reason = compose_reason(&stats, c.basis, &config);
        assert!(reason.contains("Unexpected variation in fixed expense Rent"));
        assert!(reason.contains("March 2024 (12.5% variation)"));
    }

    #[test]
    fn test_steady_fixed_category_gets_nothing() {
        // Fixed category with zero drift falls through every branch:
        // branch 1 needs drift, branches 2 and 3 are variable-only.
        let stats = stats_for(true, &[dec!(20000), dec!(20000), dec!(20000)]);
        assert!(classify(&stats, &AnalysisConfig::default()).is_none());
    }

    #[test]
    fn test_high_variable_spend() {
        let stats = stats_for(false, &[dec!(12000), dec!(12500), dec!(11500)]);
        let config = AnalysisConfig::default();

        let c = classify(&stats, &config).unwrap();
        assert_eq!(c.kind, RecommendationKind::Reduce);
        assert_eq!(c.priority, Priority::Medium);
        assert_eq!(c.basis, Basis::HighVariableSpend);
        assert_eq!(
            c.recommended_amount.round_dp(2),
            (stats.monthly_average * dec!(0.8)).round_dp(2)
        );
    }

    #[test]
    fn test_saving_opportunity_below_spend_threshold() {
        // Groceries at a steady 12000/month with std_dev 1000 would hit
        // the high-spend branch under the default 10000 threshold; with
        // the threshold raised it classifies as a saving opportunity at
        // 0.9x the monthly average.
        let stats = stats_for(false, &[dec!(11000), dec!(12000), dec!(13000)]);
        let config = AnalysisConfig::default().with_high_spend_threshold(dec!(20000));

        let c = classify(&stats, &config).unwrap();
        assert_eq!(c.kind, RecommendationKind::Save);
        assert_eq!(c.priority, Priority::Low);
        assert_eq!(c.recommended_amount, dec!(10800));

        let reason = compose_reason(&stats, c.basis, &config);
        assert!(reason.contains("Consistent spending in Rent"));
        assert!(reason.contains("1200"));
    }

    #[test]
    fn test_branches_are_mutually_exclusive() {
        // A steady high-spend variable category matches branches 2 and 3;
        // only branch 2 fires.
        let stats = stats_for(false, &[dec!(12000), dec!(12000), dec!(12000)]);
        let config = AnalysisConfig::default();

        let c = classify(&stats, &config).unwrap();
        assert_eq!(c.basis, Basis::HighVariableSpend);
    }

    #[test]
    fn test_drift_boundary_is_strict() {
        // std_dev exactly at the 10% boundary does not trigger drift
        let mut stats = stats_for(true, &[dec!(20000), dec!(20000), dec!(20000)]);
        stats.std_dev = stats.monthly_average * dec!(0.1);
        assert!(classify(&stats, &AnalysisConfig::default()).is_none());

        stats.std_dev += dec!(0.01);
        assert!(classify(&stats, &AnalysisConfig::default()).is_some());
    }

    #[test]
    fn test_limited_data_disclaimer() {
        // Two months of data: confidence factor 2/6 < 0.5 -> disclaimer
        let stats = stats_for(false, &[dec!(1000), dec!(1000)]);
        let config = AnalysisConfig::default();

        let c = classify(&stats, &config).unwrap();
        let reason = compose_reason(&stats, c.basis, &config);
        assert!(reason.contains("limited transaction history"));

        // Three months: factor 0.5, no disclaimer
        let stats = stats_for(false, &[dec!(1000), dec!(1000), dec!(1000)]);
        let c = classify(&stats, &config).unwrap();
        let reason = compose_reason(&stats, c.basis, &config);
        assert!(!reason.contains("limited transaction history"));
    }

    #[test]
    fn test_confidence_factor_affects_text_only() {
        let short = stats_for(false, &[dec!(1000)]);
        let config = AnalysisConfig::default();

        let c = classify(&short, &config).unwrap();
        // Amounts identical to what a long history would produce
        assert_eq!(c.recommended_amount, dec!(900));
        assert_eq!(c.kind, RecommendationKind::Save);
    }

    #[test]
    fn test_recommend_builds_draft() {
        let stats = stats_for(true, &[dec!(20000), dec!(20000), dec!(24000)]);
        let draft = recommend(&stats, &AnalysisConfig::default()).unwrap();

        assert_eq!(draft.category_id, 1);
        assert_eq!(draft.current_amount, stats.monthly_average);
        assert_eq!(
            draft.potential_savings(),
            stats.monthly_average - stats.monthly_average * dec!(0.9)
        );
    }
}
