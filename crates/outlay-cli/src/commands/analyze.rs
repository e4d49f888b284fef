//! Analysis run plus recommendation and projection display

use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use outlay_core::analysis::stats::month_name;
use outlay_core::{AnalysisConfig, BudgetAnalyzer, Database};

/// Run the full analysis pipeline and print (or emit as JSON) the results
///
/// Recommendations and projections are persisted as part of the run, so a
/// later `outlay recommendations` or `outlay projections` shows the same
/// snapshot.
pub fn cmd_analyze(
    db: &Database,
    user_id: i64,
    as_of: Option<&str>,
    window_days: i64,
    json: bool,
) -> Result<()> {
    let as_of = match as_of {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid --as-of date '{}' (expected YYYY-MM-DD)", s))?,
        None => chrono::Local::now().date_naive(),
    };

    let config = AnalysisConfig::default().with_window_days(window_days);
    let analyzer = BudgetAnalyzer::new(db, user_id, as_of).with_config(config);

    let statistics = analyzer.category_statistics()?;
    let patterns = analyzer.analyze_spending_patterns()?;
    let recommendations = analyzer.generate_recommendations()?;
    let projections = analyzer.predict_future_expenses()?;

    let names: HashMap<i64, String> = statistics
        .values()
        .map(|s| (s.category.id, s.category.name.clone()))
        .collect();
    let name_of = |id: i64| names.get(&id).map(String::as_str).unwrap_or("?");

    if json {
        let payload = serde_json::json!({
            "as_of": as_of.to_string(),
            "window_days": window_days,
            "statistics": statistics.values().collect::<Vec<_>>(),
            "patterns": patterns,
            "recommendations": recommendations,
            "projections": projections,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("Budget analysis as of {} ({} day window)", as_of, window_days);
    println!();

    if statistics.is_empty() {
        println!("No expenses in the analysis window. Nothing to analyze.");
        return Ok(());
    }

    println!("Category statistics:");
    for stats in statistics.values() {
        let kind = if stats.category.is_fixed { "fixed" } else { "variable" };
        println!(
            "  {} ({}): {} expenses totaling {} over {} month(s)",
            stats.category.name, kind, stats.count, stats.total, stats.months_of_data
        );
        println!(
            "    monthly average {}, per-expense mean {}, std dev {}",
            stats.monthly_average.round_dp(2),
            stats.mean.round_dp(2),
            stats.std_dev.round_dp(2)
        );
        for deviation in &stats.monthly_deviations {
            println!(
                "    deviation: {} {} off the mean by {}%",
                month_name(deviation.month),
                deviation.year,
                deviation.deviation_pct.round_dp(1)
            );
        }
    }

    if !patterns.is_empty() {
        println!();
        println!("Spending patterns:");
        for pattern in &patterns {
            println!("  [{}] {}: {}", pattern.kind, pattern.category_name, pattern.message);
        }
    }

    println!();
    if recommendations.is_empty() {
        println!("No recommendations for this window.");
    } else {
        println!("Recommendations (largest potential savings first):");
        for rec in &recommendations {
            println!(
                "  #{} [{}/{}] {}: {} -> {} (saves {})",
                rec.id,
                rec.kind,
                rec.priority,
                name_of(rec.category_id),
                rec.current_amount.round_dp(2),
                rec.recommended_amount.round_dp(2),
                rec.potential_savings.round_dp(2)
            );
            println!("      {}", rec.reason);
        }
    }

    println!();
    if projections.is_empty() {
        println!("No projections for this window.");
    } else {
        println!("Projected expenses for the next 3 months:");
        for projection in &projections {
            print!(
                "  {} {} {}: {} (confidence {}%)",
                month_name(projection.month),
                projection.year,
                name_of(projection.category_id),
                projection.predicted_amount.round_dp(2),
                projection.confidence_score.round_dp(0)
            );
            match &projection.note {
                Some(note) => println!(" - {}", note),
                None => println!(),
            }
        }
    }

    Ok(())
}

pub fn cmd_recommendations_list(db: &Database, user_id: i64) -> Result<()> {
    let recommendations = db.list_recommendations(user_id)?;
    if recommendations.is_empty() {
        println!("No recommendations. Run 'outlay analyze' first.");
        return Ok(());
    }

    let categories = db.list_categories(user_id)?;
    let name_of = |id: i64| -> &str {
        categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
            .unwrap_or("?")
    };

    for rec in &recommendations {
        let status = if rec.implemented { "implemented" } else { "open" };
        println!(
            "#{} [{}/{}] {} ({}): {} -> {} (saves {})",
            rec.id,
            rec.kind,
            rec.priority,
            name_of(rec.category_id),
            status,
            rec.current_amount.round_dp(2),
            rec.recommended_amount.round_dp(2),
            rec.potential_savings.round_dp(2)
        );
        println!("    {}", rec.reason);
    }
    Ok(())
}

pub fn cmd_recommendation_implement(db: &Database, id: i64) -> Result<()> {
    db.set_recommendation_implemented(id, true)
        .with_context(|| format!("Failed to update recommendation {}", id))?;
    println!("Recommendation {} marked as implemented.", id);
    Ok(())
}

pub fn cmd_projections_list(db: &Database, user_id: i64) -> Result<()> {
    let projections = db.list_projections(user_id)?;
    if projections.is_empty() {
        println!("No projections. Run 'outlay analyze' first.");
        return Ok(());
    }

    let categories = db.list_categories(user_id)?;
    let name_of = |id: i64| -> &str {
        categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
            .unwrap_or("?")
    };

    for projection in &projections {
        print!(
            "{} {} {}: {} (confidence {}%)",
            month_name(projection.month),
            projection.year,
            name_of(projection.category_id),
            projection.predicted_amount.round_dp(2),
            projection.confidence_score.round_dp(0)
        );
        match &projection.note {
            Some(note) => println!(" - {}", note),
            None => println!(),
        }
    }
    Ok(())
}
