//! Outlay CLI - expense tracking and budget analysis
//!
//! Usage:
//!   outlay init                  Initialize database
//!   outlay seed                  Load deterministic demo data
//!   outlay import --file CSV     Import expenses
//!   outlay analyze               Run the budget analysis

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Seed => commands::cmd_seed(&cli.db, &cli.user),
        Commands::Reset { force } => commands::cmd_reset(&cli.db, force),
        Commands::Category { action } => {
            let (db, user_id) = commands::open_db_for_user(&cli.db, &cli.user)?;
            match action {
                None | Some(CategoryAction::List) => commands::cmd_category_list(&db, user_id),
                Some(CategoryAction::Add {
                    name,
                    fixed,
                    description,
                }) => commands::cmd_category_add(&db, user_id, &name, fixed, description.as_deref()),
            }
        }
        Commands::Expense { action } => {
            let (db, user_id) = commands::open_db_for_user(&cli.db, &cli.user)?;
            match action {
                None => commands::cmd_expense_list(&db, user_id, 20),
                Some(ExpenseAction::List { limit }) => {
                    commands::cmd_expense_list(&db, user_id, limit)
                }
                Some(ExpenseAction::Add {
                    category,
                    amount,
                    date,
                    description,
                }) => commands::cmd_expense_add(
                    &db,
                    user_id,
                    &category,
                    &amount,
                    date.as_deref(),
                    description.as_deref(),
                ),
            }
        }
        Commands::Import { file } => {
            let (db, user_id) = commands::open_db_for_user(&cli.db, &cli.user)?;
            commands::cmd_import(&db, user_id, &file)
        }
        Commands::Analyze {
            as_of,
            window_days,
            json,
        } => {
            let (db, user_id) = commands::open_db_for_user(&cli.db, &cli.user)?;
            commands::cmd_analyze(&db, user_id, as_of.as_deref(), window_days, json)
        }
        Commands::Recommendations { action } => {
            let (db, user_id) = commands::open_db_for_user(&cli.db, &cli.user)?;
            match action {
                None | Some(RecommendationsAction::List) => {
                    commands::cmd_recommendations_list(&db, user_id)
                }
                Some(RecommendationsAction::Implement { id }) => {
                    commands::cmd_recommendation_implement(&db, id)
                }
            }
        }
        Commands::Projections => {
            let (db, user_id) = commands::open_db_for_user(&cli.db, &cli.user)?;
            commands::cmd_projections_list(&db, user_id)
        }
    }
}
