//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Outlay - Track spending and analyze your budget
#[derive(Parser)]
#[command(name = "outlay")]
#[command(about = "Expense tracker with heuristic budget analysis", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "outlay.db", global = true)]
    pub db: PathBuf,

    /// User profile to operate on (created on first use)
    #[arg(short, long, default_value = "default", global = true)]
    pub user: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Populate the database with deterministic demo data
    Seed,

    /// Delete all stored data (users, categories, expenses, and
    /// derived records)
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },

    /// Manage spending categories
    Category {
        #[command(subcommand)]
        action: Option<CategoryAction>,
    },

    /// Record and list expenses
    Expense {
        #[command(subcommand)]
        action: Option<ExpenseAction>,
    },

    /// Import expenses from a CSV file (date,category,amount,description)
    Import {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Run the budget analysis: statistics, patterns, recommendations,
    /// and projections
    Analyze {
        /// Analysis date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        as_of: Option<String>,

        /// Trailing window length in days
        #[arg(long, default_value = "180")]
        window_days: i64,

        /// Emit results as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show or update persisted recommendations
    Recommendations {
        #[command(subcommand)]
        action: Option<RecommendationsAction>,
    },

    /// Show persisted expense projections
    Projections,
}

#[derive(Subcommand)]
pub enum CategoryAction {
    /// Add a category
    Add {
        /// Category name
        name: String,

        /// Mark as a fixed recurring obligation (rent, insurance)
        #[arg(long)]
        fixed: bool,

        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// List categories
    List,
}

#[derive(Subcommand)]
pub enum ExpenseAction {
    /// Record an expense
    Add {
        /// Category name (must already exist)
        #[arg(short, long)]
        category: String,

        /// Amount (non-negative decimal)
        #[arg(short, long)]
        amount: String,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Optional description
        #[arg(long)]
        description: Option<String>,
    },

    /// List recent expenses
    List {
        /// Maximum number of expenses to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

#[derive(Subcommand)]
pub enum RecommendationsAction {
    /// List recommendations, largest potential savings first
    List,

    /// Mark a recommendation as implemented
    Implement {
        /// Recommendation id
        id: i64,
    },
}
