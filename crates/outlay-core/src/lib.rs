//! Outlay Core Library
//!
//! Shared functionality for the Outlay budget analysis tool:
//! - SQLite persistence for users, categories, expenses, and derived records
//! - Per-category statistics aggregation over a trailing window
//! - Heuristic budget recommendations with replace-set persistence
//! - Three-period expense forecasting with confidence scores

pub mod analysis;
pub mod db;
pub mod error;
pub mod models;

pub use analysis::{AnalysisConfig, BudgetAnalyzer, CategoryStatistics};
pub use db::Database;
pub use error::{Error, Result};
pub use models::{
    Category, Expense, NewExpense, NewProjection, NewRecommendation, PatternKind, Priority,
    Projection, Recommendation, RecommendationKind, SpendingPattern, User,
};
