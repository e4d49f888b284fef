//! Budget Analysis Engine
//!
//! Given a user's categorized expense history, the engine computes
//! rolling statistics, classifies spending patterns, emits prioritized
//! recommendations, and projects future spend with a confidence measure.
//!
//! ## Components
//!
//! - **Statistics Aggregator** (`stats`) - per-category descriptive
//!   statistics over a trailing window
//! - **Recommendation Generator** (`recommend`) - heuristic classification
//!   with reason text, persisted as a replace-set snapshot
//! - **Forecaster** (`forecast`) - three-period projections with a blended
//!   confidence score
//!
//! ## Usage
//!
//! ```rust,ignore
//! use outlay_core::analysis::BudgetAnalyzer;
//!
//! let analyzer = BudgetAnalyzer::new(&db, user_id, as_of);
//! let recommendations = analyzer.generate_recommendations()?;
//! let projections = analyzer.predict_future_expenses()?;
//! ```
//!
//! The forecasting model is deliberately simple (no regression or
//! seasonality); its value is that it is deterministic and cheap, not
//! that it is statistically rigorous.

pub mod analyzer;
pub mod config;
mod forecast;
mod recommend;
pub mod stats;

pub use analyzer::BudgetAnalyzer;
pub use config::AnalysisConfig;
pub use stats::{CategoryStatistics, MonthlyDeviation, MonthlyTotal};
