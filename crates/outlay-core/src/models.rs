//! Domain models for Outlay

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A user of the tracker
///
/// Outlay keeps a minimal owner record so every derived collection
/// (statistics, recommendations, projections) is scoped per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A spending category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Recurring fixed obligation (rent, insurance) vs discretionary
    /// variable spending. Changes classification thresholds throughout
    /// the analysis engine.
    pub is_fixed: bool,
    pub created_at: DateTime<Utc>,
}

/// A categorized spending transaction
///
/// Immutable input to the analysis engine: amounts are non-negative
/// decimals, never floats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A new expense to be recorded (before DB insertion)
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub category_id: i64,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: Option<String>,
}

/// Kind of budget recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    /// Reduce spending in this category
    Reduce,
    /// Keep spending at its current level
    Maintain,
    /// Shift budget between categories
    Reallocate,
    /// Consistent spending with room to save
    Save,
}

impl RecommendationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reduce => "reduce",
            Self::Maintain => "maintain",
            Self::Reallocate => "reallocate",
            Self::Save => "save",
        }
    }
}

impl std::str::FromStr for RecommendationKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reduce" => Ok(Self::Reduce),
            "maintain" => Ok(Self::Maintain),
            "reallocate" => Ok(Self::Reallocate),
            "save" => Ok(Self::Save),
            _ => Err(format!("Unknown recommendation kind: {}", s)),
        }
    }
}

impl std::fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recommendation priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted budget recommendation
///
/// Recommendations are a point-in-time snapshot: each analysis run
/// replaces the user's full set rather than updating records in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub kind: RecommendationKind,
    pub priority: Priority,
    pub current_amount: Decimal,
    pub recommended_amount: Decimal,
    pub potential_savings: Decimal,
    pub reason: String,
    /// Set externally when the user acts on the recommendation.
    /// Reset by the next analysis run.
    pub implemented: bool,
    pub created_at: DateTime<Utc>,
}

/// A recommendation produced by the analysis engine (before persistence)
#[derive(Debug, Clone)]
pub struct NewRecommendation {
    pub category_id: i64,
    pub kind: RecommendationKind,
    pub priority: Priority,
    pub current_amount: Decimal,
    pub recommended_amount: Decimal,
    pub reason: String,
}

impl NewRecommendation {
    /// Savings implied by following the recommendation
    pub fn potential_savings(&self) -> Decimal {
        self.current_amount - self.recommended_amount
    }
}

/// A persisted expense projection for a future calendar period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projection {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub predicted_amount: Decimal,
    /// Target month (1-12), strictly after the analysis period
    pub month: u32,
    pub year: i32,
    /// Blended forecast trustworthiness in [0, 100]
    pub confidence_score: Decimal,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A projection produced by the forecaster (before persistence)
#[derive(Debug, Clone)]
pub struct NewProjection {
    pub category_id: i64,
    pub predicted_amount: Decimal,
    pub month: u32,
    pub year: i32,
    pub confidence_score: Decimal,
    pub note: Option<String>,
}

/// Kind of spending pattern flagged by the analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Month-to-month amounts vary widely
    HighVariability,
    /// Monthly average exceeds the high-spend threshold
    HighSpending,
}

impl PatternKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighVariability => "high_variability",
            Self::HighSpending => "high_spending",
        }
    }
}

impl std::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A flagged spending pattern (not persisted; consumed by callers)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingPattern {
    pub category_id: i64,
    pub category_name: String,
    pub kind: PatternKind,
    pub message: String,
}
