//! Budget recommendation database operations
//!
//! Recommendations are a per-user snapshot: `replace_recommendations`
//! deletes the existing set and inserts the new one inside a single
//! SQLite transaction, so a failure leaves the prior snapshot intact and
//! readers never observe a half-replaced state.

use rusqlite::params;
use tracing::debug;

use super::{parse_amount, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewRecommendation, Priority, Recommendation, RecommendationKind};

impl Database {
    /// Replace a user's full recommendation set atomically
    ///
    /// Returns the inserted records in insertion order.
    pub fn replace_recommendations(
        &self,
        user_id: i64,
        items: &[NewRecommendation],
    ) -> Result<Vec<Recommendation>> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM recommendations WHERE user_id = ?",
            params![user_id],
        )?;

        let mut inserted = Vec::with_capacity(items.len());
        for item in items {
            tx.execute(
                r#"
                INSERT INTO recommendations (
                    user_id, category_id, kind, priority,
                    current_amount, recommended_amount, potential_savings, reason
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
                params![
                    user_id,
                    item.category_id,
                    item.kind.as_str(),
                    item.priority.as_str(),
                    item.current_amount.to_string(),
                    item.recommended_amount.to_string(),
                    item.potential_savings().to_string(),
                    item.reason,
                ],
            )?;
            let id = tx.last_insert_rowid();

            let created_str: String = tx.query_row(
                "SELECT created_at FROM recommendations WHERE id = ?",
                params![id],
                |row| row.get(0),
            )?;

            inserted.push(Recommendation {
                id,
                user_id,
                category_id: item.category_id,
                kind: item.kind,
                priority: item.priority,
                current_amount: item.current_amount,
                recommended_amount: item.recommended_amount,
                potential_savings: item.potential_savings(),
                reason: item.reason.clone(),
                implemented: false,
                created_at: parse_datetime(&created_str),
            });
        }

        tx.commit()?;
        debug!(user_id, count = inserted.len(), "Replaced recommendation set");
        Ok(inserted)
    }

    /// List a user's recommendations, largest potential savings first
    pub fn list_recommendations(&self, user_id: i64) -> Result<Vec<Recommendation>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, category_id, kind, priority,
                   current_amount, recommended_amount, potential_savings,
                   reason, implemented, created_at
            FROM recommendations
            WHERE user_id = ?
            ORDER BY CAST(potential_savings AS REAL) DESC, id
            "#,
        )?;
        let rows = stmt.query_map(params![user_id], row_to_recommendation)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Mark a recommendation as implemented (or not)
    pub fn set_recommendation_implemented(&self, id: i64, implemented: bool) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE recommendations SET implemented = ? WHERE id = ?",
            params![implemented, id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("recommendation {}", id)));
        }
        Ok(())
    }
}

fn row_to_recommendation(row: &rusqlite::Row) -> rusqlite::Result<Recommendation> {
    let kind_str: String = row.get(3)?;
    let priority_str: String = row.get(4)?;
    let current_str: String = row.get(5)?;
    let recommended_str: String = row.get(6)?;
    let savings_str: String = row.get(7)?;
    let created_str: String = row.get(10)?;

    Ok(Recommendation {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category_id: row.get(2)?,
        kind: kind_str.parse().unwrap_or(RecommendationKind::Maintain),
        priority: priority_str.parse().unwrap_or(Priority::Low),
        current_amount: parse_amount(5, &current_str)?,
        recommended_amount: parse_amount(6, &recommended_str)?,
        potential_savings: parse_amount(7, &savings_str)?,
        reason: row.get(8)?,
        implemented: row.get(9)?,
        created_at: parse_datetime(&created_str),
    })
}
