//! Expense projection database operations
//!
//! Forecast runs replace only the future-dated slice of a user's
//! projections: rows whose (year, month) lie strictly after the current
//! period are deleted and reinserted in one transaction, leaving
//! historical projections untouched.

use rusqlite::params;
use tracing::debug;

use super::{parse_amount, parse_datetime, Database};
use crate::error::Result;
use crate::models::{NewProjection, Projection};

impl Database {
    /// Replace a user's future-dated projections atomically
    ///
    /// Deletes every projection strictly after (`year`, `month`) and
    /// inserts the new set. Returns the inserted records.
    pub fn replace_future_projections(
        &self,
        user_id: i64,
        year: i32,
        month: u32,
        items: &[NewProjection],
    ) -> Result<Vec<Projection>> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            DELETE FROM projections
            WHERE user_id = ?
              AND (year > ? OR (year = ? AND month > ?))
            "#,
            params![user_id, year, year, month],
        )?;

        let mut inserted = Vec::with_capacity(items.len());
        for item in items {
            tx.execute(
                r#"
                INSERT INTO projections (
                    user_id, category_id, predicted_amount, month, year,
                    confidence_score, note
                ) VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
                params![
                    user_id,
                    item.category_id,
                    item.predicted_amount.to_string(),
                    item.month,
                    item.year,
                    item.confidence_score.to_string(),
                    item.note,
                ],
            )?;
            let id = tx.last_insert_rowid();

            let created_str: String = tx.query_row(
                "SELECT created_at FROM projections WHERE id = ?",
                params![id],
                |row| row.get(0),
            )?;

            inserted.push(Projection {
                id,
                user_id,
                category_id: item.category_id,
                predicted_amount: item.predicted_amount,
                month: item.month,
                year: item.year,
                confidence_score: item.confidence_score,
                note: item.note.clone(),
                created_at: parse_datetime(&created_str),
            });
        }

        tx.commit()?;
        debug!(user_id, count = inserted.len(), "Replaced future projections");
        Ok(inserted)
    }

    /// List a user's projections in chronological order
    pub fn list_projections(&self, user_id: i64) -> Result<Vec<Projection>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, category_id, predicted_amount, month, year,
                   confidence_score, note, created_at
            FROM projections
            WHERE user_id = ?
            ORDER BY year, month, category_id
            "#,
        )?;
        let rows = stmt.query_map(params![user_id], row_to_projection)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

fn row_to_projection(row: &rusqlite::Row) -> rusqlite::Result<Projection> {
    let amount_str: String = row.get(3)?;
    let confidence_str: String = row.get(6)?;
    let created_str: String = row.get(8)?;

    Ok(Projection {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category_id: row.get(2)?,
        predicted_amount: parse_amount(3, &amount_str)?,
        month: row.get(4)?,
        year: row.get(5)?,
        confidence_score: parse_amount(6, &confidence_str)?,
        note: row.get(7)?,
        created_at: parse_datetime(&created_str),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn setup() -> (Database, i64, i64) {
        let db = Database::in_memory().unwrap();
        let user = db.upsert_user("alice").unwrap();
        let cat = db.upsert_category(user, "Groceries", None, false).unwrap();
        (db, user, cat)
    }

    fn proj(category_id: i64, year: i32, month: u32, amount: &str) -> NewProjection {
        NewProjection {
            category_id,
            predicted_amount: amount.parse().unwrap(),
            month,
            year,
            confidence_score: dec!(75),
            note: None,
        }
    }

    #[test]
    fn test_replace_deletes_only_future_rows() {
        let (db, user, cat) = setup();

        // Seed one past, one current, and one future projection
        db.replace_future_projections(
            user,
            2024,
            0,
            &[
                proj(cat, 2024, 2, "100"),
                proj(cat, 2024, 3, "110"),
                proj(cat, 2024, 4, "120"),
            ],
        )
        .unwrap();

        // Replace from the March 2024 vantage point
        db.replace_future_projections(user, 2024, 3, &[proj(cat, 2024, 4, "999")])
            .unwrap();

        let listed = db.list_projections(user).unwrap();
        assert_eq!(listed.len(), 3);
        // Feb and Mar survive, Apr was replaced
        assert_eq!(listed[0].predicted_amount, dec!(100));
        assert_eq!(listed[1].predicted_amount, dec!(110));
        assert_eq!(listed[2].predicted_amount, dec!(999));
    }

    #[test]
    fn test_replace_spans_year_boundary() {
        let (db, user, cat) = setup();

        db.replace_future_projections(
            user,
            2024,
            0,
            &[proj(cat, 2024, 12, "100"), proj(cat, 2025, 1, "200")],
        )
        .unwrap();

        // From November 2024, both December 2024 and January 2025 are future
        db.replace_future_projections(user, 2024, 11, &[]).unwrap();
        assert!(db.list_projections(user).unwrap().is_empty());
    }

    #[test]
    fn test_projection_round_trip() {
        let (db, user, cat) = setup();

        let inserted = db
            .replace_future_projections(
                user,
                2024,
                3,
                &[NewProjection {
                    category_id: cat,
                    predicted_amount: dec!(12240.00),
                    month: 4,
                    year: 2024,
                    confidence_score: dec!(91.67),
                    note: Some("Based on limited data.".to_string()),
                }],
            )
            .unwrap();
        assert_eq!(inserted.len(), 1);

        let listed = db.list_projections(user).unwrap();
        assert_eq!(listed[0].predicted_amount, dec!(12240.00));
        assert_eq!(listed[0].confidence_score, dec!(91.67));
        assert_eq!(listed[0].note.as_deref(), Some("Based on limited data."));
    }
}
