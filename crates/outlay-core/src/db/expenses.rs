//! Expense record database operations

use chrono::NaiveDate;
use rusqlite::params;

use super::{parse_amount, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Expense, NewExpense};

impl Database {
    /// Insert a single expense for a user
    pub fn insert_expense(&self, user_id: i64, expense: &NewExpense) -> Result<i64> {
        if expense.amount.is_sign_negative() {
            return Err(Error::InvalidData(format!(
                "expense amount must be non-negative, got {}",
                expense.amount
            )));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO expenses (user_id, category_id, amount, date, description)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                expense.category_id,
                expense.amount.to_string(),
                expense.date.format("%Y-%m-%d").to_string(),
                expense.description,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List a user's expenses within an inclusive date range, oldest first
    ///
    /// This is the query the analysis engine consumes: every expense for
    /// the user across all categories, filtered to the analysis window.
    pub fn list_expenses_in_range(
        &self,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, category_id, amount, date, description, created_at
            FROM expenses
            WHERE user_id = ? AND date >= ? AND date <= ?
            ORDER BY date, id
            "#,
        )?;
        let rows = stmt.query_map(
            params![
                user_id,
                start.format("%Y-%m-%d").to_string(),
                end.format("%Y-%m-%d").to_string()
            ],
            row_to_expense,
        )?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// List a user's most recent expenses
    pub fn list_recent_expenses(&self, user_id: i64, limit: usize) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, category_id, amount, date, description, created_at
            FROM expenses
            WHERE user_id = ?
            ORDER BY date DESC, id DESC
            LIMIT ?
            "#,
        )?;
        let rows = stmt.query_map(params![user_id, limit as i64], row_to_expense)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Count a user's expenses
    pub fn count_expenses(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM expenses WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn row_to_expense(row: &rusqlite::Row) -> rusqlite::Result<Expense> {
    let amount_str: String = row.get(3)?;
    let date_str: String = row.get(4)?;
    let created_str: String = row.get(6)?;

    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Expense {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category_id: row.get(2)?,
        amount: parse_amount(3, &amount_str)?,
        date,
        description: row.get(5)?,
        created_at: parse_datetime(&created_str),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_insert_and_range_query() {
        let db = Database::in_memory().unwrap();
        let user = db.upsert_user("alice").unwrap();
        let cat = db.upsert_category(user, "Groceries", None, false).unwrap();

        for (day, amount) in [(5, dec!(1200.50)), (12, dec!(830)), (28, dec!(999.99))] {
            db.insert_expense(
                user,
                &NewExpense {
                    category_id: cat,
                    amount,
                    date: date(2024, 3, day),
                    description: None,
                },
            )
            .unwrap();
        }

        let all = db
            .list_expenses_in_range(user, date(2024, 3, 1), date(2024, 3, 31))
            .unwrap();
        assert_eq!(all.len(), 3);
        // Oldest first, amounts survive the TEXT round trip exactly
        assert_eq!(all[0].amount, dec!(1200.50));
        assert_eq!(all[2].amount, dec!(999.99));

        let partial = db
            .list_expenses_in_range(user, date(2024, 3, 10), date(2024, 3, 20))
            .unwrap();
        assert_eq!(partial.len(), 1);
        assert_eq!(partial[0].amount, dec!(830));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let db = Database::in_memory().unwrap();
        let user = db.upsert_user("alice").unwrap();
        let cat = db.upsert_category(user, "Groceries", None, false).unwrap();

        let err = db
            .insert_expense(
                user,
                &NewExpense {
                    category_id: cat,
                    amount: dec!(-5),
                    date: date(2024, 3, 1),
                    description: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[test]
    fn test_range_query_scoped_per_user() {
        let db = Database::in_memory().unwrap();
        let alice = db.upsert_user("alice").unwrap();
        let bob = db.upsert_user("bob").unwrap();
        let cat = db.upsert_category(alice, "Groceries", None, false).unwrap();

        db.insert_expense(
            alice,
            &NewExpense {
                category_id: cat,
                amount: dec!(100),
                date: date(2024, 1, 1),
                description: None,
            },
        )
        .unwrap();

        assert!(db
            .list_expenses_in_range(bob, date(2024, 1, 1), date(2024, 12, 31))
            .unwrap()
            .is_empty());
        assert_eq!(db.count_expenses(alice).unwrap(), 1);
    }
}
