//! Spending category database operations

use rusqlite::params;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::Category;

impl Database {
    /// Create a category for a user, or return the existing id on a name match
    pub fn upsert_category(
        &self,
        user_id: i64,
        name: &str,
        description: Option<&str>,
        is_fixed: bool,
    ) -> Result<i64> {
        let conn = self.conn()?;

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM categories WHERE user_id = ? AND name = ?",
                params![user_id, name],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;

        if let Some(id) = existing {
            return Ok(id);
        }

        conn.execute(
            "INSERT INTO categories (user_id, name, description, is_fixed) VALUES (?, ?, ?, ?)",
            params![user_id, name, description, is_fixed],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List a user's categories ordered by name
    pub fn list_categories(&self, user_id: i64) -> Result<Vec<Category>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, name, description, is_fixed, created_at
            FROM categories
            WHERE user_id = ?
            ORDER BY name
            "#,
        )?;
        let rows = stmt.query_map(params![user_id], row_to_category)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Get a single category by id
    pub fn get_category(&self, id: i64) -> Result<Category> {
        let conn = self.conn()?;
        conn.query_row(
            r#"
            SELECT id, user_id, name, description, is_fixed, created_at
            FROM categories
            WHERE id = ?
            "#,
            params![id],
            row_to_category,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                Error::NotFound(format!("category {}", id))
            }
            other => other.into(),
        })
    }

    /// Look up a user's category by name
    pub fn find_category(&self, user_id: i64, name: &str) -> Result<Option<Category>> {
        let conn = self.conn()?;
        let result = conn.query_row(
            r#"
            SELECT id, user_id, name, description, is_fixed, created_at
            FROM categories
            WHERE user_id = ? AND name = ?
            "#,
            params![user_id, name],
            row_to_category,
        );

        match result {
            Ok(cat) => Ok(Some(cat)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn row_to_category(row: &rusqlite::Row) -> rusqlite::Result<Category> {
    let created_str: String = row.get(5)?;
    Ok(Category {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        is_fixed: row.get(4)?,
        created_at: parse_datetime(&created_str),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_category_dedupes_by_name() {
        let db = Database::in_memory().unwrap();
        let user = db.upsert_user("alice").unwrap();

        let id1 = db.upsert_category(user, "Rent", None, true).unwrap();
        let id2 = db.upsert_category(user, "Rent", None, true).unwrap();
        assert_eq!(id1, id2);

        // Same name under a different user is a distinct category
        let other = db.upsert_user("bob").unwrap();
        let id3 = db.upsert_category(other, "Rent", None, true).unwrap();
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_list_and_find_categories() {
        let db = Database::in_memory().unwrap();
        let user = db.upsert_user("alice").unwrap();

        db.upsert_category(user, "Groceries", Some("weekly shop"), false)
            .unwrap();
        db.upsert_category(user, "Rent", None, true).unwrap();

        let cats = db.list_categories(user).unwrap();
        assert_eq!(cats.len(), 2);
        assert_eq!(cats[0].name, "Groceries");
        assert!(!cats[0].is_fixed);
        assert!(cats[1].is_fixed);

        let rent = db.find_category(user, "Rent").unwrap().unwrap();
        assert!(rent.is_fixed);
        assert!(db.find_category(user, "Travel").unwrap().is_none());
    }

    #[test]
    fn test_get_category_not_found() {
        let db = Database::in_memory().unwrap();
        let err = db.get_category(999).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
