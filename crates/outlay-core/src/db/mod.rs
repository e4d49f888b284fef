//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `categories` - Spending category operations
//! - `expenses` - Expense record operations
//! - `recommendations` - Budget recommendation replace-set and queries
//! - `projections` - Expense projection replace-set and queries

use std::str::FromStr;

use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use rust_decimal::Decimal;
use tracing::info;

use crate::error::Result;
use crate::models::User;

mod categories;
mod expenses;
mod projections;
mod recommendations;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Parse a SQLite datetime string into a DateTime<Utc>
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    // SQLite stores as "YYYY-MM-DD HH:MM:SS" format
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

/// Parse a stored decimal amount from a TEXT column
///
/// Amounts are stored as decimal strings, not REAL, so values survive
/// round trips exactly and repeated analysis runs stay byte-identical.
pub(crate) fn parse_amount(idx: usize, s: &str) -> rusqlite::Result<Decimal> {
    Decimal::from_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Create a new database connection pool
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create an in-memory database (for testing)
    ///
    /// Note: Uses a temporary file rather than `:memory:` because each
    /// pooled connection would otherwise see its own empty database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = format!(
            "{}/outlay_test_{}_{}.db",
            std::env::temp_dir().display(),
            std::process::id(),
            id
        );

        // Remove any existing file
        let _ = std::fs::remove_file(&path);

        Self::new(&path)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Look up a user by name, creating the record if missing
    pub fn upsert_user(&self, name: &str) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO users (name) VALUES (?)",
            params![name],
        )?;
        let id: i64 = conn.query_row(
            "SELECT id FROM users WHERE name = ?",
            params![name],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// List all users
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name, created_at FROM users ORDER BY name")?;
        let rows = stmt.query_map([], |row| {
            let created_str: String = row.get(2)?;
            Ok(User {
                id: row.get(0)?,
                name: row.get(1)?,
                created_at: parse_datetime(&created_str),
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Clear all data (for testing/reset)
    pub fn reset(&self) -> Result<()> {
        let conn = self.conn()?;

        // Delete in order respecting foreign key constraints
        conn.execute_batch(
            r#"
            DELETE FROM projections;
            DELETE FROM recommendations;
            DELETE FROM expenses;
            DELETE FROM categories;
            DELETE FROM users;
            "#,
        )?;

        info!("Database reset complete");
        Ok(())
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- Enable foreign keys
            PRAGMA foreign_keys = ON;

            -- WAL mode: better concurrency, readers don't block writers
            PRAGMA journal_mode = WAL;

            -- Synchronous NORMAL: good balance of safety and performance
            PRAGMA synchronous = NORMAL;

            -- Users (owners of all derived collections)
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Spending categories
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                description TEXT,
                is_fixed BOOLEAN NOT NULL DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                UNIQUE(user_id, name)
            );

            CREATE INDEX IF NOT EXISTS idx_categories_user ON categories(user_id);

            -- Expenses (immutable inputs to the analysis engine)
            -- Amounts are stored as decimal strings, never REAL.
            CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
                amount TEXT NOT NULL,
                date DATE NOT NULL,
                description TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_expenses_user_date ON expenses(user_id, date);
            CREATE INDEX IF NOT EXISTS idx_expenses_category ON expenses(category_id);

            -- Budget recommendations (replaced wholesale on every analysis run)
            CREATE TABLE IF NOT EXISTS recommendations (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
                kind TEXT NOT NULL,
                priority TEXT NOT NULL,
                current_amount TEXT NOT NULL,
                recommended_amount TEXT NOT NULL,
                potential_savings TEXT NOT NULL,
                reason TEXT NOT NULL,
                implemented BOOLEAN NOT NULL DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_recommendations_user ON recommendations(user_id);

            -- Expense projections (future-dated rows replaced on every forecast run)
            CREATE TABLE IF NOT EXISTS projections (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
                predicted_amount TEXT NOT NULL,
                month INTEGER NOT NULL,
                year INTEGER NOT NULL,
                confidence_score TEXT NOT NULL,
                note TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_projections_user_period
                ON projections(user_id, year, month);
            "#,
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_user_is_idempotent() {
        let db = Database::in_memory().unwrap();

        let id1 = db.upsert_user("alice").unwrap();
        let id2 = db.upsert_user("alice").unwrap();
        assert_eq!(id1, id2);

        let id3 = db.upsert_user("bob").unwrap();
        assert_ne!(id1, id3);

        let users = db.list_users().unwrap();
        assert_eq!(users.len(), 2);
    }

    #[test]
    fn test_parse_amount_exact() {
        use rust_decimal_macros::dec;

        assert_eq!(parse_amount(0, "21333.33").unwrap(), dec!(21333.33));
        assert_eq!(parse_amount(0, "0.01").unwrap(), dec!(0.01));
        assert!(parse_amount(0, "not-a-number").is_err());
    }

    #[test]
    fn test_reset_clears_everything() {
        let db = Database::in_memory().unwrap();
        db.upsert_user("alice").unwrap();
        db.reset().unwrap();
        assert!(db.list_users().unwrap().is_empty());
    }
}
