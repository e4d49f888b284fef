//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` / `open_db_for_user` - Shared database helpers
//! - `cmd_init` - Initialize the database
//! - `cmd_seed` - Load deterministic demo data
//! - `cmd_reset` - Delete all stored data

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use outlay_core::{Database, NewExpense};
use rust_decimal::Decimal;

/// Open (and migrate) the database
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

/// Open the database and resolve the named user, creating it if missing
pub fn open_db_for_user(db_path: &Path, user: &str) -> Result<(Database, i64)> {
    let db = open_db(db_path)?;
    let user_id = db.upsert_user(user).context("Failed to resolve user")?;
    Ok((db, user_id))
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("Initializing database at {}...", db_path.display());
    open_db(db_path)?;
    println!("Database initialized.");
    println!();
    println!("Next steps:");
    println!("  1. Add categories:  outlay category add Rent --fixed");
    println!("  2. Record expenses: outlay expense add -c Rent -a 20000");
    println!("  3. Run analysis:    outlay analyze");
    Ok(())
}

/// Demo categories with six months of amounts, oldest first
///
/// Amounts are fixed rather than random so the resulting analysis is
/// reproducible: Rent drifts in the latest month, Groceries runs high,
/// Transport is steady, Entertainment swings.
const DEMO_DATA: &[(&str, bool, [&str; 6])] = &[
    (
        "Rent",
        true,
        ["20000", "20000", "20000", "20000", "20000", "24000"],
    ),
    (
        "Utilities",
        true,
        ["3500", "3400", "3600", "3500", "3550", "3450"],
    ),
    (
        "Groceries",
        false,
        ["11500", "12000", "12500", "11800", "12200", "12000"],
    ),
    (
        "Entertainment",
        false,
        ["2000", "5500", "1200", "3800", "900", "4200"],
    ),
    (
        "Transport",
        false,
        ["1500", "1550", "1480", "1520", "1490", "1510"],
    ),
];

pub fn cmd_seed(db_path: &Path, user: &str) -> Result<()> {
    let (db, user_id) = open_db_for_user(db_path, user)?;
    let today = chrono::Local::now().date_naive();

    let mut inserted = 0;
    for (name, is_fixed, amounts) in DEMO_DATA {
        let category_id = db
            .upsert_category(user_id, name, None, *is_fixed)
            .with_context(|| format!("Failed to create category {}", name))?;

        for (months_back, amount) in amounts.iter().rev().enumerate() {
            let (year, month) = shift_month(today, months_back as i32);
            let amount: Decimal = amount.parse().context("Invalid demo amount")?;
            db.insert_expense(
                user_id,
                &NewExpense {
                    category_id,
                    amount,
                    date: NaiveDate::from_ymd_opt(year, month, 5)
                        .context("Invalid demo date")?,
                    description: Some("demo".to_string()),
                },
            )?;
            inserted += 1;
        }
    }

    println!(
        "Seeded {} categories and {} expenses for user '{}'.",
        DEMO_DATA.len(),
        inserted,
        user
    );
    println!("Run 'outlay analyze' to see the engine output.");
    Ok(())
}

/// Delete all stored data after an interactive confirmation
pub fn cmd_reset(db_path: &Path, force: bool) -> Result<()> {
    let db = open_db(db_path)?;

    if !force {
        print!("Delete all data in {}? [y/N] ", db.path());
        io::stdout().flush()?;
        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        if !answer.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    db.reset()?;
    println!("Cleared all data in {}.", db.path());
    Ok(())
}

/// The (year, month) `back` months before the given date
fn shift_month(date: NaiveDate, back: i32) -> (i32, u32) {
    let index = date.year() * 12 + date.month0() as i32 - back;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}
