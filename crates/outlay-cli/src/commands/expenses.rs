//! Expense entry, listing, and CSV import

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use outlay_core::{Database, NewExpense};
use rust_decimal::Decimal;

pub fn cmd_expense_add(
    db: &Database,
    user_id: i64,
    category: &str,
    amount: &str,
    date: Option<&str>,
    description: Option<&str>,
) -> Result<()> {
    let category = db
        .find_category(user_id, category)?
        .with_context(|| format!("Unknown category '{}'. Add it first with 'outlay category add'.", category))?;

    let amount: Decimal = amount
        .parse()
        .with_context(|| format!("Invalid amount '{}'", amount))?;
    let date = parse_date_or_today(date)?;

    let id = db.insert_expense(
        user_id,
        &NewExpense {
            category_id: category.id,
            amount,
            date,
            description: description.map(|d| d.to_string()),
        },
    )?;
    println!("Recorded expense {} ({} on {}) in {}.", id, amount, date, category.name);
    Ok(())
}

pub fn cmd_expense_list(db: &Database, user_id: i64, limit: usize) -> Result<()> {
    let expenses = db.list_recent_expenses(user_id, limit)?;
    if expenses.is_empty() {
        println!("No expenses recorded yet.");
        return Ok(());
    }

    // Map category ids to names once rather than per row
    let categories = db.list_categories(user_id)?;
    let name_of = |id: i64| -> &str {
        categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
            .unwrap_or("?")
    };

    println!(
        "{:<6} {:<12} {:<20} {:>12}  DESCRIPTION",
        "ID", "DATE", "CATEGORY", "AMOUNT"
    );
    for expense in &expenses {
        println!(
            "{:<6} {:<12} {:<20} {:>12}  {}",
            expense.id,
            expense.date,
            name_of(expense.category_id),
            expense.amount,
            expense.description.as_deref().unwrap_or("-")
        );
    }
    println!();
    println!(
        "Showing {} of {} expenses.",
        expenses.len(),
        db.count_expenses(user_id)?
    );
    Ok(())
}

/// Import expenses from a CSV file with a `date,category,amount,description`
/// header. Categories are created on demand as variable categories; rows
/// fail the whole import rather than being skipped silently.
pub fn cmd_import(db: &Database, user_id: i64, file: &Path) -> Result<()> {
    let mut reader = csv::Reader::from_path(file)
        .with_context(|| format!("Failed to open {}", file.display()))?;

    let headers = reader.headers().context("Failed to read CSV header")?;
    let date_idx = column_index(headers, "date")?;
    let category_idx = column_index(headers, "category")?;
    let amount_idx = column_index(headers, "amount")?;
    let description_idx = headers.iter().position(|h| h.trim() == "description");

    let mut imported = 0;
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV row {}", line + 2))?;

        let date = NaiveDate::parse_from_str(field(&record, date_idx, line)?, "%Y-%m-%d")
            .with_context(|| format!("Invalid date on row {}", line + 2))?;
        let amount: Decimal = field(&record, amount_idx, line)?
            .parse()
            .with_context(|| format!("Invalid amount on row {}", line + 2))?;
        let category_name = field(&record, category_idx, line)?;
        if category_name.is_empty() {
            bail!("Empty category on row {}", line + 2);
        }

        let description = description_idx
            .and_then(|idx| record.get(idx))
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(|d| d.to_string());

        let category_id = db.upsert_category(user_id, category_name, None, false)?;
        db.insert_expense(
            user_id,
            &NewExpense {
                category_id,
                amount,
                date,
                description,
            },
        )?;
        imported += 1;
    }

    println!("Imported {} expenses from {}.", imported, file.display());
    Ok(())
}

fn field<'r>(record: &'r csv::StringRecord, idx: usize, line: usize) -> Result<&'r str> {
    record
        .get(idx)
        .map(str::trim)
        .with_context(|| format!("Row {} is missing a column", line + 2))
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .with_context(|| format!("CSV is missing the '{}' column", name))
}

fn parse_date_or_today(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}' (expected YYYY-MM-DD)", s)),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn test_db() -> (Database, i64) {
        let db = Database::in_memory().unwrap();
        let user_id = db.upsert_user("test").unwrap();
        (db, user_id)
    }

    #[test]
    fn test_import_creates_categories_and_expenses() {
        let (db, user_id) = test_db();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expenses.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "date,category,amount,description").unwrap();
        writeln!(file, "2024-03-01,Groceries,1250.50,weekly shop").unwrap();
        writeln!(file, "2024-03-05,Groceries,980.00,").unwrap();
        writeln!(file, "2024-03-07,Transport,150,bus pass").unwrap();
        drop(file);

        cmd_import(&db, user_id, &path).unwrap();

        assert_eq!(db.count_expenses(user_id).unwrap(), 3);
        let categories = db.list_categories(user_id).unwrap();
        assert_eq!(categories.len(), 2);

        let expenses = db.list_recent_expenses(user_id, 10).unwrap();
        assert_eq!(expenses.len(), 3);
        assert!(expenses.iter().any(|e| e.description.as_deref() == Some("weekly shop")));
        // Empty description column imports as None
        assert!(expenses.iter().any(|e| e.description.is_none()));
    }

    #[test]
    fn test_import_rejects_bad_amount() {
        let (db, user_id) = test_db();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "date,category,amount,description").unwrap();
        writeln!(file, "2024-03-01,Groceries,not-a-number,").unwrap();
        drop(file);

        assert!(cmd_import(&db, user_id, &path).is_err());
    }

    #[test]
    fn test_import_requires_header_columns() {
        let (db, user_id) = test_db();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("headers.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "when,what,how_much").unwrap();
        writeln!(file, "2024-03-01,Groceries,100").unwrap();
        drop(file);

        assert!(cmd_import(&db, user_id, &path).is_err());
    }
}
