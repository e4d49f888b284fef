//! Category management commands

use anyhow::{Context, Result};
use outlay_core::Database;

pub fn cmd_category_add(
    db: &Database,
    user_id: i64,
    name: &str,
    fixed: bool,
    description: Option<&str>,
) -> Result<()> {
    let id = db
        .upsert_category(user_id, name, description, fixed)
        .with_context(|| format!("Failed to add category {}", name))?;
    let kind = if fixed { "fixed" } else { "variable" };
    println!("Category '{}' ({}) ready with id {}.", name, kind, id);
    Ok(())
}

pub fn cmd_category_list(db: &Database, user_id: i64) -> Result<()> {
    let categories = db.list_categories(user_id)?;
    if categories.is_empty() {
        println!("No categories yet. Add one with 'outlay category add <name>'.");
        return Ok(());
    }

    println!("{:<6} {:<20} {:<10} DESCRIPTION", "ID", "NAME", "TYPE");
    for category in categories {
        let kind = if category.is_fixed { "fixed" } else { "variable" };
        println!(
            "{:<6} {:<20} {:<10} {}",
            category.id,
            category.name,
            kind,
            category.description.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}
