//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (open_db) plus init, seed, and reset
//! - `categories` - Category management commands
//! - `expenses` - Expense entry, listing, and CSV import
//! - `analyze` - Analysis run plus recommendation/projection display

pub mod analyze;
pub mod categories;
pub mod core;
pub mod expenses;

// Re-export command functions for main.rs
pub use analyze::*;
pub use categories::*;
pub use core::*;
pub use expenses::*;
