//! Transaction listing and manual entry commands

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tally_core::Config;

use super::core::open_db;
use super::truncate;

pub fn cmd_transactions(config: &Config, user: i64, limit: i64) -> Result<()> {
    let db = open_db(config)?;
    let transactions = db.list_transactions(user, limit)?;

    if transactions.is_empty() {
        println!("No transactions for user {user}.");
        return Ok(());
    }

    println!(
        "{:<6} {:<12} {:<40} {:>12}  {}",
        "ID", "Date", "Description", "Amount", "Category"
    );
    for t in &transactions {
        println!(
            "{:<6} {:<12} {:<40} {:>12.2}  {}",
            t.id,
            t.date.to_string(),
            truncate(&t.description, 40),
            t.amount,
            t.category
        );
    }
    Ok(())
}

pub fn cmd_add(
    config: &Config,
    user: i64,
    date: &str,
    description: &str,
    amount: f64,
    category: &str,
) -> Result<()> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .context("Invalid --date format (use YYYY-MM-DD)")?;

    let db = open_db(config)?;
    let tx = db.insert_manual(user, date, description, amount, category)?;

    println!(
        "✅ Added transaction {} ({}, {:.2}, {})",
        tx.id, tx.description, tx.amount, tx.category
    );
    Ok(())
}
