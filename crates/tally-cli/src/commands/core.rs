//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `load_config` / `open_db` - Shared setup helpers
//! - `cmd_init` - Initialize the database
//! - `cmd_status` - Show database and model status

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::{Categorizer, Config, Database};

/// Resolve config and apply CLI overrides
pub fn load_config(config_path: Option<&Path>, db_override: Option<&Path>) -> Result<Config> {
    let mut config = Config::load(config_path).context("Failed to load config")?;
    if let Some(db) = db_override {
        config.db_path = db.to_path_buf();
    }
    Ok(config)
}

/// Open the configured database, creating its parent directory if needed
pub fn open_db(config: &Config) -> Result<Database> {
    if let Some(parent) = config.db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let path = config
        .db_path
        .to_str()
        .context("Non-UTF-8 database path")?;
    Database::open(path).context("Failed to open database")
}

pub fn cmd_init(config: &Config) -> Result<()> {
    println!("🔧 Initializing database at {}...", config.db_path.display());

    open_db(config)?;

    println!("✅ Database initialized!");
    println!();
    println!("Next steps:");
    println!("  1. Upload a statement:  tally upload --file statement.csv --user 1");
    println!("  2. List transactions:   tally transactions --user 1");
    Ok(())
}

pub fn cmd_status(config: &Config) -> Result<()> {
    let db = open_db(config)?;
    let categorizer = Categorizer::open(&config.model_path);

    println!("📊 Tally status");
    println!("   Database:     {}", config.db_path.display());
    println!("   Transactions: {}", db.transaction_count()?);
    println!("   Labeled:      {}", db.labeled_examples_all()?.len());
    println!(
        "   Model:        {}",
        if categorizer.is_ready() {
            "ready"
        } else {
            "not trained yet"
        }
    );
    println!("   Model path:   {}", config.model_path.display());
    println!(
        "   Retrain on upload: {}",
        if config.retrain_on_upload { "yes" } else { "no" }
    );
    Ok(())
}
