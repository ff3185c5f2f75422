//! Tally CLI - bank statement importer with learned categorization
//!
//! Usage:
//!   tally init                               Initialize the database
//!   tally upload --file stmt.csv --user 1    Upload and categorize a statement
//!   tally transactions --user 1              List a user's transactions
//!   tally train                              Retrain the category model
//!   tally predict "Coffee Shop" -- -5.50     Predict a category

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref(), cli.db.as_deref())?;
    tracing::debug!(db = %config.db_path.display(), "Resolved configuration");

    match cli.command {
        Commands::Init => commands::cmd_init(&config),
        Commands::Upload {
            file,
            user,
            no_train,
        } => commands::cmd_upload(&config, &file, user, no_train),
        Commands::Transactions { user, limit } => commands::cmd_transactions(&config, user, limit),
        Commands::Add {
            user,
            date,
            description,
            amount,
            category,
        } => commands::cmd_add(&config, user, &date, &description, amount, &category),
        Commands::Train => commands::cmd_train(&config),
        Commands::Predict {
            description,
            amount,
        } => commands::cmd_predict(&config, &description, amount),
        Commands::Status => commands::cmd_status(&config),
    }
}
