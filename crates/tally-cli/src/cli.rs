//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - import and categorize bank statements
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Bank statement importer with learned categorization", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file path (defaults to ~/.config/tally/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database path (overrides the config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Upload a statement file (whole-batch: any bad row rejects the upload)
    Upload {
        /// Statement file to upload (.csv)
        #[arg(short, long)]
        file: PathBuf,

        /// Owner user id
        #[arg(short, long)]
        user: i64,

        /// Skip retraining the category model after this upload
        #[arg(long)]
        no_train: bool,
    },

    /// List a user's transactions, newest first
    Transactions {
        /// Owner user id
        #[arg(short, long)]
        user: i64,

        /// Maximum rows to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Manually add a labeled transaction
    Add {
        /// Owner user id
        #[arg(short, long)]
        user: i64,

        /// Date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        /// Transaction description
        #[arg(long)]
        description: String,

        /// Signed amount: negative = outflow (must be non-zero)
        #[arg(short, long, allow_hyphen_values = true)]
        amount: f64,

        /// Category label
        #[arg(short, long)]
        category: String,
    },

    /// Retrain the category model from all labeled transactions
    Train,

    /// Predict a category for a description/amount pair
    Predict {
        /// Transaction description
        description: String,

        /// Signed amount
        #[arg(allow_hyphen_values = true)]
        amount: f64,
    },

    /// Show database and model status
    Status,
}
