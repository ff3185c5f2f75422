//! Tally Core Library
//!
//! Shared functionality for the Tally statement importer:
//! - Delimiter sniffing and row parsing for loosely-formatted statements
//! - The fail-fast statement ingestion pipeline
//! - A trainable transaction categorizer with atomically swapped model state
//! - rusqlite-backed transaction storage
//! - TOML configuration

pub mod categorize;
pub mod classifier;
pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod models;
pub mod row;
pub mod sniff;
pub mod store;

pub use categorize::{Categorizer, TrainOutcome, FALLBACK_CATEGORY};
pub use classifier::{Classifier, NaiveBayes};
pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use ingest::{IngestionPipeline, UPLOAD_MESSAGE};
pub use models::{NewTransaction, TrainingExample, Transaction, UploadOutcome};
pub use row::{parse_row, ParsedRow, RowError};
pub use store::TransactionStore;
