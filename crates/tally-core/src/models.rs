//! Domain models for Tally

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A transaction parsed from a statement row, not yet persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub description: String,
    /// Negative = outflow, positive = inflow. Statement rows may be zero;
    /// only manually entered transactions carry a non-zero constraint.
    pub amount: f64,
    /// Assigned by the categorizer before persistence
    pub category: String,
}

/// A persisted transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    /// Opaque owner identifier supplied by the authentication layer
    pub user_id: i64,
    pub date: NaiveDate,
    pub description: String,
    /// Negative = outflow, positive = inflow
    pub amount: f64,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// The subset of a persisted transaction the classifier trains on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub description: String,
    pub amount: f64,
    pub category: String,
}

impl TrainingExample {
    pub fn new(description: impl Into<String>, amount: f64, category: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            amount,
            category: category.into(),
        }
    }
}

/// Result of a successful statement upload
#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    /// Number of transactions ingested
    pub count: usize,
    /// The fully materialized records, in statement order
    pub transactions: Vec<Transaction>,
}
