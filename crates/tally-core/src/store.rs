//! Persistence contract consumed by the ingestion pipeline

use crate::error::Result;
use crate::models::{NewTransaction, TrainingExample, Transaction};

/// What the pipeline needs from storage: append a fully parsed batch and
/// read back the labeled corpus for retraining. The rusqlite-backed
/// [`Database`](crate::db::Database) is the production implementation.
pub trait TransactionStore {
    /// Persist a parsed batch for one user and return the materialized
    /// records. Implementations must be atomic: either every row lands or
    /// none do — the pipeline's no-partial-batch guarantee depends on it.
    fn append_batch(&self, user_id: i64, rows: &[NewTransaction]) -> Result<Vec<Transaction>>;

    /// Every persisted transaction carrying a non-empty category, across all
    /// users. This is the retrain corpus; the fallback label counts as a
    /// category here once it has been persisted.
    fn labeled_examples(&self) -> Result<Vec<TrainingExample>>;
}
