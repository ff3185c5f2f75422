//! Statement ingestion pipeline
//!
//! Drives the row parser over an uploaded statement, categorizes each row,
//! and hands the whole batch to the store in one call. Any row failure
//! rejects the entire upload with the offending row's number; nothing
//! partial ever reaches storage.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::categorize::Categorizer;
use crate::error::{Error, Result};
use crate::models::{NewTransaction, UploadOutcome};
use crate::row;
use crate::store::TransactionStore;

/// Success message for an accepted upload
pub const UPLOAD_MESSAGE: &str = "Statement uploaded";

pub struct IngestionPipeline<S> {
    store: S,
    categorizer: Arc<Categorizer>,
    retrain_on_upload: bool,
}

impl<S: TransactionStore> IngestionPipeline<S> {
    pub fn new(store: S, categorizer: Arc<Categorizer>) -> Self {
        Self {
            store,
            categorizer,
            retrain_on_upload: true,
        }
    }

    /// Disable or re-enable the post-upload retrain (for large ledgers that
    /// retrain on their own cadence via an explicit train call instead)
    pub fn with_retrain(mut self, enabled: bool) -> Self {
        self.retrain_on_upload = enabled;
        self
    }

    /// Ingest one uploaded statement for `user_id`.
    ///
    /// Lines are split on any carriage-return/line-feed boundary, dropping
    /// fully empty lines. The first remaining line is always treated as a
    /// header and skipped — there is no header-sniffing heuristic. Row
    /// numbers in errors count the header as row 1, so the first data row
    /// reports as row 2.
    pub fn upload(&self, raw_text: &str, user_id: i64) -> Result<UploadOutcome> {
        let lines: Vec<&str> = raw_text
            .split(['\r', '\n'])
            .filter(|line| !line.is_empty())
            .collect();

        if lines.len() <= 1 {
            return Err(Error::EmptyFile);
        }

        let mut rows = Vec::with_capacity(lines.len() - 1);
        for (index, line) in lines.iter().enumerate().skip(1) {
            if line.trim().is_empty() {
                // Whitespace-only rows are dropped, but still occupy a row
                // number like every other line
                continue;
            }

            let parsed = row::parse_row(line).map_err(|source| Error::Row {
                row: index + 1,
                source,
            })?;

            let category = self.categorizer.predict(&parsed.description, parsed.amount);
            rows.push(NewTransaction {
                date: parsed.date,
                description: parsed.description,
                amount: parsed.amount,
                category,
            });
        }

        if rows.is_empty() {
            return Err(Error::NoParsedRows);
        }

        let transactions = self.store.append_batch(user_id, &rows)?;
        info!(user_id, count = transactions.len(), "Statement ingested");

        if self.retrain_on_upload {
            self.retrain();
        }

        Ok(UploadOutcome {
            count: transactions.len(),
            transactions,
        })
    }

    /// Refresh the category model from the full labeled corpus.
    ///
    /// Best-effort: an upload that already persisted never fails because
    /// retraining did. Failures are logged and swallowed.
    pub fn retrain(&self) {
        let outcome = self
            .store
            .labeled_examples()
            .and_then(|examples| self.categorizer.train(&examples));
        match outcome {
            Ok(outcome) => debug!(?outcome, "Retraining finished"),
            Err(e) => warn!("Retraining after upload failed: {e}"),
        }
    }

    pub fn categorizer(&self) -> &Categorizer {
        &self.categorizer
    }
}
