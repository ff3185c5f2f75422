//! Shared, retrainable categorizer state
//!
//! One `Categorizer` is shared across concurrent uploads and predictions.
//! The live model sits behind an `RwLock<Option<Arc<_>>>`: predictions clone
//! the `Arc` under a read lock and never wait on a training run, while
//! training serializes on its own mutex and only takes the write lock for
//! the final reference swap. The persisted artifact is replaced by
//! write-to-temporary-then-rename so readers never see a partial model.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::classifier::{Classifier, NaiveBayes};
use crate::error::{Error, Result};
use crate::models::TrainingExample;

/// Reserved fallback label for rows no model can (or should) categorize
pub const FALLBACK_CATEGORY: &str = "Uncategorized";

/// What a training run did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainOutcome {
    /// A new model was fitted, persisted, and swapped in
    Trained { classes: usize, examples: usize },
    /// Nothing to train on; the previous model (if any) is untouched
    Skipped,
}

pub struct Categorizer {
    model: RwLock<Option<Arc<NaiveBayes>>>,
    /// Serializes fit + persist + swap across concurrent trainings
    train_guard: Mutex<()>,
    model_path: PathBuf,
}

impl Categorizer {
    /// Open the categorizer, loading a previously persisted model from
    /// `path` when one exists. A missing artifact is the normal first-run
    /// state, not an error; an unreadable one is logged and ignored.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let model_path = path.into();
        let model = match load_model(&model_path) {
            Ok(Some(model)) => {
                info!(
                    classes = model.class_count(),
                    path = %model_path.display(),
                    "Loaded category model"
                );
                Some(Arc::new(model))
            }
            Ok(None) => {
                debug!(path = %model_path.display(), "No category model yet");
                None
            }
            Err(e) => {
                warn!(
                    path = %model_path.display(),
                    "Ignoring unreadable category model: {e}"
                );
                None
            }
        };

        Self {
            model: RwLock::new(model),
            train_guard: Mutex::new(()),
            model_path,
        }
    }

    /// Whether a trained model is currently loaded
    pub fn is_ready(&self) -> bool {
        self.model
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Predict a category for a (description, amount) pair.
    ///
    /// Returns [`FALLBACK_CATEGORY`] when no model is loaded or the model
    /// abstains. Never blocks on a training run in progress.
    pub fn predict(&self, description: &str, amount: f64) -> String {
        let model = self
            .model
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        match model {
            Some(model) => model
                .predict(description, amount)
                .unwrap_or_else(|| FALLBACK_CATEGORY.to_string()),
            None => FALLBACK_CATEGORY.to_string(),
        }
    }

    /// Retrain from the full labeled corpus and replace the live model.
    ///
    /// A no-op on an empty corpus. On any failure the previous model — in
    /// memory and on disk — remains authoritative; a ready categorizer never
    /// regresses to the untrained state.
    pub fn train(&self, examples: &[TrainingExample]) -> Result<TrainOutcome> {
        if examples.is_empty() {
            debug!("No labeled transactions, skipping training");
            return Ok(TrainOutcome::Skipped);
        }

        let _guard = self
            .train_guard
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let fitted = NaiveBayes::fit(examples)?;
        let classes = fitted.class_count();
        self.persist(&fitted)?;

        *self.model.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(fitted));

        info!(examples = examples.len(), classes, "Category model retrained");
        Ok(TrainOutcome::Trained {
            classes,
            examples: examples.len(),
        })
    }

    /// Write the artifact next to its final location, then rename over the
    /// live path so a crash mid-write never corrupts the model.
    fn persist(&self, model: &NaiveBayes) -> Result<()> {
        let dir = match self.model_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer(tmp.as_file(), model)?;
        tmp.persist(&self.model_path)
            .map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

fn load_model(path: &Path) -> Result<Option<NaiveBayes>> {
    if !path.exists() {
        return Ok(None);
    }
    let file = File::open(path)?;
    Ok(Some(serde_json::from_reader(BufReader::new(file))?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labeled() -> Vec<TrainingExample> {
        vec![
            TrainingExample::new("Coffee Shop", -5.50, "Food"),
            TrainingExample::new("Bus Fare", -2.75, "Transport"),
        ]
    }

    #[test]
    fn cold_predict_is_uncategorized() {
        let dir = tempfile::tempdir().unwrap();
        let categorizer = Categorizer::open(dir.path().join("model.json"));

        assert!(!categorizer.is_ready());
        assert_eq!(categorizer.predict("Coffee Shop", -5.50), FALLBACK_CATEGORY);
    }

    #[test]
    fn train_then_predict() {
        let dir = tempfile::tempdir().unwrap();
        let categorizer = Categorizer::open(dir.path().join("model.json"));

        let outcome = categorizer.train(&labeled()).unwrap();
        assert_eq!(
            outcome,
            TrainOutcome::Trained {
                classes: 2,
                examples: 2
            }
        );
        assert!(categorizer.is_ready());
        assert_eq!(categorizer.predict("Coffee Shop Purchase", -4.00), "Food");
    }

    #[test]
    fn empty_corpus_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let categorizer = Categorizer::open(dir.path().join("model.json"));

        assert_eq!(categorizer.train(&[]).unwrap(), TrainOutcome::Skipped);
        assert!(!categorizer.is_ready());
        assert!(!dir.path().join("model.json").exists());
    }

    #[test]
    fn model_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        let categorizer = Categorizer::open(&path);
        categorizer.train(&labeled()).unwrap();
        drop(categorizer);

        let reopened = Categorizer::open(&path);
        assert!(reopened.is_ready());
        assert_eq!(reopened.predict("Coffee Shop Purchase", -4.00), "Food");
    }

    #[test]
    fn unreadable_artifact_leaves_untrained_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "not json").unwrap();

        let categorizer = Categorizer::open(&path);
        assert!(!categorizer.is_ready());
        assert_eq!(categorizer.predict("Coffee Shop", -5.50), FALLBACK_CATEGORY);
    }

    #[test]
    fn failed_persist_keeps_previous_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        let categorizer = Categorizer::open(&path);
        categorizer.train(&labeled()).unwrap();

        // Make the rename target un-replaceable: a directory at the model path
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let result = categorizer.train(&[TrainingExample::new("Gym", -30.0, "Health")]);
        assert!(result.is_err());

        // The earlier in-memory model is still authoritative
        assert!(categorizer.is_ready());
        assert_eq!(categorizer.predict("Coffee Shop Purchase", -4.00), "Food");
    }

    #[test]
    fn failed_first_training_stays_untrained() {
        let dir = tempfile::tempdir().unwrap();
        // Parent of the model path is a file, so persist cannot create it
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();

        let categorizer = Categorizer::open(blocker.join("model.json"));
        assert!(categorizer.train(&labeled()).is_err());
        assert!(!categorizer.is_ready());
        assert_eq!(categorizer.predict("Coffee Shop", -5.50), FALLBACK_CATEGORY);
    }

    #[test]
    fn concurrent_predicts_during_training() {
        use std::sync::Arc;

        let dir = tempfile::tempdir().unwrap();
        let categorizer = Arc::new(Categorizer::open(dir.path().join("model.json")));
        categorizer.train(&labeled()).unwrap();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let shared = Arc::clone(&categorizer);
            handles.push(std::thread::spawn(move || {
                for _ in 0..50 {
                    // Always a whole model: either run's output, never a mix
                    let label = shared.predict("Coffee Shop Purchase", -4.00);
                    assert_eq!(label, "Food");
                }
            }));
        }
        for _ in 0..10 {
            categorizer.train(&labeled()).unwrap();
        }
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
