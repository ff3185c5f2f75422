//! Multiclass transaction classifier
//!
//! Descriptions become a bag of lowercased tokens; the amount becomes a
//! min-max-normalized bucket token appended to the bag. A multinomial naive
//! Bayes model with Laplace smoothing scores the combined bag per category.
//! The [`Classifier`] trait is the seam: anything that can label a
//! (description, amount) pair can stand in for the bundled model.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::TrainingExample;

/// Number of buckets the normalized amount collapses into
const AMOUNT_BUCKETS: usize = 8;

/// Laplace smoothing constant
const SMOOTHING: f64 = 1.0;

/// Minimal capability contract for a trained category model.
///
/// `None` means the model abstains; callers decide the fallback label.
pub trait Classifier: Send + Sync {
    fn predict(&self, description: &str, amount: f64) -> Option<String>;
}

/// Per-category token statistics, precomputed at fit time
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ClassWeights {
    label: String,
    log_prior: f64,
    token_log_likelihood: HashMap<String, f64>,
    /// Log-likelihood assigned to tokens never seen with this category
    unseen_log_likelihood: f64,
}

/// A fitted multinomial naive Bayes model over token + amount features
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaiveBayes {
    classes: Vec<ClassWeights>,
    /// Amount range observed at fit time, reused to normalize at predict time
    amount_min: f64,
    amount_max: f64,
}

impl NaiveBayes {
    /// Fit a model from labeled examples.
    ///
    /// Fails on a degenerate corpus (no examples, or no usable features);
    /// callers keep whatever model they had before.
    pub fn fit(examples: &[TrainingExample]) -> Result<Self> {
        if examples.is_empty() {
            return Err(Error::Training("no training examples".to_string()));
        }

        let amount_min = examples.iter().map(|e| e.amount).fold(f64::INFINITY, f64::min);
        let amount_max = examples
            .iter()
            .map(|e| e.amount)
            .fold(f64::NEG_INFINITY, f64::max);

        // token counts per category, plus the global vocabulary
        let mut counts: HashMap<&str, HashMap<String, usize>> = HashMap::new();
        let mut class_examples: HashMap<&str, usize> = HashMap::new();
        let mut vocabulary: BTreeSet<String> = BTreeSet::new();

        for example in examples {
            let tokens = featurize(&example.description, example.amount, amount_min, amount_max);
            let class_counts = counts.entry(example.category.as_str()).or_default();
            for token in tokens {
                vocabulary.insert(token.clone());
                *class_counts.entry(token).or_insert(0) += 1;
            }
            *class_examples.entry(example.category.as_str()).or_insert(0) += 1;
        }

        if vocabulary.is_empty() {
            return Err(Error::Training("no usable features in training set".to_string()));
        }

        let vocab_size = vocabulary.len() as f64;
        let total_examples = examples.len() as f64;

        // Deterministic class order: sort labels so repeated fits over the
        // same corpus serialize identically
        let mut labels: Vec<&str> = class_examples.keys().copied().collect();
        labels.sort_unstable();

        let classes = labels
            .into_iter()
            .map(|label| {
                let class_counts = counts.get(label).cloned().unwrap_or_default();
                let token_total: usize = class_counts.values().sum();
                let denominator = token_total as f64 + SMOOTHING * vocab_size;
                let token_log_likelihood = class_counts
                    .into_iter()
                    .map(|(token, count)| {
                        (token, ((count as f64 + SMOOTHING) / denominator).ln())
                    })
                    .collect();
                ClassWeights {
                    label: label.to_string(),
                    log_prior: (class_examples[label] as f64 / total_examples).ln(),
                    token_log_likelihood,
                    unseen_log_likelihood: (SMOOTHING / denominator).ln(),
                }
            })
            .collect();

        Ok(Self {
            classes,
            amount_min,
            amount_max,
        })
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(|c| c.label.as_str())
    }
}

impl Classifier for NaiveBayes {
    fn predict(&self, description: &str, amount: f64) -> Option<String> {
        let tokens = featurize(description, amount, self.amount_min, self.amount_max);

        let mut best: Option<(&ClassWeights, f64)> = None;
        for class in &self.classes {
            let score: f64 = class.log_prior
                + tokens
                    .iter()
                    .map(|token| {
                        class
                            .token_log_likelihood
                            .get(token)
                            .copied()
                            .unwrap_or(class.unseen_log_likelihood)
                    })
                    .sum::<f64>();
            // Ties resolve to the earlier (lexicographically smaller) label
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((class, score));
            }
        }

        best.map(|(class, _)| class.label.clone())
    }
}

/// Lowercased alphanumeric tokens of a description
fn tokenize(description: &str) -> impl Iterator<Item = String> + '_ {
    description
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

/// Bag of features for one (description, amount) pair: the description's
/// tokens plus the normalized amount bucket as a pseudo-token
fn featurize(description: &str, amount: f64, amount_min: f64, amount_max: f64) -> Vec<String> {
    let mut tokens: Vec<String> = tokenize(description).collect();
    tokens.push(format!("amt:{}", amount_bucket(amount, amount_min, amount_max)));
    tokens
}

/// Min-max normalize the amount against the training range, clamp to [0, 1],
/// and collapse into one of [`AMOUNT_BUCKETS`] buckets
fn amount_bucket(amount: f64, min: f64, max: f64) -> usize {
    let span = max - min;
    let normalized = if span > 0.0 {
        ((amount - min) / span).clamp(0.0, 1.0)
    } else {
        0.5
    };
    ((normalized * AMOUNT_BUCKETS as f64) as usize).min(AMOUNT_BUCKETS - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example(description: &str, amount: f64, category: &str) -> TrainingExample {
        TrainingExample::new(description, amount, category)
    }

    #[test]
    fn tokenize_lowercases_and_splits_on_punctuation() {
        let tokens: Vec<String> = tokenize("AMAZON.COM*Order #123").collect();
        assert_eq!(tokens, vec!["amazon", "com", "order", "123"]);
    }

    #[test]
    fn amount_bucket_spans_range() {
        assert_eq!(amount_bucket(-10.0, -10.0, 10.0), 0);
        assert_eq!(amount_bucket(10.0, -10.0, 10.0), AMOUNT_BUCKETS - 1);
        assert_eq!(amount_bucket(100.0, -10.0, 10.0), AMOUNT_BUCKETS - 1);
        // Degenerate range collapses to the middle bucket
        assert_eq!(amount_bucket(5.0, 5.0, 5.0), AMOUNT_BUCKETS / 2);
    }

    #[test]
    fn fit_rejects_empty_corpus() {
        assert!(NaiveBayes::fit(&[]).is_err());
    }

    #[test]
    fn single_class_always_predicted() {
        let model = NaiveBayes::fit(&[example("Coffee Shop", -5.50, "Food")]).unwrap();
        assert_eq!(model.class_count(), 1);
        assert_eq!(
            model.predict("Anything at all", 100.0),
            Some("Food".to_string())
        );
    }

    #[test]
    fn predicts_by_token_overlap() {
        let model = NaiveBayes::fit(&[
            example("Coffee Shop", -5.50, "Food"),
            example("Bus Fare", -2.75, "Transport"),
        ])
        .unwrap();

        assert_eq!(
            model.predict("Coffee Shop Purchase", -4.00),
            Some("Food".to_string())
        );
        assert_eq!(
            model.predict("City Bus Fare", -3.00),
            Some("Transport".to_string())
        );
    }

    #[test]
    fn amount_separates_identical_descriptions() {
        let model = NaiveBayes::fit(&[
            example("TRANSFER", -50.0, "Expense"),
            example("TRANSFER", 2000.0, "Income"),
        ])
        .unwrap();

        assert_eq!(model.predict("TRANSFER", 1900.0), Some("Income".to_string()));
        assert_eq!(model.predict("TRANSFER", -40.0), Some("Expense".to_string()));
    }

    #[test]
    fn serde_round_trip_preserves_predictions() {
        let model = NaiveBayes::fit(&[
            example("Coffee Shop", -5.50, "Food"),
            example("Bus Fare", -2.75, "Transport"),
        ])
        .unwrap();

        let json = serde_json::to_string(&model).unwrap();
        let restored: NaiveBayes = serde_json::from_str(&json).unwrap();

        assert_eq!(
            restored.predict("Coffee Shop Purchase", -4.00),
            model.predict("Coffee Shop Purchase", -4.00)
        );
        assert_eq!(restored.class_count(), 2);
    }

    #[test]
    fn labels_are_sorted_and_stable() {
        let model = NaiveBayes::fit(&[
            example("Bus Fare", -2.75, "Transport"),
            example("Coffee Shop", -5.50, "Food"),
        ])
        .unwrap();
        let labels: Vec<&str> = model.labels().collect();
        assert_eq!(labels, vec!["Food", "Transport"]);
    }
}
