//! Bernoulli naive-Bayes classifier over symptom vectors.
//!
//! Each class models every symptom as an independent presence/absence variable. Counts are
//! smoothed with an additive prior so that no feature likelihood is ever zero:
//!
//! ```text
//! log p(x_j = 1 | c) = ln((feature_count[c][j] + α) / (class_count[c] + 2α))
//! log p(x_j = 0 | c) = ln((class_count[c] - feature_count[c][j] + α) / (class_count[c] + 2α))
//! log p(c)           = ln(class_count[c] / n)
//! ```
//!
//! Scoring sums the per-feature terms and the class prior (joint log-likelihood), normalises
//! with log-sum-exp and exponentiates, yielding positive per-class posterior scores.
//!
//! The model is fitted once at startup and is immutable afterwards; share it behind an `Arc`.

use crate::catalog::{Condition, CONDITION_COUNT, SYMPTOM_COUNT};
use crate::constants::{CORPUS_SEED, CORPUS_SIZE, SMOOTHING_ALPHA};
use crate::corpus::TrainingCorpus;
use crate::encoder::SymptomVector;
use crate::TriageResult;
use serde::{Deserialize, Serialize};

/// Positive per-class scores, indexed like [`Condition::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassScores([f64; CONDITION_COUNT]);

impl ClassScores {
    pub fn new(scores: [f64; CONDITION_COUNT]) -> Self {
        Self(scores)
    }

    pub fn as_array(&self) -> &[f64; CONDITION_COUNT] {
        &self.0
    }

    pub fn get(&self, condition: Condition) -> f64 {
        self.0[condition.index()]
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }
}

/// Fitted classifier parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticClassifier {
    class_count: [usize; CONDITION_COUNT],
    class_log_prior: [f64; CONDITION_COUNT],
    feature_log_prob: [[f64; SYMPTOM_COUNT]; CONDITION_COUNT],
    feature_log_neg_prob: [[f64; SYMPTOM_COUNT]; CONDITION_COUNT],
}

impl SyntheticClassifier {
    /// Generates the fixed-seed corpus and fits the model on it.
    pub fn pretrained() -> Self {
        let corpus = TrainingCorpus::generate(CORPUS_SEED, CORPUS_SIZE);
        let classifier = Self::fit(&corpus, SMOOTHING_ALPHA);
        tracing::debug!(
            examples = corpus.len(),
            class_count = ?classifier.class_count,
            "fitted synthetic classifier"
        );
        classifier
    }

    /// Fits the model on `corpus` with additive smoothing `alpha`.
    ///
    /// The result depends only on the multiset of examples, not on their order.
    pub fn fit(corpus: &TrainingCorpus, alpha: f64) -> Self {
        let mut class_count = [0usize; CONDITION_COUNT];
        let mut feature_count = [[0usize; SYMPTOM_COUNT]; CONDITION_COUNT];

        for example in corpus.examples() {
            class_count[example.label] += 1;
            for (count, value) in feature_count[example.label]
                .iter_mut()
                .zip(example.features)
            {
                *count += usize::from(value > 0);
            }
        }

        let total = corpus.len() as f64;
        let mut class_log_prior = [0.0; CONDITION_COUNT];
        let mut feature_log_prob = [[0.0; SYMPTOM_COUNT]; CONDITION_COUNT];
        let mut feature_log_neg_prob = [[0.0; SYMPTOM_COUNT]; CONDITION_COUNT];

        for c in 0..CONDITION_COUNT {
            let n_c = class_count[c] as f64;
            // An empty class has ln(0) = -inf and can never win; an empty corpus falls back
            // to a uniform prior.
            class_log_prior[c] = if total > 0.0 {
                n_c.ln() - total.ln()
            } else {
                -(CONDITION_COUNT as f64).ln()
            };

            let denominator = n_c + 2.0 * alpha;
            for j in 0..SYMPTOM_COUNT {
                let present = feature_count[c][j] as f64;
                feature_log_prob[c][j] = ((present + alpha) / denominator).ln();
                feature_log_neg_prob[c][j] = ((n_c - present + alpha) / denominator).ln();
            }
        }

        Self {
            class_count,
            class_log_prior,
            feature_log_prob,
            feature_log_neg_prob,
        }
    }

    /// Number of training examples per class.
    pub fn class_count(&self) -> &[usize; CONDITION_COUNT] {
        &self.class_count
    }

    pub fn class_log_prior(&self) -> &[f64; CONDITION_COUNT] {
        &self.class_log_prior
    }

    /// Unnormalised log-likelihood `ln p(c) + Σ_j ln p(x_j | c)` per class.
    pub fn joint_log_likelihood(&self, vector: &SymptomVector) -> [f64; CONDITION_COUNT] {
        let mut jll = self.class_log_prior;
        for (c, score) in jll.iter_mut().enumerate() {
            for (j, bit) in vector.as_bits().iter().enumerate() {
                *score += if *bit == 1 {
                    self.feature_log_prob[c][j]
                } else {
                    self.feature_log_neg_prob[c][j]
                };
            }
        }
        jll
    }

    /// Posterior score per class: `exp(jll - logsumexp(jll))`.
    pub fn score(&self, vector: &SymptomVector) -> ClassScores {
        let jll = self.joint_log_likelihood(vector);

        let max = jll.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max == f64::NEG_INFINITY {
            return ClassScores::new([0.0; CONDITION_COUNT]);
        }

        let log_norm = max + jll.iter().map(|v| (v - max).exp()).sum::<f64>().ln();
        let mut scores = [0.0; CONDITION_COUNT];
        for (score, value) in scores.iter_mut().zip(jll) {
            *score = (value - log_norm).exp();
        }
        ClassScores::new(scores)
    }

    /// Scores a raw integer slice.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::ShapeMismatch` if the slice length differs from the symptom
    /// catalog length.
    pub fn score_slice(&self, raw: &[u8]) -> TriageResult<ClassScores> {
        let vector = SymptomVector::from_slice(raw)?;
        Ok(self.score(&vector))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Example;
    use crate::TriageError;

    fn example(label: usize, ones: &[usize]) -> Example {
        let mut features = [0u8; SYMPTOM_COUNT];
        for j in ones {
            features[*j] = 1;
        }
        Example { features, label }
    }

    #[test]
    fn pretrained_model_is_reproducible() {
        let a = SyntheticClassifier::pretrained();
        let b = SyntheticClassifier::pretrained();
        assert_eq!(a, b);
        assert_eq!(a.class_count().iter().sum::<usize>(), CORPUS_SIZE);
    }

    #[test]
    fn pretrained_model_matches_pinned_corpus() {
        let model = SyntheticClassifier::pretrained();
        assert_eq!(model.class_count(), &[3, 6, 11, 6, 12, 7, 11, 8]);

        let vector = SymptomVector::from_selected_keys(["fiebre", "tos", "fatiga"]);
        let ranking: Vec<(Condition, u8)> = crate::ranker::rank(&model.score(&vector))
            .into_iter()
            .map(|r| (r.condition, r.percent))
            .collect();
        assert_eq!(
            ranking,
            vec![
                (Condition::Hiperglucemia, 35),
                (Condition::MigranaTensional, 30),
                (Condition::Gastroenteritis, 19),
            ]
        );
    }

    #[test]
    fn fit_is_order_independent() {
        let corpus = TrainingCorpus::generate(CORPUS_SEED, CORPUS_SIZE);
        let mut reversed = corpus.examples().to_vec();
        reversed.reverse();

        let a = SyntheticClassifier::fit(&corpus, SMOOTHING_ALPHA);
        let b = SyntheticClassifier::fit(&TrainingCorpus::from_examples(reversed), SMOOTHING_ALPHA);
        assert_eq!(a.class_count(), b.class_count());
        assert_eq!(a.feature_log_prob, b.feature_log_prob);
    }

    #[test]
    fn fit_applies_laplace_smoothing() {
        // Class 0: two examples, feature 0 present in both; class 1: one example, no features.
        let corpus = TrainingCorpus::from_examples(vec![
            example(0, &[0]),
            example(0, &[0, 1]),
            example(1, &[]),
        ]);
        let model = SyntheticClassifier::fit(&corpus, 1.0);

        assert_eq!(model.class_count()[0], 2);
        assert_eq!(model.class_count()[1], 1);
        assert!((model.class_log_prior()[0] - (2.0f64 / 3.0).ln()).abs() < 1e-12);
        // (2 + 1) / (2 + 2)
        assert!((model.feature_log_prob[0][0] - (0.75f64).ln()).abs() < 1e-12);
        // (1 + 1) / (2 + 2)
        assert!((model.feature_log_prob[0][1] - (0.5f64).ln()).abs() < 1e-12);
        // (1 - 0 + 1) / (1 + 2)
        assert!((model.feature_log_neg_prob[1][0] - (2.0f64 / 3.0).ln()).abs() < 1e-12);
        assert_eq!(model.class_log_prior()[2], f64::NEG_INFINITY);
    }

    #[test]
    fn scores_are_positive_posteriors() {
        let model = SyntheticClassifier::pretrained();
        let vector = SymptomVector::from_selected_keys(["fiebre", "tos", "fatiga"]);
        let scores = model.score(&vector);

        assert!((scores.total() - 1.0).abs() < 1e-9);
        for (c, score) in scores.as_array().iter().enumerate() {
            if model.class_count()[c] > 0 {
                assert!(*score > 0.0);
            }
            assert!(*score <= 1.0);
        }
    }

    #[test]
    fn empty_class_scores_zero() {
        let corpus = TrainingCorpus::from_examples(vec![example(0, &[0]), example(3, &[1])]);
        let model = SyntheticClassifier::fit(&corpus, 1.0);
        let scores = model.score(&SymptomVector::from_selected_keys(["fiebre"]));

        assert!(scores.get(Condition::InfeccionRespiratoria) > scores.get(Condition::CovidSimilar));
        assert_eq!(scores.get(Condition::Gastroenteritis), 0.0);
        assert!((scores.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn feature_evidence_moves_the_posterior() {
        let corpus = TrainingCorpus::from_examples(vec![
            example(0, &[0]),
            example(0, &[0]),
            example(1, &[1]),
            example(1, &[1]),
        ]);
        let model = SyntheticClassifier::fit(&corpus, 1.0);

        let first = model.score(&SymptomVector::from_selected_keys(["fiebre"]));
        assert!(first.get(Condition::InfeccionRespiratoria) > first.get(Condition::Gastroenteritis));

        let second = model.score(&SymptomVector::from_selected_keys(["tos"]));
        assert!(second.get(Condition::Gastroenteritis) > second.get(Condition::InfeccionRespiratoria));
    }

    #[test]
    fn score_slice_checks_shape() {
        let model = SyntheticClassifier::pretrained();
        let err = model
            .score_slice(&[0u8; SYMPTOM_COUNT + 1])
            .expect_err("long vector should fail");
        assert!(matches!(err, TriageError::ShapeMismatch { actual: 17, .. }));

        let ok = model.score_slice(&[0u8; SYMPTOM_COUNT]).unwrap();
        assert_eq!(ok, model.score(&SymptomVector::empty()));
    }
}
