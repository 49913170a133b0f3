//! The evaluation pipeline.
//!
//! `evaluate` runs the scoring pipeline and then hands an [`EvaluationRecord`] to an
//! [`EvaluationSink`]:
//!
//! ```text
//! selected keys ─► SymptomVector ─┬─► SyntheticClassifier ─► rank ─┐
//!                                 └─► triage::assess ──────────────┴─► EvaluationOutcome
//!                                                                       │
//!                                               EvaluationRecord ◄──────┘ (best effort)
//! ```
//!
//! Scoring is pure and reentrant; the only shared state is the immutable classifier. A sink
//! failure is logged and swallowed: the caller always receives the computed outcome.

use crate::classifier::SyntheticClassifier;
use crate::constants::RECOMMENDATION;
use crate::encoder::SymptomVector;
use crate::error::StoreResult;
use crate::ids::{RecordId, UserId};
use crate::ranker::{rank, RankedCondition};
use crate::triage::{assess, TriageLevel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use triage_types::Age;

/// Caller-supplied patient details, passed through unvalidated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientMetadata {
    pub name: String,
    pub age: Option<Age>,
    pub identity: String,
    pub history: String,
}

impl PatientMetadata {
    /// Builds metadata from raw form fields; a non-numeric age is dropped.
    pub fn from_form(
        name: impl Into<String>,
        age: Option<&str>,
        identity: impl Into<String>,
        history: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            age: Age::from_form_value(age),
            identity: identity.into(),
            history: history.into(),
        }
    }
}

/// Result returned to the caller of `evaluate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    /// Up to three conditions, most probable first.
    pub ranking: Vec<RankedCondition>,
    pub triage_level: TriageLevel,
    pub triage_message: String,
    pub red_flags: u8,
    /// Labels of the reported symptoms, in catalog order.
    pub selected_labels: Vec<String>,
}

/// A diagnosis as stored in a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedDiagnosis {
    pub label: String,
    pub percent: u8,
}

impl From<&RankedCondition> for RecordedDiagnosis {
    fn from(ranked: &RankedCondition) -> Self {
        Self {
            label: ranked.label().to_string(),
            percent: ranked.percent,
        }
    }
}

/// Persisted, immutable trace of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub id: RecordId,
    pub patient: PatientMetadata,
    pub selected_symptoms: Vec<String>,
    pub top_diagnosis: Option<RecordedDiagnosis>,
    pub alternatives: Vec<RecordedDiagnosis>,
    pub triage_level: TriageLevel,
    pub triage_message: String,
    pub recommendation: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub owner: Option<UserId>,
}

impl EvaluationRecord {
    pub fn new(
        patient: PatientMetadata,
        outcome: &EvaluationOutcome,
        owner: Option<UserId>,
    ) -> Self {
        let mut diagnoses = outcome.ranking.iter().map(RecordedDiagnosis::from);
        let top_diagnosis = diagnoses.next();
        let alternatives = diagnoses.collect();

        Self {
            id: RecordId::new(),
            patient,
            selected_symptoms: outcome.selected_labels.clone(),
            top_diagnosis,
            alternatives,
            triage_level: outcome.triage_level,
            triage_message: outcome.triage_message.clone(),
            recommendation: RECOMMENDATION.to_string(),
            created_at: Utc::now(),
            owner,
        }
    }
}

/// Destination for evaluation records.
///
/// Implementations must be safe to share across request handlers.
pub trait EvaluationSink: Send + Sync {
    fn persist(&self, record: &EvaluationRecord) -> StoreResult<()>;
}

/// Sink that drops every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSink;

impl EvaluationSink for DiscardSink {
    fn persist(&self, _record: &EvaluationRecord) -> StoreResult<()> {
        Ok(())
    }
}

/// Runs the scoring pipeline on `vector` without persisting anything.
pub fn score_vector(classifier: &SyntheticClassifier, vector: &SymptomVector) -> EvaluationOutcome {
    let scores = classifier.score(vector);
    let triage = assess(vector);

    EvaluationOutcome {
        ranking: rank(&scores),
        triage_level: triage.level,
        triage_message: triage.message().to_string(),
        red_flags: triage.red_flags,
        selected_labels: vector.selected_labels(),
    }
}

/// Evaluates symptom submissions against a shared classifier and records the results.
#[derive(Clone)]
pub struct Evaluator {
    classifier: Arc<SyntheticClassifier>,
    sink: Arc<dyn EvaluationSink>,
}

impl std::fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator").finish_non_exhaustive()
    }
}

impl Evaluator {
    pub fn new(classifier: Arc<SyntheticClassifier>, sink: Arc<dyn EvaluationSink>) -> Self {
        Self { classifier, sink }
    }

    pub fn classifier(&self) -> &SyntheticClassifier {
        &self.classifier
    }

    /// Evaluates a set of selected symptom keys. Unknown keys are ignored.
    pub fn evaluate<I, S>(
        &self,
        selected_symptom_keys: I,
        patient: PatientMetadata,
        owner: Option<UserId>,
    ) -> EvaluationOutcome
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let vector = SymptomVector::from_selected_keys(selected_symptom_keys);
        self.evaluate_vector(&vector, patient, owner)
    }

    /// Evaluates an already encoded vector.
    ///
    /// The record is persisted best effort; a sink failure never reaches the caller.
    pub fn evaluate_vector(
        &self,
        vector: &SymptomVector,
        patient: PatientMetadata,
        owner: Option<UserId>,
    ) -> EvaluationOutcome {
        let outcome = score_vector(&self.classifier, vector);

        let record = EvaluationRecord::new(patient, &outcome, owner);
        match self.sink.persist(&record) {
            Ok(()) => tracing::info!(record_id = %record.id, level = %outcome.triage_level, "evaluation recorded"),
            Err(e) => tracing::warn!(record_id = %record.id, "failed to persist evaluation: {e}"),
        }

        outcome
    }
}
