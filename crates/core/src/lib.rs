//! # Triage Core
//!
//! Core logic for the symptom triage service:
//! - Encoding submitted symptoms into a fixed-order binary vector
//! - A naive-Bayes classifier fitted once on a fixed-seed synthetic corpus
//! - Top-3 ranking of condition scores and a red-flag triage rule
//! - File-backed storage for evaluation records and user accounts
//!
//! **No API concerns**: HTTP servers, sessions and DTOs belong in `api-rest` or `api-shared`.
//!
//! The classifier is illustrative only. It is trained on random data and its rankings carry
//! no clinical meaning.

pub mod catalog;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod corpus;
pub mod encoder;
pub mod error;
pub mod evaluation;
pub mod ids;
pub mod password;
pub mod ranker;
pub mod repositories;
pub mod triage;

pub use catalog::{Condition, Symptom, CONDITION_COUNT, SYMPTOM_COUNT};
pub use classifier::{ClassScores, SyntheticClassifier};
pub use config::CoreConfig;
pub use constants::DEFAULT_DATA_DIR;
pub use encoder::SymptomVector;
pub use error::{
    AccountError, AccountResult, StoreError, StoreResult, TriageError, TriageResult,
};
pub use evaluation::{
    DiscardSink, EvaluationOutcome, EvaluationRecord, EvaluationSink, Evaluator, PatientMetadata,
};
pub use ids::{RecordId, UserId};
pub use ranker::RankedCondition;
pub use repositories::accounts::{AccountService, UserAccount};
pub use repositories::evaluations::EvaluationStore;
pub use triage::{TriageAssessment, TriageLevel};
pub use triage_types::{Age, EmailAddress};
