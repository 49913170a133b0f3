//! Request and response bodies of the triage API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use triage_core::encoder::{count_truthy, is_truthy};
use triage_core::evaluation::RecordedDiagnosis;
use triage_core::{
    EvaluationOutcome, EvaluationRecord, PatientMetadata, RankedCondition, Symptom, SymptomVector,
};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SymptomInfo {
    pub key: String,
    pub label: String,
}

impl From<Symptom> for SymptomInfo {
    fn from(symptom: Symptom) -> Self {
        Self {
            key: symptom.key().into(),
            label: symptom.label().into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListSymptomsRes {
    pub symptoms: Vec<SymptomInfo>,
}

impl ListSymptomsRes {
    pub fn catalog() -> Self {
        Self {
            symptoms: Symptom::ALL.into_iter().map(SymptomInfo::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct RegisterReq {
    pub email: String,
    pub password: String,
    pub password2: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRes {
    pub user_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginReq {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRes {
    pub token: String,
    pub user_id: String,
}

/// Intake form submission.
///
/// `symptoms` maps symptom keys to form values; a key counts as selected when its value is
/// truthy. `age` may be a number or free text and is kept only if numeric.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct EvaluateReq {
    pub name: String,
    #[schema(value_type = Option<String>)]
    pub age: Option<Value>,
    pub identity: String,
    pub history: String,
    #[schema(value_type = Object)]
    pub symptoms: BTreeMap<String, Value>,
}

impl EvaluateReq {
    pub fn symptom_vector(&self) -> SymptomVector {
        SymptomVector::encode(
            self.symptoms
                .iter()
                .map(|(key, value)| (key.as_str(), is_truthy(value))),
        )
    }

    pub fn patient_metadata(&self) -> PatientMetadata {
        let age = match &self.age {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        PatientMetadata::from_form(
            self.name.clone(),
            age.as_deref(),
            self.identity.clone(),
            self.history.clone(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RankedConditionRes {
    pub label: String,
    pub percent: u8,
}

impl From<&RankedCondition> for RankedConditionRes {
    fn from(ranked: &RankedCondition) -> Self {
        Self {
            label: ranked.label().into(),
            percent: ranked.percent,
        }
    }
}

impl From<&RecordedDiagnosis> for RankedConditionRes {
    fn from(diagnosis: &RecordedDiagnosis) -> Self {
        Self {
            label: diagnosis.label.clone(),
            percent: diagnosis.percent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EvaluateRes {
    pub ranking: Vec<RankedConditionRes>,
    /// `LOW`, `MEDIUM` or `HIGH`.
    pub triage_level: String,
    pub triage_message: String,
    pub red_flags: u8,
    pub selected_labels: Vec<String>,
}

impl From<EvaluationOutcome> for EvaluateRes {
    fn from(outcome: EvaluationOutcome) -> Self {
        Self {
            ranking: outcome.ranking.iter().map(RankedConditionRes::from).collect(),
            triage_level: outcome.triage_level.to_string(),
            triage_message: outcome.triage_message,
            red_flags: outcome.red_flags,
            selected_labels: outcome.selected_labels,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EvaluationRecordRes {
    pub id: String,
    pub name: String,
    pub age: Option<u32>,
    pub identity: String,
    pub history: String,
    pub selected_symptoms: Vec<String>,
    pub top_diagnosis: Option<RankedConditionRes>,
    pub alternatives: Vec<RankedConditionRes>,
    pub triage_level: String,
    pub triage_message: String,
    pub recommendation: String,
    /// RFC 3339 timestamp.
    pub created_at: String,
}

impl From<EvaluationRecord> for EvaluationRecordRes {
    fn from(record: EvaluationRecord) -> Self {
        Self {
            id: record.id.to_string(),
            name: record.patient.name,
            age: record.patient.age.map(|a| a.years()),
            identity: record.patient.identity,
            history: record.patient.history,
            selected_symptoms: record.selected_symptoms,
            top_diagnosis: record.top_diagnosis.as_ref().map(RankedConditionRes::from),
            alternatives: record
                .alternatives
                .iter()
                .map(RankedConditionRes::from)
                .collect(),
            triage_level: record.triage_level.to_string(),
            triage_message: record.triage_message,
            recommendation: record.recommendation,
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListEvaluationsRes {
    pub evaluations: Vec<EvaluationRecordRes>,
}

/// Arbitrary form values to count.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SymptomCountReq {
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub values: BTreeMap<String, Value>,
}

impl SymptomCountReq {
    pub fn count(&self) -> SymptomCountRes {
        SymptomCountRes {
            count: count_truthy(self.values.values()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SymptomCountRes {
    pub count: usize,
}
