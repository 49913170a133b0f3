//! Red-flag triage rule.
//!
//! Independent of the classifier: a fixed rule over a handful of symptom flags decides how
//! urgently the patient should be seen.

use crate::catalog::Symptom;
use crate::encoder::SymptomVector;
use serde::{Deserialize, Serialize};

/// Discrete urgency classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TriageLevel {
    Low,
    Medium,
    High,
}

impl TriageLevel {
    /// Fixed advisory text shown with the level.
    pub const fn advisory(self) -> &'static str {
        match self {
            TriageLevel::High => "priority attention within hours",
            TriageLevel::Medium => "monitor 24h, consider consultation",
            TriageLevel::Low => "self-care and symptom monitoring",
        }
    }

    pub const fn from_red_flags(red_flags: u8) -> Self {
        match red_flags {
            0 | 1 => TriageLevel::Low,
            2 => TriageLevel::Medium,
            _ => TriageLevel::High,
        }
    }
}

impl std::fmt::Display for TriageLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriageLevel::Low => write!(f, "LOW"),
            TriageLevel::Medium => write!(f, "MEDIUM"),
            TriageLevel::High => write!(f, "HIGH"),
        }
    }
}

/// Outcome of the triage rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageAssessment {
    pub level: TriageLevel,
    pub red_flags: u8,
}

impl TriageAssessment {
    pub fn message(&self) -> &'static str {
        self.level.advisory()
    }
}

/// Counts red flags in `vector`.
///
/// Low oxygen saturation weighs 2; high blood pressure and high glucose weigh 1 each; at
/// least two of fever, headache and fatigue together weigh 1.
pub fn red_flags(vector: &SymptomVector) -> u8 {
    let mut flags = 0;
    if vector.is_set(Symptom::SaturacionBaja) {
        flags += 2;
    }
    if vector.is_set(Symptom::PresionAlta) {
        flags += 1;
    }
    if vector.is_set(Symptom::GlucosaAlta) {
        flags += 1;
    }

    let systemic = [Symptom::Fiebre, Symptom::DolorCabeza, Symptom::Fatiga]
        .into_iter()
        .filter(|s| vector.is_set(*s))
        .count();
    if systemic >= 2 {
        flags += 1;
    }
    flags
}

/// Applies the triage rule.
pub fn assess(vector: &SymptomVector) -> TriageAssessment {
    let red_flags = red_flags(vector);
    TriageAssessment {
        level: TriageLevel::from_red_flags(red_flags),
        red_flags,
    }
}
