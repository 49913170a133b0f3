//! Fixed symptom and condition catalogs.
//!
//! The order of [`Symptom::ALL`] defines symptom vector positions and the order of
//! [`Condition::ALL`] defines classifier class indices and the tie-break order of rankings.
//! Neither may be reordered without refitting the classifier.

use serde::{Deserialize, Serialize};

/// Number of symptoms in the canonical catalog.
pub const SYMPTOM_COUNT: usize = 16;

/// Number of conditions the classifier can predict.
pub const CONDITION_COUNT: usize = 8;

/// A symptom the intake form can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symptom {
    Fiebre,
    Tos,
    DolorGarganta,
    Congestion,
    DolorCabeza,
    DolorMuscular,
    Fatiga,
    Nauseas,
    Vomito,
    Diarrea,
    DolorAbdominal,
    PerdidaOlfato,
    Erupcion,
    PresionAlta,
    GlucosaAlta,
    SaturacionBaja,
}

impl Symptom {
    /// All symptoms in canonical vector order.
    pub const ALL: [Symptom; SYMPTOM_COUNT] = [
        Symptom::Fiebre,
        Symptom::Tos,
        Symptom::DolorGarganta,
        Symptom::Congestion,
        Symptom::DolorCabeza,
        Symptom::DolorMuscular,
        Symptom::Fatiga,
        Symptom::Nauseas,
        Symptom::Vomito,
        Symptom::Diarrea,
        Symptom::DolorAbdominal,
        Symptom::PerdidaOlfato,
        Symptom::Erupcion,
        Symptom::PresionAlta,
        Symptom::GlucosaAlta,
        Symptom::SaturacionBaja,
    ];

    /// Form key submitted by the intake form.
    pub const fn key(self) -> &'static str {
        match self {
            Symptom::Fiebre => "fiebre",
            Symptom::Tos => "tos",
            Symptom::DolorGarganta => "dolor_garganta",
            Symptom::Congestion => "congestion",
            Symptom::DolorCabeza => "dolor_cabeza",
            Symptom::DolorMuscular => "dolor_muscular",
            Symptom::Fatiga => "fatiga",
            Symptom::Nauseas => "nauseas",
            Symptom::Vomito => "vomito",
            Symptom::Diarrea => "diarrea",
            Symptom::DolorAbdominal => "dolor_abdominal",
            Symptom::PerdidaOlfato => "perdida_olfato",
            Symptom::Erupcion => "erupcion",
            Symptom::PresionAlta => "presion_alta",
            Symptom::GlucosaAlta => "glucosa_alta",
            Symptom::SaturacionBaja => "saturacion_baja",
        }
    }

    /// Human-readable label shown to patients.
    pub const fn label(self) -> &'static str {
        match self {
            Symptom::Fiebre => "Fiebre",
            Symptom::Tos => "Tos",
            Symptom::DolorGarganta => "Dolor de garganta",
            Symptom::Congestion => "Congestión nasal",
            Symptom::DolorCabeza => "Dolor de cabeza",
            Symptom::DolorMuscular => "Dolor muscular",
            Symptom::Fatiga => "Fatiga",
            Symptom::Nauseas => "Náuseas",
            Symptom::Vomito => "Vómito",
            Symptom::Diarrea => "Diarrea",
            Symptom::DolorAbdominal => "Dolor abdominal",
            Symptom::PerdidaOlfato => "Pérdida de olfato",
            Symptom::Erupcion => "Erupción cutánea",
            Symptom::PresionAlta => "Presión alta (reportada)",
            Symptom::GlucosaAlta => "Glucosa alta (reportada)",
            Symptom::SaturacionBaja => "Saturación de O₂ baja (reportada)",
        }
    }

    /// Position of this symptom in a symptom vector.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Looks up a symptom by its form key. Unknown keys return `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }
}

impl std::fmt::Display for Symptom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A condition label the classifier ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Condition {
    InfeccionRespiratoria,
    Gastroenteritis,
    MigranaTensional,
    CovidSimilar,
    DermatitisAlergica,
    HipertensionDescontrolada,
    Hiperglucemia,
    Hipoxemia,
}

impl Condition {
    /// All conditions in class-index order.
    pub const ALL: [Condition; CONDITION_COUNT] = [
        Condition::InfeccionRespiratoria,
        Condition::Gastroenteritis,
        Condition::MigranaTensional,
        Condition::CovidSimilar,
        Condition::DermatitisAlergica,
        Condition::HipertensionDescontrolada,
        Condition::Hiperglucemia,
        Condition::Hipoxemia,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Condition::InfeccionRespiratoria => "Infección respiratoria",
            Condition::Gastroenteritis => "Gastroenteritis",
            Condition::MigranaTensional => "Migraña/Tensional",
            Condition::CovidSimilar => "COVID-similar",
            Condition::DermatitisAlergica => "Dermatitis/Alérgica",
            Condition::HipertensionDescontrolada => "Hipertensión descontrolada",
            Condition::Hiperglucemia => "Hiperglucemia",
            Condition::Hipoxemia => "Hipoxemia (revisar)",
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
