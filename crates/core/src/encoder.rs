//! Symptom encoding.
//!
//! Turns submitted form flags into a fixed-order binary [`SymptomVector`]. Positions follow
//! [`Symptom::ALL`]; unknown keys are ignored and nothing here can fail except the raw-slice
//! and bit-string entry points, which check the vector shape.

use crate::catalog::{Symptom, SYMPTOM_COUNT};
use crate::{TriageError, TriageResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Binary symptom vector: `bits[i] == 1` iff `Symptom::ALL[i]` was reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SymptomVector([u8; SYMPTOM_COUNT]);

impl SymptomVector {
    /// The all-zero vector.
    pub fn empty() -> Self {
        Self([0; SYMPTOM_COUNT])
    }

    /// Encodes a submission of `(key, truthy)` pairs.
    ///
    /// Only keys that are both known and truthy set their position.
    pub fn encode<'a, I>(submitted: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        let mut bits = [0u8; SYMPTOM_COUNT];
        for (key, truthy) in submitted {
            if !truthy {
                continue;
            }
            if let Some(symptom) = Symptom::from_key(key) {
                bits[symptom.index()] = 1;
            }
        }
        Self(bits)
    }

    /// Encodes a plain set of selected keys; every key present counts as truthy.
    pub fn from_selected_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys: Vec<S> = keys.into_iter().collect();
        Self::encode(keys.iter().map(|k| (k.as_ref(), true)))
    }

    /// Builds a vector from a raw integer slice.
    ///
    /// Non-zero entries are binarised to 1.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::ShapeMismatch`] when `raw.len()` differs from the catalog length.
    pub fn from_slice(raw: &[u8]) -> TriageResult<Self> {
        if raw.len() != SYMPTOM_COUNT {
            return Err(TriageError::ShapeMismatch {
                expected: SYMPTOM_COUNT,
                actual: raw.len(),
            });
        }
        let mut bits = [0u8; SYMPTOM_COUNT];
        for (bit, value) in bits.iter_mut().zip(raw) {
            *bit = u8::from(*value > 0);
        }
        Ok(Self(bits))
    }

    pub fn is_set(&self, symptom: Symptom) -> bool {
        self.0[symptom.index()] == 1
    }

    pub fn as_bits(&self) -> &[u8; SYMPTOM_COUNT] {
        &self.0
    }

    /// Symptoms set in this vector, in catalog order.
    pub fn selected(&self) -> impl Iterator<Item = Symptom> + '_ {
        Symptom::ALL.into_iter().filter(|s| self.is_set(*s))
    }

    /// Display labels of the selected symptoms, in catalog order.
    pub fn selected_labels(&self) -> Vec<String> {
        self.selected().map(|s| s.label().to_string()).collect()
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|b| **b == 1).count()
    }
}

impl FromStr for SymptomVector {
    type Err = TriageError;

    /// Parses a string of `0`/`1` characters, one per catalog position.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let raw = s
            .chars()
            .map(|c| match c {
                '0' => Ok(0u8),
                '1' => Ok(1u8),
                other => Err(TriageError::InvalidVector(format!(
                    "expected only '0' or '1', found '{other}'"
                ))),
            })
            .collect::<TriageResult<Vec<u8>>>()?;
        Self::from_slice(&raw)
    }
}

impl std::fmt::Display for SymptomVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for bit in self.0 {
            write!(f, "{bit}")?;
        }
        Ok(())
    }
}

/// Counts truthy values in an arbitrary submitted JSON object.
///
/// Truthiness follows form semantics: `null`, `false`, `0`, `""`, `[]` and `{}` are falsy.
/// Keys are not checked against the catalog.
pub fn count_truthy<'a, I>(values: I) -> usize
where
    I: IntoIterator<Item = &'a serde_json::Value>,
{
    values.into_iter().filter(|v| is_truthy(v)).count()
}

/// JSON truthiness of a submitted form value.
pub fn is_truthy(value: &serde_json::Value) -> bool {
    use serde_json::Value;

    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
