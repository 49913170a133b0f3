//! Identifiers and sharded storage paths.
//!
//! Records and accounts are identified by UUID v4 values written in a canonical form:
//! **32 lowercase hexadecimal characters**, no hyphens (`Uuid::simple()`).
//!
//! Storage directories are sharded on the first four characters of an identifier:
//! `parent_dir/<id[0..2]>/<id[2..4]>/<id>/`, e.g.
//! `triage_data/evaluations/55/0e/550e8400e29b41d4a716446655440000/`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IdError {
    #[error("identifier must be 32 lowercase hex characters without hyphens, got: '{0}'")]
    NotCanonical(String),
}

/// Returns true if `input` is a canonical identifier (32 lowercase hex characters).
pub fn is_canonical(input: &str) -> bool {
    input.len() == 32
        && input
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Returns `parent_dir/<s1>/<s2>/<key>/` for a hex key of at least four characters.
pub(crate) fn sharded_dir(parent_dir: &Path, key: &str) -> PathBuf {
    parent_dir.join(&key[0..2]).join(&key[2..4]).join(key)
}

macro_rules! canonical_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Uuid);

        impl $name {
            /// Allocates a fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Parses an identifier that must already be canonical.
            ///
            /// Hyphenated or uppercase forms are rejected rather than normalised.
            pub fn parse(input: &str) -> Result<Self, IdError> {
                if !is_canonical(input) {
                    return Err(IdError::NotCanonical(input.to_string()));
                }
                Uuid::parse_str(input)
                    .map(Self)
                    .map_err(|_| IdError::NotCanonical(input.to_string()))
            }

            pub fn uuid(&self) -> Uuid {
                self.0
            }

            /// Storage directory of this identifier under `parent_dir`.
            pub fn sharded_dir(&self, parent_dir: &Path) -> PathBuf {
                sharded_dir(parent_dir, &self.to_string())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0.simple())
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.to_string()
            }
        }
    };
}

canonical_id!(
    /// Identifier of a stored evaluation record.
    RecordId
);

canonical_id!(
    /// Identifier of a user account.
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_canonical() {
        let id = RecordId::new();
        assert!(is_canonical(&id.to_string()));
    }

    #[test]
    fn parse_round_trips_display() {
        let id = UserId::new();
        let parsed = UserId::parse(&id.to_string()).expect("canonical id should parse");
        assert_eq!(parsed, id);
    }

    #[test]
    fn parse_rejects_hyphenated_and_uppercase() {
        let hyphenated = "550e8400-e29b-41d4-a716-446655440000";
        let upper = "550E8400E29B41D4A716446655440000";
        assert!(RecordId::parse(hyphenated).is_err());
        assert!(RecordId::parse(upper).is_err());
        assert!(RecordId::parse("").is_err());
    }

    #[test]
    fn sharded_dir_uses_first_four_characters() {
        let id = RecordId::parse("550e8400e29b41d4a716446655440000").unwrap();
        let dir = id.sharded_dir(Path::new("/data/evaluations"));
        assert_eq!(
            dir,
            PathBuf::from("/data/evaluations/55/0e/550e8400e29b41d4a716446655440000")
        );
    }
}
