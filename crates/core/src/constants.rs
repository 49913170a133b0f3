//! Constants used throughout the triage core crate.
//!
//! Storage layout names, model hyper-parameters and fixed texts live here so the rest of the
//! crate never hardcodes them.

/// Default directory for evaluation and account storage when none is configured.
pub const DEFAULT_DATA_DIR: &str = "triage_data";

/// Directory name (under the data dir) for evaluation records.
pub const EVALUATIONS_DIR_NAME: &str = "evaluations";

/// Directory name (under the data dir) for user accounts.
pub const USERS_DIR_NAME: &str = "users";

/// Filename of a stored evaluation record.
pub const EVALUATION_FILENAME: &str = "evaluation.yaml";

/// Filename of a stored user account.
pub const USER_FILENAME: &str = "user.yaml";

/// Seed of the synthetic training corpus.
pub const CORPUS_SEED: u64 = 42;

/// Number of synthetic training examples.
pub const CORPUS_SIZE: usize = 64;

/// Additive (Laplace) smoothing applied to every feature count.
pub const SMOOTHING_ALPHA: f64 = 1.0;

/// Number of conditions returned in a ranking.
pub const RANKING_LEN: usize = 3;

/// Recommendation stored with every evaluation record.
pub const RECOMMENDATION: &str =
    "Orientative result only. It does not replace an assessment by a health professional.";

/// Default PBKDF2 iteration count for password hashes.
pub const DEFAULT_PASSWORD_ITERATIONS: u32 = 600_000;

/// Default lifetime of a login session, in seconds (12 hours).
pub const DEFAULT_SESSION_TTL_SECS: u32 = 43_200;
