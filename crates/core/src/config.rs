//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services as an
//! `Arc<CoreConfig>`. Services never read environment variables while handling a request.

use crate::constants::{
    DEFAULT_PASSWORD_ITERATIONS, DEFAULT_SESSION_TTL_SECS, EVALUATIONS_DIR_NAME, USERS_DIR_NAME,
};
use crate::{TriageError, TriageResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    password_iterations: u32,
    session_ttl_secs: u32,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::InvalidConfig` if `password_iterations` is zero.
    pub fn new(data_dir: PathBuf, password_iterations: u32) -> TriageResult<Self> {
        if password_iterations == 0 {
            return Err(TriageError::InvalidConfig(
                "password_iterations must be at least 1".into(),
            ));
        }

        Ok(Self {
            data_dir,
            password_iterations,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
        })
    }

    /// Overrides the session lifetime.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::InvalidConfig` if `secs` is zero.
    pub fn with_session_ttl_secs(mut self, secs: u32) -> TriageResult<Self> {
        if secs == 0 {
            return Err(TriageError::InvalidConfig(
                "session_ttl_secs must be at least 1".into(),
            ));
        }
        self.session_ttl_secs = secs;
        Ok(self)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn evaluations_dir(&self) -> PathBuf {
        self.data_dir.join(EVALUATIONS_DIR_NAME)
    }

    pub fn users_dir(&self) -> PathBuf {
        self.data_dir.join(USERS_DIR_NAME)
    }

    pub fn password_iterations(&self) -> u32 {
        self.password_iterations
    }

    /// How long a login session stays valid after it is issued.
    pub fn session_ttl_secs(&self) -> u32 {
        self.session_ttl_secs
    }

    /// Creates the data directory (and parents) if it does not exist yet.
    pub fn ensure_data_dir(&self) -> TriageResult<()> {
        std::fs::create_dir_all(&self.data_dir).map_err(TriageError::DataDirCreation)
    }
}

/// Parse the password iteration count from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_PASSWORD_ITERATIONS`].
pub fn password_iterations_from_env_value(value: Option<String>) -> TriageResult<u32> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        None => Ok(DEFAULT_PASSWORD_ITERATIONS),
        Some(v) => v.parse::<u32>().map_err(|e| {
            TriageError::InvalidConfig(format!("invalid password iteration count '{v}': {e}"))
        }),
    }
}

/// Parse the session lifetime in seconds from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_SESSION_TTL_SECS`].
pub fn session_ttl_from_env_value(value: Option<String>) -> TriageResult<u32> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        None => Ok(DEFAULT_SESSION_TTL_SECS),
        Some(v) => v.parse::<u32>().map_err(|e| {
            TriageError::InvalidConfig(format!("invalid session lifetime '{v}': {e}"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_iterations() {
        let err = CoreConfig::new(PathBuf::from("data"), 0).expect_err("zero should fail");
        assert!(matches!(err, TriageError::InvalidConfig(_)));
    }

    #[test]
    fn derives_storage_dirs_from_data_dir() {
        let cfg = CoreConfig::new(PathBuf::from("/srv/triage"), 10).unwrap();
        assert_eq!(cfg.evaluations_dir(), PathBuf::from("/srv/triage/evaluations"));
        assert_eq!(cfg.users_dir(), PathBuf::from("/srv/triage/users"));
    }

    #[test]
    fn iterations_default_when_unset_or_blank() {
        assert_eq!(
            password_iterations_from_env_value(None).unwrap(),
            DEFAULT_PASSWORD_ITERATIONS
        );
        assert_eq!(
            password_iterations_from_env_value(Some("  ".into())).unwrap(),
            DEFAULT_PASSWORD_ITERATIONS
        );
    }

    #[test]
    fn iterations_parse_or_fail() {
        assert_eq!(
            password_iterations_from_env_value(Some(" 1000 ".into())).unwrap(),
            1000
        );
        assert!(password_iterations_from_env_value(Some("lots".into())).is_err());
    }

    #[test]
    fn session_ttl_defaults_and_overrides() {
        let cfg = CoreConfig::new(PathBuf::from("data"), 1).unwrap();
        assert_eq!(cfg.session_ttl_secs(), DEFAULT_SESSION_TTL_SECS);

        let cfg = cfg.with_session_ttl_secs(60).unwrap();
        assert_eq!(cfg.session_ttl_secs(), 60);
        assert!(cfg.with_session_ttl_secs(0).is_err());
    }

    #[test]
    fn session_ttl_parse_or_fail() {
        assert_eq!(
            session_ttl_from_env_value(None).unwrap(),
            DEFAULT_SESSION_TTL_SECS
        );
        assert_eq!(session_ttl_from_env_value(Some("900".into())).unwrap(), 900);
        assert!(session_ttl_from_env_value(Some("-1".into())).is_err());
    }

    #[test]
    fn ensure_data_dir_creates_nested_directories() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let nested = temp_dir.path().join("a").join("b");
        let cfg = CoreConfig::new(nested.clone(), 1).unwrap();
        cfg.ensure_data_dir().expect("ensure_data_dir should succeed");
        assert!(nested.is_dir());
    }
}
