use crate::ids::IdError;

/// Errors raised by the scoring pipeline and its configuration.
#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("symptom vector has {actual} entries, expected {expected}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("invalid symptom vector: {0}")]
    InvalidVector(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to create data directory: {0}")]
    DataDirCreation(std::io::Error),
}

pub type TriageResult<T> = std::result::Result<T, TriageError>;

/// Errors raised by the file-backed stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to create record directory: {0}")]
    DirCreation(std::io::Error),
    #[error("failed to write record file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read record file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to serialize YAML: {0}")]
    YamlSerialization(serde_yaml::Error),
    #[error("failed to deserialize YAML: {0}")]
    YamlDeserialization(serde_yaml::Error),
    #[error("record already exists: {0}")]
    AlreadyExists(String),
    #[error("record not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Id(#[from] IdError),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors raised by account registration and login.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("email and password are required")]
    MissingFields,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] triage_types::TextError),
    #[error("an account with this email already exists")]
    EmailTaken,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("stored password hash is malformed")]
    MalformedHash,
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AccountError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists(_) => AccountError::EmailTaken,
            other => AccountError::Store(other),
        }
    }
}

pub type AccountResult<T> = std::result::Result<T, AccountError>;
