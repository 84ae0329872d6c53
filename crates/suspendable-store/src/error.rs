use std::path::PathBuf;
use suspendable_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite error: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("stored account id is not a uuid: {0}")]
    InvalidId(String),
    #[error("stored timestamp out of range: {0} microseconds")]
    InvalidTimestamp(i64),
    #[error("account not found: {0}")]
    NotFound(String),
    #[error("database schema version {found} is newer than this build supports ({supported})")]
    SchemaTooNew { found: i64, supported: i64 },
    #[error("migration error: {0}")]
    Migration(String),
    #[error("invalid database path: {0}")]
    InvalidDataPath(PathBuf),
    #[error("email already in use: {0}")]
    DuplicateEmail(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    Io,
    Sql,
    Core,
    MissingHomeDir,
    InvalidId,
    InvalidTimestamp,
    NotFound,
    SchemaTooNew,
    Migration,
    InvalidDataPath,
    DuplicateEmail,
}

impl StoreError {
    /// Errors caused by caller input rather than by the database or host.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self.kind(),
            StoreErrorKind::Core
                | StoreErrorKind::InvalidDataPath
                | StoreErrorKind::DuplicateEmail
        )
    }

    pub fn kind(&self) -> StoreErrorKind {
        match self {
            StoreError::Io(_) => StoreErrorKind::Io,
            StoreError::Sql(_) => StoreErrorKind::Sql,
            StoreError::Core(_) => StoreErrorKind::Core,
            StoreError::MissingHomeDir => StoreErrorKind::MissingHomeDir,
            StoreError::InvalidId(_) => StoreErrorKind::InvalidId,
            StoreError::InvalidTimestamp(_) => StoreErrorKind::InvalidTimestamp,
            StoreError::NotFound(_) => StoreErrorKind::NotFound,
            StoreError::SchemaTooNew { .. } => StoreErrorKind::SchemaTooNew,
            StoreError::Migration(_) => StoreErrorKind::Migration,
            StoreError::InvalidDataPath(_) => StoreErrorKind::InvalidDataPath,
            StoreError::DuplicateEmail(_) => StoreErrorKind::DuplicateEmail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{StoreError, StoreErrorKind};
    use std::path::PathBuf;
    use suspendable_core::CoreError;

    #[test]
    fn input_errors_are_separated_from_storage_failures() {
        assert!(StoreError::DuplicateEmail("a@b.c".to_string()).is_input_error());
        assert!(StoreError::Core(CoreError::EmptyEmail).is_input_error());
        assert!(StoreError::InvalidDataPath(PathBuf::new()).is_input_error());
        assert!(!StoreError::NotFound("x".to_string()).is_input_error());
        assert!(!StoreError::InvalidTimestamp(i64::MAX).is_input_error());
        assert!(!StoreError::InvalidId("nope".to_string()).is_input_error());
    }

    #[test]
    fn newer_schema_reports_both_versions() {
        let err = StoreError::SchemaTooNew {
            found: 4,
            supported: 1,
        };
        assert_eq!(err.kind(), StoreErrorKind::SchemaTooNew);
        assert_eq!(
            err.to_string(),
            "database schema version 4 is newer than this build supports (1)"
        );
    }
}
