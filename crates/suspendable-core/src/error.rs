use crate::rules::suspension::MAX_SUSPENSION_REASON_CHARS;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("email is required")]
    EmptyEmail,
    #[error("invalid email: {0}")]
    InvalidEmail(String),
    #[error(
        "suspension reason is too long: {0} characters (max {max})",
        max = MAX_SUSPENSION_REASON_CHARS
    )]
    SuspensionReasonTooLong(usize),
    #[error("invalid suspension state: {0}")]
    InvalidSuspensionState(String),
}
