use crate::error::CoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MAX_SUSPENSION_REASON_CHARS: usize = 250;

/// Suspension state of an account relative to a reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuspensionState {
    Active,
    Pending,
    Suspended,
}

impl SuspensionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Suspended => "suspended",
        }
    }
}

impl fmt::Display for SuspensionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SuspensionState {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "pending" => Ok(Self::Pending),
            "suspended" => Ok(Self::Suspended),
            other => Err(CoreError::InvalidSuspensionState(other.to_string())),
        }
    }
}

/// Both comparisons are strict, so at `suspended_at == now` the account is
/// neither suspended nor pending and reports `Active`.
pub fn suspension_state(
    now: DateTime<Utc>,
    suspended_at: Option<DateTime<Utc>>,
) -> SuspensionState {
    if is_suspended(now, suspended_at) {
        SuspensionState::Suspended
    } else if is_suspension_pending(now, suspended_at) {
        SuspensionState::Pending
    } else {
        SuspensionState::Active
    }
}

pub fn is_suspended(now: DateTime<Utc>, suspended_at: Option<DateTime<Utc>>) -> bool {
    matches!(suspended_at, Some(at) if at < now)
}

pub fn is_suspension_pending(now: DateTime<Utc>, suspended_at: Option<DateTime<Utc>>) -> bool {
    matches!(suspended_at, Some(at) if at > now)
}

pub fn sanitize_suspension_reason(
    suspended_at: Option<DateTime<Utc>>,
    reason: Option<String>,
) -> Option<String> {
    if suspended_at.is_none() {
        return None;
    }
    let reason = reason?;
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.len() == reason.len() {
        Some(reason)
    } else {
        Some(trimmed.to_string())
    }
}

pub fn validate_suspension_reason(reason: Option<&str>) -> Result<(), CoreError> {
    if let Some(reason) = reason {
        let chars = reason.chars().count();
        if chars > MAX_SUSPENSION_REASON_CHARS {
            return Err(CoreError::SuspensionReasonTooLong(chars));
        }
    }
    Ok(())
}
