use crate::domain::email::validate_email;
use crate::domain::ids::AccountId;
use crate::error::CoreError;
use crate::rules::suspension::{
    self, sanitize_suspension_reason, validate_suspension_reason, SuspensionState,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub suspended_at: Option<DateTime<Utc>>,
    pub suspension_reason: Option<String>,
}

impl Account {
    pub fn new(now: DateTime<Utc>, email: String, display_name: Option<String>) -> Self {
        Self {
            id: AccountId::new(),
            email,
            display_name,
            created_at: now,
            updated_at: now,
            suspended_at: None,
            suspension_reason: None,
        }
    }

    /// Standard validation rules, skipped by privileged writes.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_email(&self.email)?;
        validate_suspension_reason(self.suspension_reason.as_deref())?;
        Ok(())
    }

    /// Normalizes the suspension reason. Must run before every write.
    pub fn sanitize(&mut self) {
        let reason = self.suspension_reason.take();
        self.suspension_reason = sanitize_suspension_reason(self.suspended_at, reason);
    }

    pub fn suspension_state(&self, now: DateTime<Utc>) -> SuspensionState {
        suspension::suspension_state(now, self.suspended_at)
    }

    pub fn is_suspended(&self, now: DateTime<Utc>) -> bool {
        suspension::is_suspended(now, self.suspended_at)
    }

    pub fn is_suspension_pending(&self, now: DateTime<Utc>) -> bool {
        suspension::is_suspension_pending(now, self.suspended_at)
    }

    /// Schedules or applies a suspension.
    ///
    /// Returns `false` without touching the record when the account is already
    /// suspended. Otherwise overwrites both fields, including a pending
    /// suspension, and returns `true`: the caller must persist the record even
    /// if nothing changed.
    pub fn suspend(
        &mut self,
        now: DateTime<Utc>,
        reason: Option<String>,
        effective_at: Option<DateTime<Utc>>,
    ) -> bool {
        if self.is_suspended(now) {
            return false;
        }
        self.suspended_at = Some(effective_at.unwrap_or(now));
        self.suspension_reason = reason;
        true
    }

    /// Lifts an in-effect or pending suspension.
    ///
    /// Returns `true` only when the record changed and needs a write.
    pub fn unsuspend(&mut self, now: DateTime<Utc>) -> bool {
        if !(self.is_suspended(now) || self.is_suspension_pending(now)) {
            return false;
        }
        let changed = self.suspended_at.is_some() || self.suspension_reason.is_some();
        self.suspended_at = None;
        self.suspension_reason = None;
        changed
    }
}
