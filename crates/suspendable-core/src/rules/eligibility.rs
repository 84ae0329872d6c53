//! Hooks consumed by an authentication pipeline to decide whether an account
//! may sign in, and why not.

use crate::domain::Account;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InactiveReason {
    Inactive,
    Suspended,
    Other(String),
}

impl InactiveReason {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Inactive => "inactive",
            Self::Suspended => "suspended",
            Self::Other(label) => label,
        }
    }
}

pub trait AuthenticationEligibility {
    fn active_for_authentication(&self, _account: &Account, _now: DateTime<Utc>) -> bool {
        true
    }

    fn inactive_message(&self, _account: &Account, _now: DateTime<Utc>) -> InactiveReason {
        InactiveReason::Inactive
    }
}

/// Host default: every account may authenticate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseEligibility;

impl AuthenticationEligibility for BaseEligibility {}

/// Refuses accounts whose suspension is in effect and defers everything else
/// to the wrapped capability. Pending suspensions do not block sign-in.
#[derive(Debug, Clone, Default)]
pub struct SuspensionAware<E> {
    inner: E,
}

impl<E: AuthenticationEligibility> SuspensionAware<E> {
    pub fn new(inner: E) -> Self {
        Self { inner }
    }
}

impl<E: AuthenticationEligibility> AuthenticationEligibility for SuspensionAware<E> {
    fn active_for_authentication(&self, account: &Account, now: DateTime<Utc>) -> bool {
        self.inner.active_for_authentication(account, now) && !account.is_suspended(now)
    }

    fn inactive_message(&self, account: &Account, now: DateTime<Utc>) -> InactiveReason {
        if account.is_suspended(now) {
            InactiveReason::Suspended
        } else {
            self.inner.inactive_message(account, now)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthenticationEligibility, BaseEligibility, InactiveReason, SuspensionAware};
    use crate::domain::Account;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    struct Unconfirmed;

    impl AuthenticationEligibility for Unconfirmed {
        fn active_for_authentication(&self, _account: &Account, _now: DateTime<Utc>) -> bool {
            false
        }

        fn inactive_message(&self, _account: &Account, _now: DateTime<Utc>) -> InactiveReason {
            InactiveReason::Other("unconfirmed".to_string())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 15, 12, 0, 0).unwrap()
    }

    fn account_suspended_at(at: Option<DateTime<Utc>>) -> Account {
        let mut account = Account::new(now(), "ada@example.com".to_string(), None);
        account.suspended_at = at;
        account
    }

    #[test]
    fn base_allows_everyone() {
        let account = account_suspended_at(Some(now() - Duration::days(1)));
        assert!(BaseEligibility.active_for_authentication(&account, now()));
        assert_eq!(
            BaseEligibility.inactive_message(&account, now()),
            InactiveReason::Inactive
        );
    }

    #[test]
    fn suspended_account_is_refused() {
        let policy = SuspensionAware::new(BaseEligibility);
        let account = account_suspended_at(Some(now() - Duration::minutes(5)));
        assert!(!policy.active_for_authentication(&account, now()));
        assert_eq!(
            policy.inactive_message(&account, now()),
            InactiveReason::Suspended
        );
    }

    #[test]
    fn pending_suspension_does_not_block() {
        let policy = SuspensionAware::new(BaseEligibility);
        let account = account_suspended_at(Some(now() + Duration::hours(1)));
        assert!(policy.active_for_authentication(&account, now()));
        assert_eq!(
            policy.inactive_message(&account, now()),
            InactiveReason::Inactive
        );
    }

    #[test]
    fn inner_refusal_is_preserved() {
        let policy = SuspensionAware::new(Unconfirmed);
        let active = account_suspended_at(None);
        assert!(!policy.active_for_authentication(&active, now()));
        assert_eq!(
            policy.inactive_message(&active, now()).as_str(),
            "unconfirmed"
        );

        let suspended = account_suspended_at(Some(now() - Duration::seconds(1)));
        assert_eq!(
            policy.inactive_message(&suspended, now()),
            InactiveReason::Suspended
        );
    }
}
