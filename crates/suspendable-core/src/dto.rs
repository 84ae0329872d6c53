use crate::domain::{Account, AccountId};
use crate::rules::{AuthenticationEligibility, InactiveReason, SuspensionState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDto {
    pub id: AccountId,
    pub email: String,
    pub display_name: Option<String>,
    pub state: SuspensionState,
    pub suspended_at: Option<DateTime<Utc>>,
    pub suspension_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountDto {
    pub fn from_account(account: &Account, now: DateTime<Utc>) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            display_name: account.display_name.clone(),
            state: account.suspension_state(now),
            suspended_at: account.suspended_at,
            suspension_reason: account.suspension_reason.clone(),
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCheckDto {
    pub id: AccountId,
    pub active_for_authentication: bool,
    pub inactive_message: Option<InactiveReason>,
}

impl AuthCheckDto {
    pub fn evaluate<E: AuthenticationEligibility>(
        policy: &E,
        account: &Account,
        now: DateTime<Utc>,
    ) -> Self {
        let active = policy.active_for_authentication(account, now);
        Self {
            id: account.id,
            active_for_authentication: active,
            inactive_message: (!active).then(|| policy.inactive_message(account, now)),
        }
    }
}
