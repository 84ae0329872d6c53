use chrono::{DateTime, Duration, TimeZone, Utc};
use suspendable_core::domain::{Account, AccountId};
use suspendable_core::rules::{
    AuthenticationEligibility, BaseEligibility, InactiveReason, SuspensionAware, SuspensionState,
    MAX_SUSPENSION_REASON_CHARS,
};
use suspendable_core::CoreError;
use suspendable_store::error::StoreError;
use suspendable_store::repo::{AccountNew, AccountUpdate};
use suspendable_store::Store;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 1, 15, 12, 0, 0).unwrap()
}

fn store_with_account() -> (Store, AccountId) {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    let account = store
        .accounts()
        .create(
            now() - Duration::days(30),
            AccountNew {
                email: "ada@example.com".to_string(),
                display_name: Some("Ada".to_string()),
            },
        )
        .expect("create account");
    (store, account.id)
}

fn load(store: &Store, id: AccountId) -> Account {
    store
        .accounts()
        .get(id)
        .expect("get account")
        .expect("account exists")
}

#[test]
fn suspend_with_reason_takes_effect() {
    let (store, id) = store_with_account();
    let account = store
        .accounts()
        .suspend(now(), id, Some("policy violation".to_string()), None)
        .expect("suspend");
    assert_eq!(account.suspended_at, Some(now()));
    assert_eq!(
        account.suspension_reason.as_deref(),
        Some("policy violation")
    );

    let later = now() + Duration::seconds(1);
    let stored = load(&store, id);
    assert_eq!(stored, account);
    assert!(stored.is_suspended(later));
    assert!(!stored.is_suspension_pending(later));
}

#[test]
fn suspend_in_future_is_pending() {
    let (store, id) = store_with_account();
    store
        .accounts()
        .suspend(now(), id, None, Some(now() + Duration::hours(1)))
        .expect("suspend");

    let stored = load(&store, id);
    assert!(stored.is_suspension_pending(now()));
    assert!(!stored.is_suspended(now()));
    assert!(stored.suspension_reason.is_none());
    assert!(stored.is_suspended(now() + Duration::hours(2)));
}

#[test]
fn second_suspend_is_a_noop_without_write() {
    let (store, id) = store_with_account();
    let first = store
        .accounts()
        .suspend(now(), id, Some("spam".to_string()), None)
        .expect("first suspend");

    let later = now() + Duration::minutes(5);
    let second = store
        .accounts()
        .suspend(later, id, Some("other".to_string()), Some(later))
        .expect("second suspend");
    assert_eq!(second, first);

    let stored = load(&store, id);
    assert_eq!(stored, first);
    assert_eq!(stored.updated_at, now());
}

#[test]
fn suspend_while_pending_overwrites_schedule() {
    let (store, id) = store_with_account();
    store
        .accounts()
        .suspend(
            now(),
            id,
            Some("first".to_string()),
            Some(now() + Duration::days(7)),
        )
        .expect("schedule");
    let replacement = now() + Duration::days(1);
    store
        .accounts()
        .suspend(now(), id, Some("second".to_string()), Some(replacement))
        .expect("reschedule");

    let stored = load(&store, id);
    assert_eq!(stored.suspended_at, Some(replacement));
    assert_eq!(stored.suspension_reason.as_deref(), Some("second"));
}

#[test]
fn suspend_sanitizes_reason() {
    let (store, id) = store_with_account();
    store
        .accounts()
        .suspend(now(), id, Some("  spam  ".to_string()), None)
        .expect("suspend");
    assert_eq!(load(&store, id).suspension_reason.as_deref(), Some("spam"));

    let (store, id) = store_with_account();
    store
        .accounts()
        .suspend(now(), id, Some("   ".to_string()), None)
        .expect("suspend");
    let stored = load(&store, id);
    assert!(stored.suspended_at.is_some());
    assert!(stored.suspension_reason.is_none());
}

#[test]
fn suspend_accepts_overlong_reason() {
    let (store, id) = store_with_account();
    let reason = "x".repeat(MAX_SUSPENSION_REASON_CHARS + 50);
    store
        .accounts()
        .suspend(now(), id, Some(reason.clone()), None)
        .expect("privileged suspend");
    assert_eq!(load(&store, id).suspension_reason, Some(reason.clone()));

    let err = store
        .accounts()
        .update(
            now(),
            id,
            AccountUpdate {
                display_name: Some(Some("Ada L".to_string())),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Core(CoreError::SuspensionReasonTooLong(300))
    ));
}

#[test]
fn suspend_succeeds_when_other_fields_are_invalid() {
    let (store, id) = store_with_account();
    store
        .connection()
        .execute(
            "UPDATE accounts SET email = 'not-an-email' WHERE id = ?1;",
            [id.to_string()],
        )
        .expect("corrupt email");

    store
        .accounts()
        .suspend(now(), id, Some("fraud".to_string()), None)
        .expect("suspend despite invalid email");
    store
        .accounts()
        .unsuspend(now() + Duration::hours(1), id)
        .expect("unsuspend despite invalid email");
    assert!(load(&store, id).suspended_at.is_none());
}

#[test]
fn unsuspend_clears_suspension() {
    let (store, id) = store_with_account();
    store
        .accounts()
        .suspend(now(), id, Some("spam".to_string()), None)
        .expect("suspend");

    let later = now() + Duration::hours(1);
    let account = store.accounts().unsuspend(later, id).expect("unsuspend");
    assert!(!account.is_suspended(later));
    assert!(!account.is_suspension_pending(later));

    let stored = load(&store, id);
    assert!(stored.suspended_at.is_none());
    assert!(stored.suspension_reason.is_none());
    assert_eq!(stored.updated_at, later);
}

#[test]
fn unsuspend_cancels_pending_suspension() {
    let (store, id) = store_with_account();
    store
        .accounts()
        .suspend(now(), id, Some("later".to_string()), Some(now() + Duration::days(1)))
        .expect("schedule");

    store.accounts().unsuspend(now(), id).expect("unsuspend");
    let stored = load(&store, id);
    assert_eq!(stored.suspension_state(now()), SuspensionState::Active);
    assert!(stored.suspended_at.is_none());
}

#[test]
fn unsuspend_active_account_writes_nothing() {
    let (store, id) = store_with_account();
    let before = load(&store, id);
    let account = store
        .accounts()
        .unsuspend(now(), id)
        .expect("unsuspend");
    assert_eq!(account, before);
    assert_eq!(load(&store, id).updated_at, before.updated_at);
}

#[test]
fn direct_update_cannot_leave_orphan_reason() {
    let (store, id) = store_with_account();
    let account = store
        .accounts()
        .update(
            now(),
            id,
            AccountUpdate {
                suspension_reason: Some(Some("left".to_string())),
                ..Default::default()
            },
        )
        .expect("update");
    assert!(account.suspension_reason.is_none());
    assert!(load(&store, id).suspension_reason.is_none());

    let at = now() - Duration::minutes(1);
    let account = store
        .accounts()
        .update(
            now(),
            id,
            AccountUpdate {
                suspended_at: Some(Some(at)),
                suspension_reason: Some(Some(" left the company ".to_string())),
                ..Default::default()
            },
        )
        .expect("update");
    assert_eq!(account.suspension_reason.as_deref(), Some("left the company"));
    assert!(account.is_suspended(now()));
}

#[test]
fn list_filters_by_state() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    let create = |email: &str| {
        store
            .accounts()
            .create(
                now(),
                AccountNew {
                    email: email.to_string(),
                    display_name: None,
                },
            )
            .expect("create")
    };
    let active = create("active@example.com");
    let pending = create("pending@example.com");
    let suspended = create("suspended@example.com");
    store
        .accounts()
        .suspend(now(), pending.id, None, Some(now() + Duration::days(1)))
        .expect("schedule");
    store
        .accounts()
        .suspend(now(), suspended.id, None, Some(now() - Duration::days(1)))
        .expect("suspend");

    let ids = |state| -> Vec<AccountId> {
        store
            .accounts()
            .list(now(), state)
            .expect("list")
            .into_iter()
            .map(|account| account.id)
            .collect()
    };
    assert_eq!(ids(None), vec![active.id, pending.id, suspended.id]);
    assert_eq!(ids(Some(SuspensionState::Active)), vec![active.id]);
    assert_eq!(ids(Some(SuspensionState::Pending)), vec![pending.id]);
    assert_eq!(ids(Some(SuspensionState::Suspended)), vec![suspended.id]);
}

#[test]
fn eligibility_follows_stored_state() {
    let (store, id) = store_with_account();
    let policy = SuspensionAware::new(BaseEligibility);

    store
        .accounts()
        .suspend(now(), id, None, Some(now() + Duration::hours(1)))
        .expect("schedule");
    let account = load(&store, id);
    assert!(policy.active_for_authentication(&account, now()));

    let after = now() + Duration::hours(2);
    assert!(!policy.active_for_authentication(&account, after));
    assert_eq!(
        policy.inactive_message(&account, after),
        InactiveReason::Suspended
    );

    let account = store.accounts().unsuspend(after, id).expect("unsuspend");
    assert!(policy.active_for_authentication(&account, after));
}
