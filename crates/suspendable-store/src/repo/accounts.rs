use crate::error::{Result, StoreError};
use chrono::{DateTime, SubsecRound, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use std::str::FromStr;
use suspendable_core::domain::{normalize_email, Account, AccountId};
use suspendable_core::rules::SuspensionState;
use tracing::{debug, info};

const ACCOUNT_COLUMNS: &str =
    "id, email, display_name, created_at, updated_at, suspended_at, suspension_reason";

/// Timestamps are stored as microseconds since the epoch.
const STORED_SUBSEC_DIGITS: u16 = 6;

#[derive(Debug, Clone)]
pub struct AccountNew {
    pub email: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub email: Option<String>,
    pub display_name: Option<Option<String>>,
    pub suspended_at: Option<Option<DateTime<Utc>>>,
    pub suspension_reason: Option<Option<String>>,
}

/// How a write treats the standard validation rules. Sanitization runs in
/// both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    Validated,
    /// Skips validation so suspension changes cannot be blocked by
    /// unrelated invalid fields.
    Privileged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteOp {
    Insert,
    Update,
}

pub struct AccountsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> AccountsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn create(&self, now: DateTime<Utc>, input: AccountNew) -> Result<Account> {
        let email = normalize_email(&input.email).unwrap_or_default();
        if find_id_by_email(self.conn, &email)?.is_some() {
            return Err(StoreError::DuplicateEmail(email));
        }
        let display_name = input.display_name.and_then(normalize_optional);
        let mut account = Account::new(now, email, display_name);
        write_account(
            self.conn,
            now,
            &mut account,
            SaveMode::Validated,
            WriteOp::Insert,
        )?;
        Ok(account)
    }

    pub fn get(&self, id: AccountId) -> Result<Option<Account>> {
        get_inner(self.conn, id)
    }

    pub fn get_by_email(&self, email: &str) -> Result<Option<Account>> {
        let Some(email) = normalize_email(email) else {
            return Ok(None);
        };
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = ?1;"
        ))?;
        let mut rows = stmt.query([email])?;
        match rows.next()? {
            Some(row) => Ok(Some(account_from_row(row)?)),
            None => Ok(None),
        }
    }

    /// Lists accounts ordered by email, optionally narrowed to one
    /// suspension state as of `now`.
    pub fn list(
        &self,
        now: DateTime<Utc>,
        state: Option<SuspensionState>,
    ) -> Result<Vec<Account>> {
        let condition = match state {
            None => "1 = 1",
            Some(SuspensionState::Active) => "(suspended_at IS NULL OR suspended_at = ?1)",
            Some(SuspensionState::Pending) => "suspended_at > ?1",
            Some(SuspensionState::Suspended) => "suspended_at < ?1",
        };
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE {condition} ORDER BY email ASC;"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = if state.is_some() {
            stmt.query([to_micros(now)])?
        } else {
            stmt.query([])?
        };
        let mut accounts = Vec::new();
        while let Some(row) = rows.next()? {
            accounts.push(account_from_row(row)?);
        }
        Ok(accounts)
    }

    /// Applies `update` through the validated save path.
    pub fn update(
        &self,
        now: DateTime<Utc>,
        id: AccountId,
        update: AccountUpdate,
    ) -> Result<Account> {
        if self.conn.is_autocommit() {
            let tx = self.conn.unchecked_transaction()?;
            let account = update_inner(&tx, now, id, update)?;
            tx.commit()?;
            Ok(account)
        } else {
            update_inner(self.conn, now, id, update)
        }
    }

    /// Writes an existing account. Sanitization always runs; validation only
    /// in [`SaveMode::Validated`].
    pub fn save(&self, now: DateTime<Utc>, account: &mut Account, mode: SaveMode) -> Result<()> {
        write_account(self.conn, now, account, mode, WriteOp::Update)
    }

    /// Suspends the account as of `effective_at` (default `now`).
    ///
    /// Does nothing if the suspension is already in effect. A pending
    /// suspension is replaced. The check and the privileged write share one
    /// transaction.
    pub fn suspend(
        &self,
        now: DateTime<Utc>,
        id: AccountId,
        reason: Option<String>,
        effective_at: Option<DateTime<Utc>>,
    ) -> Result<Account> {
        if self.conn.is_autocommit() {
            let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
            let account = suspend_inner(&tx, now, id, reason, effective_at)?;
            tx.commit()?;
            Ok(account)
        } else {
            suspend_inner(self.conn, now, id, reason, effective_at)
        }
    }

    /// Lifts an in-effect or pending suspension. Writes only when the record
    /// changed.
    pub fn unsuspend(&self, now: DateTime<Utc>, id: AccountId) -> Result<Account> {
        if self.conn.is_autocommit() {
            let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
            let account = unsuspend_inner(&tx, now, id)?;
            tx.commit()?;
            Ok(account)
        } else {
            unsuspend_inner(self.conn, now, id)
        }
    }

    pub fn delete(&self, id: AccountId) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM accounts WHERE id = ?1;", [id.to_string()])?;
        if deleted == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

fn get_inner(conn: &Connection, id: AccountId) -> Result<Option<Account>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?1;"
    ))?;
    let mut rows = stmt.query([id.to_string()])?;
    match rows.next()? {
        Some(row) => Ok(Some(account_from_row(row)?)),
        None => Ok(None),
    }
}

fn require_account(conn: &Connection, id: AccountId) -> Result<Account> {
    get_inner(conn, id)?.ok_or_else(|| StoreError::NotFound(id.to_string()))
}

fn update_inner(
    conn: &Connection,
    now: DateTime<Utc>,
    id: AccountId,
    update: AccountUpdate,
) -> Result<Account> {
    let mut account = require_account(conn, id)?;

    if let Some(value) = update.email {
        let email = normalize_email(&value).unwrap_or_default();
        if let Some(existing_id) = find_id_by_email(conn, &email)? {
            if existing_id != account.id {
                return Err(StoreError::DuplicateEmail(email));
            }
        }
        account.email = email;
    }
    if let Some(value) = update.display_name {
        account.display_name = value.and_then(normalize_optional);
    }
    if let Some(value) = update.suspended_at {
        account.suspended_at = value;
    }
    if let Some(value) = update.suspension_reason {
        account.suspension_reason = value;
    }

    write_account(conn, now, &mut account, SaveMode::Validated, WriteOp::Update)?;
    Ok(account)
}

fn suspend_inner(
    conn: &Connection,
    now: DateTime<Utc>,
    id: AccountId,
    reason: Option<String>,
    effective_at: Option<DateTime<Utc>>,
) -> Result<Account> {
    let mut account = require_account(conn, id)?;
    if !account.suspend(now, reason, effective_at) {
        debug!(account = %account.id, "account already suspended, skipping");
        return Ok(account);
    }
    write_account(conn, now, &mut account, SaveMode::Privileged, WriteOp::Update)?;
    if let Some(at) = account.suspended_at {
        info!(
            account = %account.id,
            suspended_at = %at.to_rfc3339(),
            pending = at > now,
            "account suspension recorded"
        );
    }
    Ok(account)
}

fn unsuspend_inner(conn: &Connection, now: DateTime<Utc>, id: AccountId) -> Result<Account> {
    let mut account = require_account(conn, id)?;
    if !account.unsuspend(now) {
        debug!(account = %account.id, "account not suspended, skipping");
        return Ok(account);
    }
    write_account(conn, now, &mut account, SaveMode::Privileged, WriteOp::Update)?;
    info!(account = %account.id, "account suspension lifted");
    Ok(account)
}

/// The single write path for accounts.
fn write_account(
    conn: &Connection,
    now: DateTime<Utc>,
    account: &mut Account,
    mode: SaveMode,
    op: WriteOp,
) -> Result<()> {
    account.sanitize();
    if mode == SaveMode::Validated {
        account.validate()?;
    }
    account.updated_at = now;
    truncate_to_stored_precision(account);

    match op {
        WriteOp::Insert => {
            conn.execute(
                "INSERT INTO accounts (id, email, display_name, created_at, updated_at, suspended_at, suspension_reason)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
                params![
                    account.id.to_string(),
                    account.email,
                    account.display_name,
                    to_micros(account.created_at),
                    to_micros(account.updated_at),
                    account.suspended_at.map(to_micros),
                    account.suspension_reason,
                ],
            )?;
        }
        WriteOp::Update => {
            let updated = conn.execute(
                "UPDATE accounts SET email = ?2, display_name = ?3, updated_at = ?4, suspended_at = ?5, suspension_reason = ?6
                 WHERE id = ?1;",
                params![
                    account.id.to_string(),
                    account.email,
                    account.display_name,
                    to_micros(account.updated_at),
                    account.suspended_at.map(to_micros),
                    account.suspension_reason,
                ],
            )?;
            if updated == 0 {
                return Err(StoreError::NotFound(account.id.to_string()));
            }
        }
    }
    Ok(())
}

fn find_id_by_email(conn: &Connection, email: &str) -> Result<Option<AccountId>> {
    let id: Option<String> = conn
        .query_row("SELECT id FROM accounts WHERE email = ?1;", [email], |row| {
            row.get(0)
        })
        .optional()?;
    id.map(|raw| parse_account_id(&raw)).transpose()
}

fn truncate_to_stored_precision(account: &mut Account) {
    account.created_at = account.created_at.trunc_subsecs(STORED_SUBSEC_DIGITS);
    account.updated_at = account.updated_at.trunc_subsecs(STORED_SUBSEC_DIGITS);
    account.suspended_at = account
        .suspended_at
        .map(|at| at.trunc_subsecs(STORED_SUBSEC_DIGITS));
}

fn normalize_optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn to_micros(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_micros()
}

fn from_micros(value: i64) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_micros(value).ok_or(StoreError::InvalidTimestamp(value))
}

fn parse_account_id(raw: &str) -> Result<AccountId> {
    AccountId::from_str(raw).map_err(|_| StoreError::InvalidId(raw.to_string()))
}

fn account_from_row(row: &rusqlite::Row<'_>) -> Result<Account> {
    let id: String = row.get(0)?;
    let suspended_at: Option<i64> = row.get(5)?;
    Ok(Account {
        id: parse_account_id(&id)?,
        email: row.get(1)?,
        display_name: row.get(2)?,
        created_at: from_micros(row.get(3)?)?,
        updated_at: from_micros(row.get(4)?)?,
        suspended_at: suspended_at.map(from_micros).transpose()?,
        suspension_reason: row.get(6)?,
    })
}
