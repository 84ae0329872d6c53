use crate::commands::Context;
use crate::error::not_found;
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use std::str::FromStr;
use suspendable_core::domain::{Account, AccountId};
use suspendable_core::time::{self, Zone};

pub fn now_utc() -> DateTime<Utc> {
    time::now_utc()
}

pub fn parse_timestamp(input: &str, zone: Zone) -> Result<DateTime<Utc>> {
    Ok(time::parse_timestamp(input, zone)?)
}

pub fn format_timestamp(ts: DateTime<Utc>, zone: Zone) -> String {
    time::format_timestamp(ts, zone)
}

pub fn format_optional_timestamp(ts: Option<DateTime<Utc>>, zone: Zone) -> String {
    ts.map(|value| format_timestamp(value, zone))
        .unwrap_or_else(|| "-".to_string())
}

/// Accepts either an account id or an email address.
pub fn resolve_account(ctx: &Context<'_>, raw: &str) -> Result<Account> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("account id or email cannot be empty"));
    }
    let found = match AccountId::from_str(trimmed) {
        Ok(id) => ctx.accounts().get(id)?,
        Err(_) => ctx.accounts().get_by_email(trimmed)?,
    };
    found.ok_or_else(|| not_found(format!("account {}", trimmed)))
}

pub fn normalize_optional_value(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
