use crate::commands::{print_json, Context};
use crate::util::{format_optional_timestamp, now_utc, parse_timestamp, resolve_account};
use anyhow::{Context as _, Result};
use clap::Args;
use suspendable_core::dto::{AccountDto, AuthCheckDto};
use suspendable_core::rules::{BaseEligibility, SuspensionAware, SuspensionState};
use tracing::debug;

#[derive(Debug, Args)]
pub struct SuspendArgs {
    /// Account id or email
    pub account: String,
    #[arg(long)]
    pub reason: Option<String>,
    /// When the suspension takes effect (defaults to now)
    #[arg(long, value_name = "TIME")]
    pub at: Option<String>,
}

#[derive(Debug, Args)]
pub struct UnsuspendArgs {
    /// Account id or email
    pub account: String,
}

#[derive(Debug, Args)]
pub struct CheckAuthArgs {
    /// Account id or email
    pub account: String,
}

pub fn suspend_account(ctx: &Context<'_>, args: SuspendArgs) -> Result<()> {
    let now = now_utc();
    let effective_at = match args.at.as_deref() {
        Some(raw) => Some(
            parse_timestamp(raw, ctx.zone)
                .with_context(|| format!("parse --at value {:?}", raw))?,
        ),
        None => None,
    };
    let account = resolve_account(ctx, &args.account)?;
    let account = ctx
        .accounts()
        .suspend(now, account.id, args.reason, effective_at)?;
    debug!(account = %account.id, "suspend command finished");

    let dto = AccountDto::from_account(&account, now_utc());
    if ctx.json {
        return print_json(&dto);
    }
    let at = format_optional_timestamp(dto.suspended_at, ctx.zone);
    match dto.state {
        SuspensionState::Pending => println!("suspension of {} scheduled for {}", dto.email, at),
        _ => println!("suspended {} since {}", dto.email, at),
    }
    Ok(())
}

pub fn unsuspend_account(ctx: &Context<'_>, args: UnsuspendArgs) -> Result<()> {
    let now = now_utc();
    let account = resolve_account(ctx, &args.account)?;
    let account = ctx.accounts().unsuspend(now, account.id)?;

    let dto = AccountDto::from_account(&account, now);
    if ctx.json {
        return print_json(&dto);
    }
    println!("{} is {}", dto.email, dto.state);
    Ok(())
}

pub fn check_auth(ctx: &Context<'_>, args: CheckAuthArgs) -> Result<()> {
    let now = now_utc();
    let account = resolve_account(ctx, &args.account)?;
    let policy = SuspensionAware::new(BaseEligibility);
    let check = AuthCheckDto::evaluate(&policy, &account, now);

    if ctx.json {
        return print_json(&check);
    }
    match check.inactive_message.as_ref() {
        None => println!("{} may sign in", account.email),
        Some(reason) => println!("{} may not sign in: {}", account.email, reason.as_str()),
    }
    Ok(())
}
