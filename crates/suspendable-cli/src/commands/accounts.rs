use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use crate::util::{
    format_optional_timestamp, format_timestamp, normalize_optional_value, now_utc,
    resolve_account,
};
use anyhow::Result;
use clap::Args;
use suspendable_core::dto::AccountDto;
use suspendable_core::rules::SuspensionState;
use suspendable_store::repo::{AccountNew, AccountUpdate};

#[derive(Debug, Args)]
pub struct AddAccountArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Debug, Args)]
pub struct EditAccountArgs {
    /// Account id or email
    pub account: String,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    /// Replace the suspension reason; validated like any other field
    #[arg(long)]
    pub reason: Option<String>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Account id or email
    pub account: String,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// active, pending or suspended
    #[arg(long)]
    pub state: Option<SuspensionState>,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Account id or email
    pub account: String,
}

pub fn add_account(ctx: &Context<'_>, args: AddAccountArgs) -> Result<()> {
    let now = now_utc();
    let account = ctx.accounts().create(
        now,
        AccountNew {
            email: args.email,
            display_name: args.name,
        },
    )?;

    if ctx.json {
        print_json(&AccountDto::from_account(&account, now))?;
    } else {
        println!("created {} {}", account.id, account.email);
    }
    Ok(())
}

pub fn edit_account(ctx: &Context<'_>, args: EditAccountArgs) -> Result<()> {
    let now = now_utc();
    let account = resolve_account(ctx, &args.account)?;
    let update = AccountUpdate {
        email: args.email,
        display_name: args.name.map(normalize_optional_value),
        suspended_at: None,
        suspension_reason: args.reason.map(normalize_optional_value),
    };
    if update_is_empty(&update) {
        return Err(invalid_input("no updates provided"));
    }

    let account = ctx.accounts().update(now, account.id, update)?;
    if ctx.json {
        print_json(&AccountDto::from_account(&account, now))?;
    } else {
        println!("updated {} {}", account.id, account.email);
    }
    Ok(())
}

pub fn show_account(ctx: &Context<'_>, args: ShowArgs) -> Result<()> {
    let now = now_utc();
    let account = resolve_account(ctx, &args.account)?;
    let dto = AccountDto::from_account(&account, now);
    if ctx.json {
        return print_json(&dto);
    }

    let zone = ctx.zone;
    println!("id: {}", dto.id);
    println!("email: {}", dto.email);
    if let Some(name) = dto.display_name.as_deref() {
        println!("name: {}", name);
    }
    println!("state: {}", dto.state);
    println!(
        "suspended_at: {}",
        format_optional_timestamp(dto.suspended_at, zone)
    );
    if let Some(reason) = dto.suspension_reason.as_deref() {
        println!("suspension_reason: {}", reason);
    }
    println!("created_at: {}", format_timestamp(dto.created_at, zone));
    println!("updated_at: {}", format_timestamp(dto.updated_at, zone));
    Ok(())
}

pub fn list_accounts(ctx: &Context<'_>, args: ListArgs) -> Result<()> {
    let now = now_utc();
    let accounts = ctx.accounts().list(now, args.state)?;
    let items: Vec<AccountDto> = accounts
        .iter()
        .map(|account| AccountDto::from_account(account, now))
        .collect();

    if ctx.json {
        return print_json(&items);
    }

    let zone = ctx.zone;
    for item in items {
        match item.state {
            SuspensionState::Active => println!("{}  {}  active", item.id, item.email),
            state => println!(
                "{}  {}  {} ({})",
                item.id,
                item.email,
                state,
                format_optional_timestamp(item.suspended_at, zone)
            ),
        }
    }
    Ok(())
}

pub fn delete_account(ctx: &Context<'_>, args: DeleteArgs) -> Result<()> {
    let account = resolve_account(ctx, &args.account)?;
    ctx.accounts().delete(account.id)?;
    if ctx.json {
        print_json(&serde_json::json!({ "deleted": account.id }))?;
    } else {
        println!("deleted {} {}", account.id, account.email);
    }
    Ok(())
}

fn update_is_empty(update: &AccountUpdate) -> bool {
    update.email.is_none()
        && update.display_name.is_none()
        && update.suspended_at.is_none()
        && update.suspension_reason.is_none()
}
