mod commands;
mod error;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{accounts, suspension, Context};
use crate::error::{exit_code_for, report_error};
use suspendable_config as config;
use suspendable_store::{paths, Store};

#[derive(Debug, Parser)]
#[command(name = "suspendable", version, about = "Suspend and reactivate accounts")]
struct Cli {
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(name = "add-account")]
    AddAccount(accounts::AddAccountArgs),
    #[command(name = "edit-account")]
    EditAccount(accounts::EditAccountArgs),
    Show(accounts::ShowArgs),
    List(accounts::ListArgs),
    Delete(accounts::DeleteArgs),
    /// Suspend an account now or at a later time
    Suspend(suspension::SuspendArgs),
    /// Lift an active or scheduled suspension
    Unsuspend(suspension::UnsuspendArgs),
    /// Report whether the account may currently sign in
    #[command(name = "check-auth")]
    CheckAuth(suspension::CheckAuthArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        db_path,
        config: config_path,
        json,
        verbose,
        command,
    } = cli;

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    if verbose {
        match config::resolve_config_path(config_path) {
            Ok(path) => {
                if path.exists() {
                    debug!(path = %path.display(), "config resolved");
                } else {
                    debug!(path = %path.display(), "config missing, using defaults");
                }
            }
            Err(err) => {
                debug!(error = %err, "config unavailable");
            }
        }
        debug!(time_zone = %app_config.time_zone, "time zone selected");
    }

    let db_path = paths::resolve_db_path(db_path).with_context(|| "resolve database path")?;
    debug!(path = %db_path.display(), "database path resolved");

    let store = Store::open_migrated(&db_path)
        .with_context(|| format!("open database {}", db_path.display()))?;

    let ctx = Context::new(&store, json, app_config.time_zone);

    match command {
        Command::AddAccount(args) => accounts::add_account(&ctx, args),
        Command::EditAccount(args) => accounts::edit_account(&ctx, args),
        Command::Show(args) => accounts::show_account(&ctx, args),
        Command::List(args) => accounts::list_accounts(&ctx, args),
        Command::Delete(args) => accounts::delete_account(&ctx, args),
        Command::Suspend(args) => suspension::suspend_account(&ctx, args),
        Command::Unsuspend(args) => suspension::unsuspend_account(&ctx, args),
        Command::CheckAuth(args) => suspension::check_auth(&ctx, args),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}
