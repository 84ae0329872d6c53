use anyhow::Result;
use serde::Serialize;
use std::io::{self, Write};
use suspendable_core::time::Zone;
use suspendable_store::repo::AccountsRepo;
use suspendable_store::Store;

pub mod accounts;
pub mod suspension;

/// Shared state for one command invocation.
pub struct Context<'a> {
    pub store: &'a Store,
    pub json: bool,
    /// Zone used to read `--at` values and to print timestamps.
    pub zone: Zone,
}

impl<'a> Context<'a> {
    pub fn new(store: &'a Store, json: bool, zone: Zone) -> Self {
        Self { store, json, zone }
    }

    pub fn accounts(&self) -> AccountsRepo<'a> {
        self.store.accounts()
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
