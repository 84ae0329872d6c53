pub mod accounts;

pub use accounts::{AccountNew, AccountUpdate, AccountsRepo, SaveMode};
