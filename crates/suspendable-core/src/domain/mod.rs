pub mod account;
pub mod email;
pub mod ids;

pub use account::Account;
pub use email::{normalize_email, validate_email};
pub use ids::AccountId;
