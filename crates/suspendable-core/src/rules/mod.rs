pub mod eligibility;
pub mod suspension;

pub use eligibility::{
    AuthenticationEligibility, BaseEligibility, InactiveReason, SuspensionAware,
};
pub use suspension::{
    is_suspended, is_suspension_pending, sanitize_suspension_reason, suspension_state,
    validate_suspension_reason, SuspensionState, MAX_SUSPENSION_REASON_CHARS,
};
