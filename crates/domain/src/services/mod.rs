//! Domain services for the spend cap backend.
//!
//! Services contain business logic that operates on domain models.

pub mod attributes;
pub mod checkout;
pub mod orders;
pub mod spend_window;

pub use attributes::{InMemoryAttributeStore, UserAttributeStore};
pub use checkout::{
    cap_message, over_limit_message, CheckoutDecision, CheckoutSection, Notice, NoticeLevel,
    QueryFailurePolicy, BLOCKED_SECTIONS, VERIFICATION_UNAVAILABLE_MESSAGE,
};
pub use orders::{InMemoryOrderStore, OrderQuery};
pub use spend_window::{
    calendar_window_start, shift_days, Evaluation, EvaluationResult, SpendWindowEvaluator,
    TimeRemaining,
};
