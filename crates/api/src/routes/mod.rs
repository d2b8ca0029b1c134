//! HTTP route handlers.

pub mod checkout;
pub mod health;
pub mod spend_limits;
