//! Domain models for the spend cap backend.

pub mod order;
pub mod spend_limit;

pub use order::{OrderRecord, OrderStatus, QUALIFYING_STATUSES};
pub use spend_limit::{
    SpendCapConfig, SpendLimitProfile, UpdateSpendLimitRequest, MAXIMUM_SPEND_AMOUNT_KEY,
    SPEND_LIMIT_PERIOD_KEY,
};
