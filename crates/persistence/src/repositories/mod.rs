//! Repository implementations for database operations.

pub mod api_key;
pub mod order;
pub mod user_attribute;

pub use api_key::ApiKeyRepository;
pub use order::OrderRepository;
pub use user_attribute::UserAttributeRepository;
