//! Domain layer for the spend cap backend.
//!
//! This crate contains:
//! - Domain models (SpendCapConfig, OrderRecord, OrderStatus)
//! - The collaborator traits for the attribute store and order query
//! - The rolling spend window evaluator and the checkout decision builder
//! - Domain error types

pub mod errors;
pub mod models;
pub mod services;
