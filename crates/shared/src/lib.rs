//! Shared utilities and common types for the spend cap backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Cryptographic utilities (API key hashing)
//! - Price formatting for customer-facing notices
//! - Validation of the spend-limit profile fields

pub mod crypto;
pub mod money;
pub mod validation;
