//! Persistence layer for the spend cap backend.
//!
//! This crate contains:
//! - Database connection management and migrations
//! - Entity definitions (database row mappings)
//! - Repository implementations of the domain collaborator traits

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
