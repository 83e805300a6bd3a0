//! Persistence layer for the enterprise portal.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - PostgreSQL repositories implementing the domain store traits
//! - An in-memory store with the same uniqueness rules

pub mod db;
pub mod entities;
pub mod memory;
pub mod metrics;
pub mod repositories;

pub use memory::InMemoryStore;
pub use repositories::{AgentRepository, EnterpriseRepository};
