//! Repository implementations for database operations.

pub mod agent;
pub mod enterprise;

pub use agent::AgentRepository;
pub use enterprise::EnterpriseRepository;
