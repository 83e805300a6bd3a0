//! Domain layer for the AItrify enterprise portal backend.
//!
//! This crate contains:
//! - Domain models (Enterprise, AgentType, AgentInstance)
//! - Service seams for storage, CAPTCHA verification and email delivery
//! - Test doubles for those seams

pub mod models;
pub mod services;
