//! Shared utilities and common types for the AItrify portal backend.
//!
//! This crate provides the credential engine used across all other crates:
//! - Random token generation and constant-time comparison
//! - Password hashing with PBKDF2-HMAC-SHA256
//! - HS256 session tokens
//! - Registration input validation (email shape, personal domains, password rules)

pub mod crypto;
pub mod jwt;
pub mod password;
pub mod validation;
