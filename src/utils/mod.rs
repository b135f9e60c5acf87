//! Utility functions shared across layers.
//!
//! - [`password`] - argon2id hashing and verification
//! - [`random`] - URL-safe random tokens
//! - [`dates`] - Lenient date parsing for query strings and bodies

pub mod dates;
pub mod password;
pub mod random;
