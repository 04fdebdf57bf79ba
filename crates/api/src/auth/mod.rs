//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- HS256 access-token generation and validation.
//! - [`service`] -- login, registration and token verification against the
//!   user store.

pub mod jwt;
pub mod password;
pub mod service;
