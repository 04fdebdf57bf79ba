//! Domain logic for the media catalog.
//!
//! Everything here is pure: no database, no filesystem, no HTTP. The `db`
//! and `api` crates build on these types.

pub mod access;
pub mod association;
pub mod catalog;
pub mod error;
pub mod media;
pub mod roles;
pub mod types;
