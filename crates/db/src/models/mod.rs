//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for patches, where edits exist

pub mod asset;
pub mod category;
pub mod collection;
pub mod section;
pub mod stats;
pub mod tag;
pub mod user;
