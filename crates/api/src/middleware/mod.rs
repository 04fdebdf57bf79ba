//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the verified caller from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `administrator` role.
//! - [`rbac::RequireContributor`] -- Requires `journalist` or `administrator`.
//! - [`rbac::RequireAuth`] -- Requires any authenticated user.

pub mod auth;
pub mod rbac;
