//! User roles and the route-level authorization policy.
//!
//! The string forms must match the `CHECK` constraint on `users.role` in
//! `20260301000001_create_users.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

pub const ROLE_ADMINISTRATOR: &str = "administrator";
pub const ROLE_JOURNALIST: &str = "journalist";
pub const ROLE_VIEWER: &str = "viewer";

/// Closed set of roles. Every `match` on this type is exhaustive, so adding a
/// role forces each visibility and authorization decision to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Administrator,
    Journalist,
    Viewer,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Administrator, Role::Journalist, Role::Viewer];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Administrator => ROLE_ADMINISTRATOR,
            Role::Journalist => ROLE_JOURNALIST,
            Role::Viewer => ROLE_VIEWER,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_ADMINISTRATOR => Ok(Role::Administrator),
            ROLE_JOURNALIST => Ok(Role::Journalist),
            ROLE_VIEWER => Ok(Role::Viewer),
            other => Err(CoreError::Validation(format!(
                "Unknown role '{other}'. Must be one of: administrator, journalist, viewer"
            ))),
        }
    }
}

/// Role sets used by route extractors.
pub const ADMIN_ONLY: &[Role] = &[Role::Administrator];
pub const CONTRIBUTORS: &[Role] = &[Role::Administrator, Role::Journalist];

/// Route-level gate: is `role` one of `required`?
pub fn authorize(role: Role, required: &[Role]) -> bool {
    required.contains(&role)
}

/// Whether `caller` may edit or delete an asset owned by `owner_id`.
///
/// Administrators may modify anything; everyone else only what they own.
pub fn can_modify(role: Role, caller_id: DbId, owner_id: DbId) -> bool {
    match role {
        Role::Administrator => true,
        Role::Journalist | Role::Viewer => caller_id == owner_id,
    }
}
