//! Access levels and the row-visibility rule applied to every catalog read.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

pub const ACCESS_PUBLIC: &str = "public";
pub const ACCESS_RESTRICTED: &str = "restricted";
pub const ACCESS_CONFIDENTIAL: &str = "confidential";

/// Visibility tier of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    #[default]
    Public,
    Restricted,
    Confidential,
}

impl AccessLevel {
    pub const ALL: [AccessLevel; 3] = [
        AccessLevel::Public,
        AccessLevel::Restricted,
        AccessLevel::Confidential,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AccessLevel::Public => ACCESS_PUBLIC,
            AccessLevel::Restricted => ACCESS_RESTRICTED,
            AccessLevel::Confidential => ACCESS_CONFIDENTIAL,
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = CoreError;

    /// `private` is accepted as an alias of `confidential`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            ACCESS_PUBLIC => Ok(AccessLevel::Public),
            ACCESS_RESTRICTED => Ok(AccessLevel::Restricted),
            ACCESS_CONFIDENTIAL | "private" => Ok(AccessLevel::Confidential),
            other => Err(CoreError::Validation(format!(
                "Invalid access level '{other}'. Must be one of: public, restricted, confidential"
            ))),
        }
    }
}

/// The set of rows a caller may see, in a shape the SQL layer can bind
/// directly: `access_level = ANY(levels) OR owner_id = owner_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityScope {
    pub levels: Vec<AccessLevel>,
    /// Rows owned by this user are visible regardless of level.
    pub owner_id: Option<DbId>,
}

impl VisibilityScope {
    pub fn for_caller(role: Role, caller_id: DbId) -> Self {
        match role {
            Role::Administrator => Self {
                levels: AccessLevel::ALL.to_vec(),
                owner_id: None,
            },
            Role::Journalist => Self {
                levels: vec![AccessLevel::Public, AccessLevel::Restricted],
                owner_id: Some(caller_id),
            },
            Role::Viewer => Self {
                levels: vec![AccessLevel::Public],
                owner_id: None,
            },
        }
    }

    pub fn admits(&self, access: AccessLevel, owner_id: DbId) -> bool {
        self.levels.contains(&access) || self.owner_id == Some(owner_id)
    }

    /// Level names for binding as a `TEXT[]` parameter.
    pub fn level_names(&self) -> Vec<String> {
        self.levels.iter().map(|l| l.as_str().to_string()).collect()
    }
}

/// Single-row form of the visibility rule, used by detail and download.
pub fn can_view(role: Role, caller_id: DbId, access: AccessLevel, owner_id: DbId) -> bool {
    VisibilityScope::for_caller(role, caller_id).admits(access, owner_id)
}

/// Explicit access-level filters are only honoured for administrators.
/// Everyone else is already narrowed by their [`VisibilityScope`].
pub fn effective_access_filter(role: Role, requested: Option<AccessLevel>) -> Option<AccessLevel> {
    match role {
        Role::Administrator => requested,
        Role::Journalist | Role::Viewer => None,
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const OWNER: DbId = 10;
    const OTHER: DbId = 11;

    #[test]
    fn parse_accepts_private_alias() {
        assert_eq!("private".parse::<AccessLevel>().unwrap(), AccessLevel::Confidential);
        assert_eq!(" Public ".parse::<AccessLevel>().unwrap(), AccessLevel::Public);
        assert_matches!("secret".parse::<AccessLevel>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn administrator_sees_everything() {
        for level in AccessLevel::ALL {
            assert!(can_view(Role::Administrator, OTHER, level, OWNER));
        }
    }

    #[test]
    fn viewer_sees_public_only_even_when_owner() {
        assert!(can_view(Role::Viewer, OWNER, AccessLevel::Public, OWNER));
        assert!(!can_view(Role::Viewer, OWNER, AccessLevel::Restricted, OWNER));
        assert!(!can_view(Role::Viewer, OWNER, AccessLevel::Confidential, OWNER));
    }

    #[test]
    fn journalist_sees_public_restricted_and_own() {
        assert!(can_view(Role::Journalist, OTHER, AccessLevel::Public, OWNER));
        assert!(can_view(Role::Journalist, OTHER, AccessLevel::Restricted, OWNER));
        assert!(!can_view(Role::Journalist, OTHER, AccessLevel::Confidential, OWNER));
        assert!(can_view(Role::Journalist, OWNER, AccessLevel::Confidential, OWNER));
    }

    #[test]
    fn scope_binds_level_names() {
        let scope = VisibilityScope::for_caller(Role::Journalist, 5);
        assert_eq!(scope.level_names(), vec!["public", "restricted"]);
        assert_eq!(scope.owner_id, Some(5));
    }

    #[test]
    fn access_filter_dropped_for_non_admins() {
        let wanted = Some(AccessLevel::Confidential);
        assert_eq!(effective_access_filter(Role::Administrator, wanted), wanted);
        assert_eq!(effective_access_filter(Role::Journalist, wanted), None);
        assert_eq!(effective_access_filter(Role::Viewer, wanted), None);
    }
}
