//! Actor roles.

use serde::{Deserialize, Serialize};

/// Role of an acting user.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Elevated: bypasses the order access check entirely.
    Admin,
    /// Restricted: may only operate on orders belonging to the client record
    /// linked to this user.
    External,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}
