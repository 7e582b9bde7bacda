use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::{ROLE_ADMIN, ROLE_SUPER_ADMIN};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub account_id: String,
    pub sub: String,
    /// Session UID (only present for interactive OIDC flows)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_uid: Option<String>,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    /// Check if user has a specific role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_super_admin(&self) -> bool {
        self.has_role(ROLE_SUPER_ADMIN)
    }

    /// Check if user may administer events (super_admin or admin)
    pub fn has_event_admin_access(&self) -> bool {
        self.is_super_admin() || self.has_role(ROLE_ADMIN)
    }
}

/// Claims nested under the configured namespace of the access token
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomClaims {
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[cfg(test)]
mod tests {
    use crate::shared::test_helpers::create_user;

    #[test]
    fn test_event_admin_access() {
        assert!(create_user(&["admin"]).has_event_admin_access());
        assert!(create_user(&["super_admin"]).has_event_admin_access());
        assert!(!create_user(&["attendee"]).has_event_admin_access());
        assert!(!create_user(&[]).has_event_admin_access());
    }

    #[test]
    fn test_admin_is_not_super_admin() {
        assert!(!create_user(&["admin"]).is_super_admin());
    }
}
