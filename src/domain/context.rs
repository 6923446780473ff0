use std::sync::Arc;

use crate::domain::permission::{Capabilities, Permission, PermissionTable};
use crate::domain::role::Role;

/// Identity and tenancy of the caller, passed explicitly into every service.
#[derive(Debug, Clone)]
pub struct AdminContext {
    /// Identifier issued by the identity provider.
    pub user_id: String,
    /// Email address of the user, when known.
    pub email: Option<String>,
    /// Store whose records are being managed.
    pub store_id: String,
    /// Resolved role; `None` when missing or unrecognised.
    pub role: Option<Role>,
    permissions: Arc<PermissionTable>,
}

impl AdminContext {
    /// Build a context evaluated against the built-in permission table.
    pub fn new(user_id: impl Into<String>, store_id: impl Into<String>, role: Option<Role>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
            store_id: store_id.into(),
            role,
            permissions: PermissionTable::shared_builtin(),
        }
    }

    /// Attach the user's email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Evaluate permissions against a different table.
    pub fn with_permissions(mut self, permissions: Arc<PermissionTable>) -> Self {
        self.permissions = permissions;
        self
    }

    /// Whether the caller may exercise `permission`.
    pub fn can(&self, permission: Permission) -> bool {
        self.permissions.is_allowed(self.role, permission)
    }

    /// Capability flags for the given permissions.
    pub fn capabilities(&self, permissions: &[Permission]) -> Capabilities {
        self.permissions.capabilities(self.role, permissions)
    }

    /// Display name derived from the local part of the email address,
    /// falling back to the user id.
    pub fn display_name(&self) -> String {
        self.email
            .as_deref()
            .and_then(|email| email.split('@').next())
            .filter(|name| !name.is_empty())
            .unwrap_or(self.user_id.as_str())
            .to_string()
    }
}
