use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::role::Role;

/// Named capability checked before showing an affordance or performing a write.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewProducts,
    AddProduct,
    EditProduct,
    DeleteProduct,
    ViewOrders,
    UpdateOrderStatus,
    DeleteOrder,
    ManageCategories,
    ManageSettings,
    ViewActivityLogs,
    ManageUsers,
    ManageBilling,
}

/// Raised when a permission name is not part of the static set.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown permission `{0}`")]
pub struct UnknownPermission(pub String);

impl Permission {
    pub const ALL: [Permission; 12] = [
        Permission::ViewProducts,
        Permission::AddProduct,
        Permission::EditProduct,
        Permission::DeleteProduct,
        Permission::ViewOrders,
        Permission::UpdateOrderStatus,
        Permission::DeleteOrder,
        Permission::ManageCategories,
        Permission::ManageSettings,
        Permission::ViewActivityLogs,
        Permission::ManageUsers,
        Permission::ManageBilling,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Permission::ViewProducts => "view_products",
            Permission::AddProduct => "add_product",
            Permission::EditProduct => "edit_product",
            Permission::DeleteProduct => "delete_product",
            Permission::ViewOrders => "view_orders",
            Permission::UpdateOrderStatus => "update_order_status",
            Permission::DeleteOrder => "delete_order",
            Permission::ManageCategories => "manage_categories",
            Permission::ManageSettings => "manage_settings",
            Permission::ViewActivityLogs => "view_activity_logs",
            Permission::ManageUsers => "manage_users",
            Permission::ManageBilling => "manage_billing",
        }
    }
}

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|permission| permission.as_str() == value)
            .ok_or_else(|| UnknownPermission(value.to_string()))
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-permission allow flags handed to the presentation layer.
pub type Capabilities = BTreeMap<&'static str, bool>;

/// Errors raised while loading a permission table override.
#[derive(Debug, Error)]
pub enum PermissionTableError {
    #[error("failed to read permission table: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed permission table: {0}")]
    Json(#[from] serde_json::Error),
}

lazy_static! {
    static ref BUILTIN_TABLE: Arc<PermissionTable> = Arc::new(PermissionTable::builtin());
}

/// Mapping from each permission to the non-admin roles holding it.
///
/// Admin is never looked up: it is allowed everything, including permissions
/// the table does not mention. Any other role is denied unless the table lists
/// it for the requested permission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionTable {
    allowed: HashMap<Permission, HashSet<Role>>,
}

impl PermissionTable {
    /// A table granting nothing to non-admin roles.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The role matrix shipped with the dashboard.
    pub fn builtin() -> Self {
        use Role::{Admin, Manager, ReadOnly, Staff};

        Self::empty()
            .allow(Permission::ViewProducts, &[Admin, Manager, Staff, ReadOnly])
            .allow(Permission::AddProduct, &[Admin, Manager])
            .allow(Permission::EditProduct, &[Admin, Manager])
            .allow(Permission::DeleteProduct, &[Admin])
            .allow(Permission::ViewOrders, &[Admin, Manager, Staff])
            .allow(Permission::UpdateOrderStatus, &[Admin, Manager, Staff])
            .allow(Permission::DeleteOrder, &[Admin])
            .allow(Permission::ManageCategories, &[Admin, Manager])
            .allow(Permission::ManageSettings, &[Admin])
            .allow(Permission::ViewActivityLogs, &[Admin, Manager])
            .allow(Permission::ManageUsers, &[Admin])
            .allow(Permission::ManageBilling, &[Admin])
    }

    /// Shared handle to the built-in table.
    pub fn shared_builtin() -> Arc<Self> {
        Arc::clone(&BUILTIN_TABLE)
    }

    /// Grant `permission` to `roles`, keeping any roles already granted.
    pub fn allow(mut self, permission: Permission, roles: &[Role]) -> Self {
        self.allowed
            .entry(permission)
            .or_default()
            .extend(roles.iter().copied());
        self
    }

    /// Decide whether `role` may exercise `permission`.
    pub fn is_allowed(&self, role: Option<Role>, permission: Permission) -> bool {
        match role {
            None => false,
            Some(Role::Admin) => true,
            Some(role) => self
                .allowed
                .get(&permission)
                .is_some_and(|roles| roles.contains(&role)),
        }
    }

    /// Same decision over raw names, as stored in identity metadata.
    ///
    /// An unknown role denies; admin allows any name, defined or not; an
    /// unknown permission denies everyone else.
    pub fn is_allowed_by_name(&self, role: &str, permission: &str) -> bool {
        let Ok(role) = role.parse::<Role>() else {
            return false;
        };
        if role == Role::Admin {
            return true;
        }
        match permission.parse::<Permission>() {
            Ok(permission) => self.is_allowed(Some(role), permission),
            Err(_) => false,
        }
    }

    /// Evaluate a set of permissions for `role` in one go.
    pub fn capabilities(&self, role: Option<Role>, permissions: &[Permission]) -> Capabilities {
        permissions
            .iter()
            .map(|permission| (permission.as_str(), self.is_allowed(role, *permission)))
            .collect()
    }

    /// Build a table from a JSON object of `{"permission": ["role", ...]}`.
    ///
    /// Names that do not parse are skipped, so a typo can only remove access.
    pub fn from_json_str(raw: &str) -> Result<Self, PermissionTableError> {
        let entries: HashMap<String, Vec<String>> = serde_json::from_str(raw)?;
        let mut table = Self::empty();

        for (permission_name, role_names) in entries {
            let permission = match permission_name.parse::<Permission>() {
                Ok(permission) => permission,
                Err(err) => {
                    log::warn!("Ignoring permission table entry: {err}");
                    continue;
                }
            };

            let mut roles = Vec::with_capacity(role_names.len());
            for role_name in role_names {
                match role_name.parse::<Role>() {
                    Ok(role) => roles.push(role),
                    Err(err) => log::warn!("Ignoring role for `{permission}`: {err}"),
                }
            }
            table = table.allow(permission, &roles);
        }

        Ok(table)
    }

    /// Load a table override from a JSON file.
    pub fn from_json_file(path: &std::path::Path) -> Result<Self, PermissionTableError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}
