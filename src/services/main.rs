use serde::Serialize;

use crate::domain::context::AdminContext;
use crate::domain::permission::{Capabilities, Permission};
use crate::domain::role::Role;

/// Who the caller is and what the dashboard may offer them.
#[derive(Debug, Serialize)]
pub struct IndexPageData {
    pub user_id: String,
    pub display_name: String,
    pub store_id: String,
    pub role: Option<Role>,
    pub capabilities: Capabilities,
}

/// Capability map over every permission. Needs no permission itself, so a
/// caller without a role learns that everything is denied.
pub fn load_index_page(ctx: &AdminContext) -> IndexPageData {
    IndexPageData {
        user_id: ctx.user_id.clone(),
        display_name: ctx.display_name(),
        store_id: ctx.store_id.clone(),
        role: ctx.role,
        capabilities: ctx.capabilities(&Permission::ALL),
    }
}
