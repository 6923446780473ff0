//! Page loaders and actions. Each one checks the caller's permission,
//! talks to the repository and shapes the result for the presentation layer.

use serde_json::Value;
use thiserror::Error;

use crate::domain::activity::NewActivity;
use crate::domain::context::AdminContext;
use crate::domain::permission::Permission;
use crate::repository::{ActivityWriter, RepositoryError};

pub mod activity;
pub mod categories;
pub mod main;
pub mod orders;
pub mod products;
pub mod settings;

/// Errors surfaced by the service layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    /// Rejected input, with a message fit for the user.
    #[error("{0}")]
    Form(String),
    #[error("repository error: {0}")]
    Repository(RepositoryError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Repository(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Fail with `Unauthorized` unless the caller holds `permission`.
pub(crate) fn ensure(ctx: &AdminContext, permission: Permission) -> ServiceResult<()> {
    if ctx.can(permission) {
        return Ok(());
    }
    log::warn!(
        "User {} ({}) denied {permission} in store {}",
        ctx.user_id,
        ctx.role.map(|role| role.as_str()).unwrap_or("no role"),
        ctx.store_id
    );
    Err(ServiceError::Unauthorized)
}

/// Append to the activity log. A failed write is logged and otherwise ignored.
pub(crate) fn record_activity<R>(repo: &R, ctx: &AdminContext, action: &str, details: Value)
where
    R: ActivityWriter + ?Sized,
{
    let entry = NewActivity::new(ctx, action, details);
    if let Err(err) = repo.record_activity(&ctx.store_id, &entry) {
        log::error!("Failed to record activity `{action}`: {err}");
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::context::AdminContext;
    use crate::domain::role::Role;

    pub const STORE: &str = "store-1";

    pub fn ctx(role: Option<Role>) -> AdminContext {
        AdminContext::new("user-1", STORE, role).with_email("mona@example.com")
    }
}
