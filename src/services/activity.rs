use crate::domain::activity::ActivityEntry;
use crate::domain::context::AdminContext;
use crate::domain::permission::Permission;
use crate::repository::ActivityReader;
use crate::services::{ServiceError, ServiceResult, ensure};

pub const DEFAULT_ACTIVITY_LIMIT: usize = 50;
pub const MAX_ACTIVITY_LIMIT: usize = 200;

/// Most recent activity entries, newest first.
pub fn load_activity<R>(
    repo: &R,
    ctx: &AdminContext,
    limit: Option<usize>,
) -> ServiceResult<Vec<ActivityEntry>>
where
    R: ActivityReader + ?Sized,
{
    ensure(ctx, Permission::ViewActivityLogs)?;

    let limit = limit
        .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
        .clamp(1, MAX_ACTIVITY_LIMIT);

    repo.list_activity(&ctx.store_id, limit)
        .map_err(ServiceError::from)
}
