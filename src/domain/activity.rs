use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::context::AdminContext;

/// Audit record of an action performed from the dashboard.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ActivityEntry {
    pub id: String,
    pub user_id: String,
    pub user_email: Option<String>,
    pub user_name: String,
    pub action: String,
    #[serde(default)]
    pub details: Value,
    pub timestamp: DateTime<Utc>,
}

/// Payload required to append an entry to the activity log.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    pub user_id: String,
    pub user_email: Option<String>,
    pub user_name: String,
    pub action: String,
    pub details: Value,
    pub timestamp: DateTime<Utc>,
}

impl NewActivity {
    /// Describe `action` as performed by the caller in `ctx`.
    pub fn new(ctx: &AdminContext, action: impl Into<String>, details: Value) -> Self {
        Self {
            user_id: ctx.user_id.clone(),
            user_email: ctx.email.clone(),
            user_name: ctx.display_name(),
            action: action.into(),
            details,
            timestamp: Utc::now(),
        }
    }

    pub fn into_entry(self, id: impl Into<String>) -> ActivityEntry {
        ActivityEntry {
            id: id.into(),
            user_id: self.user_id,
            user_email: self.user_email,
            user_name: self.user_name,
            action: self.action,
            details: self.details,
            timestamp: self.timestamp,
        }
    }
}
