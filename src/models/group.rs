use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// A study group.
///
/// `members` is the canonical flat list of usernames. The remote backend
/// derives it from a separate membership relation; the local backend stores it
/// inline. Neither representation leaks past its adapter.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub set_ids: Vec<String>,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default)]
pub struct NewGroup {
    pub name: String,
    pub description: Option<String>,
    pub school: Option<String>,
}

impl NewGroup {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Outcome of creating a group.
///
/// Group creation on the remote backend is a two-step write (group row, then
/// the creator's membership row) with no transaction across the steps. When
/// the second step fails the group still exists; `membership_error` carries
/// that partial failure instead of conflating it with total success.
#[derive(Debug)]
pub struct GroupCreated {
    pub group: Group,
    pub membership_error: Option<StoreError>,
}

impl GroupCreated {
    pub fn complete(group: Group) -> Self {
        Self {
            group,
            membership_error: None,
        }
    }

    /// True when the creator's membership was recorded along with the group.
    pub fn is_complete(&self) -> bool {
        self.membership_error.is_none()
    }
}
