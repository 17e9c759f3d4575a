use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A folder grouping study sets by id.
///
/// `set_ids` holds no duplicates; membership inserts check before appending.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub set_ids: Vec<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default)]
pub struct NewFolder {
    pub name: String,
    pub description: Option<String>,
}

impl NewFolder {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
