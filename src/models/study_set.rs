use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One term/definition pair inside a study set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub term: String,
    pub definition: String,
}

impl Term {
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            definition: definition.into(),
        }
    }
}

/// A study set in its canonical, backend-agnostic shape.
///
/// `terms` is always present as a sequence; adapters normalize an absent or
/// null column to an empty list. `owner_id` is nullable in local mode, where
/// ownership is not enforced.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySet {
    pub id: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub terms: Vec<Term>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// Fields a caller supplies when creating a set; everything else (id, owner,
/// timestamps) is stamped by the serving backend.
#[derive(Clone, Debug, Default)]
pub struct NewStudySet {
    pub title: String,
    pub description: Option<String>,
    pub terms: Option<Vec<Term>>,
}

impl NewStudySet {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update for a set. `None` fields are left untouched; the merge is
/// shallow.
#[derive(Clone, Debug, Default)]
pub struct StudySetPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub terms: Option<Vec<Term>>,
}
