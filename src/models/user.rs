use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An identity as both backends expose it.
///
/// Remote sessions always carry an `id`; users fabricated by the local
/// sign-up stub do not. In local mode this is a cached object, not a verified
/// session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: Option<String>,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// The name stamped into group memberships: the metadata username when
    /// present, the email otherwise.
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.email)
    }
}

/// A credential record in the locally stored account list, the list local
/// sign-in checks with an exact username/password match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LocalAccount {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: String,
}

impl From<LocalAccount> for User {
    fn from(account: LocalAccount) -> Self {
        User {
            id: None,
            email: account.email,
            username: Some(account.username),
            created_at: None,
        }
    }
}
