use dotenv::dotenv;
use std::env;

/// Connection settings for the hosted backend.
///
/// Presence of both the endpoint URL and the access key makes the store
/// eligible for cloud mode; anything less silently keeps it local. The config
/// is passed explicitly into [`crate::availability::RemoteHandle`] rather than
/// living in a global.
#[derive(Clone, Default)]
pub struct RemoteConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
}

impl core::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("url", &self.url)
            .field("anon_key", &self.anon_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl RemoteConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            anon_key: Some(anon_key.into()),
        }
    }

    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            url: env::var("FUIZLET_REMOTE_URL").ok().filter(|v| !v.is_empty()),
            anon_key: env::var("FUIZLET_REMOTE_KEY").ok().filter(|v| !v.is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some() && self.anon_key.is_some()
    }
}
