use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::debug;

use crate::config::RemoteConfig;
use crate::remote::RemoteService;

/// Constructs the remote client from configuration. Injected so the store
/// never reaches for a global client handle; returning `None` means the
/// client could not be built (bad credentials, unreachable endpoint).
pub trait RemoteFactory: Send + Sync {
    fn connect(&self, config: &RemoteConfig) -> Option<Arc<dyn RemoteService>>;
}

impl<F> RemoteFactory for F
where
    F: Fn(&RemoteConfig) -> Option<Arc<dyn RemoteService>> + Send + Sync,
{
    fn connect(&self, config: &RemoteConfig) -> Option<Arc<dyn RemoteService>> {
        self(config)
    }
}

/// Availability probe plus memoized client handle.
///
/// `client()` is cheap enough to run before every operation: the
/// configuration check is re-evaluated on each call, and only a successfully
/// constructed client is cached. A construction attempt that fails is retried
/// on the next call, so availability can flip from local to cloud mid-session
/// once the service becomes reachable.
///
/// Misconfiguration is never an error here; the handle just reports the
/// remote backend unavailable and callers downgrade to local.
pub struct RemoteHandle {
    config: RemoteConfig,
    factory: Option<Box<dyn RemoteFactory>>,
    client: OnceCell<Arc<dyn RemoteService>>,
}

impl RemoteHandle {
    pub fn new(config: RemoteConfig, factory: impl RemoteFactory + 'static) -> Self {
        Self {
            config,
            factory: Some(Box::new(factory)),
            client: OnceCell::new(),
        }
    }

    /// A handle that always reports the remote backend unavailable.
    pub fn disabled() -> Self {
        Self {
            config: RemoteConfig::default(),
            factory: None,
            client: OnceCell::new(),
        }
    }

    /// Wraps an already-constructed client (embedded fakes, tests).
    pub fn with_client(client: Arc<dyn RemoteService>) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(client);
        Self {
            config: RemoteConfig::new("memory://", "embedded"),
            factory: None,
            client: cell,
        }
    }

    pub fn available(&self) -> bool {
        self.client().is_some()
    }

    pub fn client(&self) -> Option<Arc<dyn RemoteService>> {
        if !self.config.is_configured() {
            return None;
        }
        if let Some(client) = self.client.get() {
            return Some(Arc::clone(client));
        }
        match self.factory.as_ref()?.connect(&self.config) {
            Some(client) => {
                debug!("remote client constructed");
                let _ = self.client.set(Arc::clone(&client));
                Some(client)
            }
            None => None,
        }
    }
}
