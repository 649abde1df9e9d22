pub mod toast;

use std::sync::Arc;

use crate::{Cache, ClientConfig, FetchOptions};
use payloads::{APIClient, ClientError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// Receives user-facing outcomes of mutations. Fire-and-forget: the data
/// layer neither waits on nor inspects what the notifier does.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}

/// Everything a hook needs: the shared cache, the notification sink and
/// the default options for list-style reads.
#[derive(Clone)]
pub struct DataContext {
    cache: Cache,
    notifier: Arc<dyn Notifier>,
    list_options: FetchOptions,
}

impl DataContext {
    pub fn new(cache: Cache, notifier: impl Notifier + 'static) -> Self {
        Self {
            cache,
            notifier: Arc::new(notifier),
            list_options: FetchOptions::default(),
        }
    }

    /// Build the client, cache and list options described by `config`.
    pub fn from_config(
        config: &ClientConfig,
        notifier: impl Notifier + 'static,
    ) -> Result<Self, ClientError> {
        let client =
            APIClient::new(config.backend_url.clone(), config.request_timeout)?;
        Ok(Self::new(Cache::new(client), notifier)
            .with_list_options(config.list_options()))
    }

    pub fn with_list_options(self, list_options: FetchOptions) -> Self {
        Self {
            list_options,
            ..self
        }
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    pub fn list_options(&self) -> FetchOptions {
        self.list_options
    }
}
