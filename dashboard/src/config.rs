use anyhow::{Context, Result};
use std::time::Duration;

use crate::{FetchOptions, RetryPolicy};

/// Client configuration.
///
/// Environment variables can be set directly or loaded from a .env file:
/// - BACKEND_URL: base address of the API (default http://127.0.0.1:8000)
/// - REQUEST_TIMEOUT_MS: per-request timeout (default 10000)
/// - FOCUS_REVALIDATION: refetch lists when the client regains focus
///   (default true)
/// - RETRY_INITIAL_DELAY_MS: first retry delay for failed list fetches
///   (default 500)
/// - RETRY_MAX_DELAY_MS: retries stop once the next delay would exceed
///   this; 0 disables retrying (default 8000)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub backend_url: String,
    pub request_timeout: Duration,
    pub focus_revalidation: bool,
    pub list_retry: Option<RetryPolicy>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8000".to_string(),
            request_timeout: Duration::from_secs(10),
            focus_revalidation: true,
            list_retry: Some(RetryPolicy::default()),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        // Silently ignored if the file doesn't exist
        let _ = dotenvy::dotenv();
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let millis = |name: &str, default: Duration| -> Result<Duration> {
            match var(name) {
                Some(value) => value
                    .trim()
                    .parse()
                    .map(Duration::from_millis)
                    .with_context(|| format!("parse {name}")),
                None => Ok(default),
            }
        };

        let default_retry = RetryPolicy::default();
        let initial_delay =
            millis("RETRY_INITIAL_DELAY_MS", default_retry.initial_delay)?;
        let max_delay = millis("RETRY_MAX_DELAY_MS", default_retry.max_delay)?;
        let list_retry = (!max_delay.is_zero()).then_some(RetryPolicy {
            initial_delay,
            max_delay,
        });

        let focus_revalidation = match var("FOCUS_REVALIDATION") {
            Some(value) => value
                .trim()
                .parse()
                .context("parse FOCUS_REVALIDATION")?,
            None => defaults.focus_revalidation,
        };

        Ok(Self {
            backend_url: var("BACKEND_URL").unwrap_or(defaults.backend_url),
            request_timeout: millis(
                "REQUEST_TIMEOUT_MS",
                defaults.request_timeout,
            )?,
            focus_revalidation,
            list_retry,
        })
    }

    pub fn list_options(&self) -> FetchOptions {
        FetchOptions {
            revalidate_on_focus: self.focus_revalidation,
            retry: self.list_retry,
            ..FetchOptions::default()
        }
    }
}
