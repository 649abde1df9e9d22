use std::time::Duration;

/// Per-subscriber revalidation behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Refetch when [`Cache::on_focus`](super::Cache::on_focus) fires.
    pub revalidate_on_focus: bool,
    /// Refetch when [`Cache::on_reconnect`](super::Cache::on_reconnect)
    /// fires.
    pub revalidate_on_reconnect: bool,
    /// Retry failed fetches with exponential backoff.
    pub retry: Option<RetryPolicy>,
    /// Keep showing the last results while a new key's first response is
    /// pending. Only meaningful for hooks that switch keys.
    pub keep_previous_data: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            revalidate_on_focus: true,
            revalidate_on_reconnect: true,
            retry: Some(RetryPolicy::default()),
            keep_previous_data: false,
        }
    }
}

impl FetchOptions {
    /// For a selected record that rarely changes while someone is editing
    /// it: no focus/reconnect refetches and no retries.
    pub fn detail() -> Self {
        Self {
            revalidate_on_focus: false,
            revalidate_on_reconnect: false,
            retry: None,
            keep_previous_data: false,
        }
    }

    pub fn keep_previous_data(self) -> Self {
        Self {
            keep_previous_data: true,
            ..self
        }
    }
}

/// Exponential backoff for failed fetches.
///
/// Starts at `initial_delay` and doubles on each retry until the next delay
/// would exceed `max_delay`, at which point retrying stops and the error
/// stays on the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (zero-based), or `None` once
    /// retries are exhausted.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        let factor = 1u32.checked_shl(attempt)?;
        self.initial_delay
            .checked_mul(factor)
            .filter(|delay| *delay <= self.max_delay)
    }
}
