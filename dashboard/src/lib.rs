//! Resource data layer for the hotel operations dashboard.
//!
//! Views read resources through hooks (`hooks::use_list`,
//! `hooks::use_detail`, `hooks::use_search`) backed by one shared
//! [`Cache`], and write through mutation hooks that invalidate the
//! affected cache keys once the server acknowledges the write. The
//! per-resource wrappers in [`resources`] are the entry points views use.

pub mod cache;
pub mod config;
pub mod contexts;
pub mod error;
pub mod hooks;
pub mod logs;
pub mod resources;

pub use cache::{Cache, CacheKey, FetchOptions, RetryPolicy, Snapshot};
pub use config::ClientConfig;
pub use contexts::{DataContext, Notifier, Severity};
pub use error::{FetchError, MutationError};
