//! Generic resource hooks.
//!
//! Each hook wraps a cache [`Subscription`](crate::cache::Subscription) and
//! derives its view model from the current [`Snapshot`] on every call to
//! `state()`. Derived flags are never stored, so they can't drift from the
//! entry they describe.
//!
//! Hook states combine like this:
//!
//! | data | fetching | `is_loading` | `is_validating` |
//! |------|----------|--------------|-----------------|
//! | none | yes      | true         | true            |
//! | some | yes      | false        | true            |
//! | any  | no       | false        | false           |

mod use_detail;
mod use_list;
mod use_mutation;
mod use_search;

pub use use_detail::{DetailHook, DetailHookReturn, use_detail};
pub use use_list::{ListHook, ListHookReturn, use_list};
pub use use_mutation::{
    MutationDef, MutationHook, MutationState, WriteRequest, use_mutation,
};
pub use use_search::{SearchHook, SearchHookReturn, use_search};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::FetchError;

/// Fill in defaults the backend leaves out of older records.
///
/// Runs on every read of a detail hook, after deserialization, so it must
/// be a pure function of the record.
pub trait Normalize: Sized {
    fn normalize(self) -> Self {
        self
    }
}

fn decode<T: DeserializeOwned>(value: &Value) -> Result<T, FetchError> {
    T::deserialize(value).map_err(|e| FetchError::Decode(e.to_string()))
}

/// Decode a collection body, folding a decode failure into the error slot
/// so the hook still renders as "not loading, no items, error".
fn decode_items<T: DeserializeOwned>(
    data: Option<&Value>,
    error: Option<FetchError>,
) -> (Vec<T>, Option<FetchError>) {
    match data.map(decode::<Vec<T>>) {
        Some(Ok(items)) => (items, error),
        Some(Err(decode_error)) => (Vec::new(), error.or(Some(decode_error))),
        None => (Vec::new(), error),
    }
}
