use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use super::decode_items;
use crate::cache::{CacheKey, Snapshot, Subscription};
use crate::{DataContext, FetchError};

/// View model of a collection read.
#[derive(Debug, Clone, PartialEq)]
pub struct ListHookReturn<T> {
    pub items: Vec<T>,
    pub is_loading: bool,
    pub error: Option<FetchError>,
    pub is_validating: bool,
    /// `!is_loading && items.is_empty()`
    pub is_empty: bool,
}

impl<T: DeserializeOwned> ListHookReturn<T> {
    fn from_snapshot(snapshot: &Snapshot) -> Self {
        let (items, error) =
            decode_items(snapshot.data.as_deref(), snapshot.error.clone());
        Self::new(items, snapshot.is_loading(), error, snapshot.is_validating)
    }

    fn unkeyed() -> Self {
        Self::new(Vec::new(), false, None, false)
    }
}

impl<T> ListHookReturn<T> {
    fn new(
        items: Vec<T>,
        is_loading: bool,
        error: Option<FetchError>,
        is_validating: bool,
    ) -> Self {
        let is_empty = !is_loading && items.is_empty();
        Self {
            items,
            is_loading,
            error,
            is_validating,
            is_empty,
        }
    }
}

/// A mounted collection read.
pub struct ListHook<T> {
    subscription: Option<Subscription>,
    _marker: PhantomData<fn() -> T>,
}

/// Read the collection at `key`.
///
/// A `None` key (a scoped list whose scope id isn't known yet) makes no
/// request and reads as empty.
pub fn use_list<T: DeserializeOwned>(
    ctx: &DataContext,
    key: impl Into<Option<CacheKey>>,
) -> ListHook<T> {
    let subscription = key
        .into()
        .map(|key| ctx.cache().subscribe(key, ctx.list_options()));
    ListHook {
        subscription,
        _marker: PhantomData,
    }
}

impl<T: DeserializeOwned> ListHook<T> {
    pub fn state(&self) -> ListHookReturn<T> {
        match &self.subscription {
            Some(subscription) => {
                ListHookReturn::from_snapshot(&subscription.snapshot())
            }
            None => ListHookReturn::unkeyed(),
        }
    }

    /// Schedule a refetch; returns immediately.
    pub fn refresh(&self) {
        if let Some(subscription) = &self.subscription {
            subscription.refresh();
        }
    }

    /// Wait for the next state change. Returns `false` if there's nothing
    /// to wait on.
    pub async fn changed(&mut self) -> bool {
        match &mut self.subscription {
            Some(subscription) => subscription.changed().await,
            None => false,
        }
    }

    /// Wait until no fetch is in flight and return the state.
    pub async fn settled(&self) -> ListHookReturn<T> {
        match &self.subscription {
            Some(subscription) => {
                ListHookReturn::from_snapshot(&subscription.settled().await)
            }
            None => ListHookReturn::unkeyed(),
        }
    }

    pub fn key(&self) -> Option<&CacheKey> {
        self.subscription.as_ref().map(Subscription::key)
    }
}
