use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use super::{Normalize, decode};
use crate::cache::{CacheKey, FetchOptions, Snapshot, Subscription};
use crate::{DataContext, FetchError};

/// View model of a single-record read.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailHookReturn<T> {
    pub entity: Option<T>,
    pub is_loading: bool,
    pub error: Option<FetchError>,
    pub is_validating: bool,
    pub is_empty: bool,
}

impl<T: DeserializeOwned + Normalize> DetailHookReturn<T> {
    fn from_snapshot(snapshot: &Snapshot) -> Self {
        let (entity, error) = match snapshot.data.as_deref().map(decode::<T>) {
            Some(Ok(entity)) => (Some(entity.normalize()), snapshot.error.clone()),
            Some(Err(e)) => (None, snapshot.error.clone().or(Some(e))),
            None => (None, snapshot.error.clone()),
        };
        let is_loading = snapshot.is_loading();
        Self {
            is_empty: !is_loading && entity.is_none(),
            entity,
            is_loading,
            error,
            is_validating: snapshot.is_validating,
        }
    }

    fn unkeyed() -> Self {
        Self {
            entity: None,
            is_loading: false,
            error: None,
            is_validating: false,
            is_empty: true,
        }
    }
}

/// A mounted single-record read.
pub struct DetailHook<T> {
    subscription: Option<Subscription>,
    _marker: PhantomData<fn() -> T>,
}

/// Read one record.
///
/// With no key (nothing selected, or a blank id) no request is made and
/// the hook reads as idle. Detail reads don't refetch on focus or reconnect
/// and aren't retried; the record is normalized on every read.
pub fn use_detail<T: DeserializeOwned + Normalize>(
    ctx: &DataContext,
    key: Option<CacheKey>,
) -> DetailHook<T> {
    DetailHook {
        subscription: key.map(|key| ctx.cache().subscribe(key, FetchOptions::detail())),
        _marker: PhantomData,
    }
}

impl<T: DeserializeOwned + Normalize> DetailHook<T> {
    pub fn state(&self) -> DetailHookReturn<T> {
        self.subscription
            .as_ref()
            .map_or_else(DetailHookReturn::unkeyed, |subscription| {
                DetailHookReturn::from_snapshot(&subscription.snapshot())
            })
    }

    pub fn refresh(&self) {
        if let Some(subscription) = &self.subscription {
            subscription.refresh();
        }
    }

    pub async fn changed(&mut self) -> bool {
        match &mut self.subscription {
            Some(subscription) => subscription.changed().await,
            None => false,
        }
    }

    pub async fn settled(&self) -> DetailHookReturn<T> {
        match &self.subscription {
            Some(subscription) => {
                DetailHookReturn::from_snapshot(&subscription.settled().await)
            }
            None => DetailHookReturn::unkeyed(),
        }
    }

    pub fn key(&self) -> Option<&CacheKey> {
        self.subscription.as_ref().map(Subscription::key)
    }
}
