use std::marker::PhantomData;
use std::sync::Arc;

use payloads::Endpoints;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::decode_items;
use crate::cache::{CacheKey, FetchOptions, Snapshot, Subscription};
use crate::{DataContext, FetchError};

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHookReturn<T> {
    pub results: Vec<T>,
    pub is_loading: bool,
    pub error: Option<FetchError>,
    pub is_validating: bool,
    pub is_empty: bool,
}

impl<T> SearchHookReturn<T> {
    fn idle() -> Self {
        Self {
            results: Vec::new(),
            is_loading: false,
            error: None,
            is_validating: false,
            is_empty: true,
        }
    }
}

impl<T: DeserializeOwned> SearchHookReturn<T> {
    fn from_parts(snapshot: &Snapshot, fallback: Option<&Arc<Value>>) -> Self {
        let data = snapshot.data.as_ref().or(fallback);
        let is_loading = data.is_none() && snapshot.is_validating;
        let (results, error) =
            decode_items(data.map(Arc::as_ref), snapshot.error.clone());
        Self {
            is_empty: !is_loading && results.is_empty(),
            results,
            is_loading,
            error,
            is_validating: snapshot.is_validating,
        }
    }
}

/// A mounted free-text search over one collection.
///
/// The query can change over the hook's lifetime. With
/// `keep_previous_data` set (the default for [`use_search`]) the last
/// results stay visible until the new query's first response arrives.
pub struct SearchHook<T> {
    ctx: DataContext,
    endpoints: Endpoints,
    options: FetchOptions,
    query: String,
    subscription: Option<Subscription>,
    previous: Option<Arc<Value>>,
    _marker: PhantomData<fn() -> T>,
}

pub fn use_search<T: DeserializeOwned>(
    ctx: &DataContext,
    endpoints: &Endpoints,
    query: &str,
) -> SearchHook<T> {
    let mut hook = SearchHook {
        ctx: ctx.clone(),
        endpoints: *endpoints,
        options: ctx.list_options().keep_previous_data(),
        query: String::new(),
        subscription: None,
        previous: None,
        _marker: PhantomData,
    };
    hook.set_query(query);
    hook
}

impl<T: DeserializeOwned> SearchHook<T> {
    /// Switch to a new query. A blank query unsubscribes and clears the
    /// results.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        let key = CacheKey::query(&self.endpoints, query);
        if key.as_ref() == self.key() && key.is_some() {
            return;
        }

        match &key {
            Some(_) => {
                let current = self
                    .subscription
                    .as_ref()
                    .and_then(|subscription| subscription.snapshot().data);
                if current.is_some() {
                    self.previous = current;
                }
            }
            None => self.previous = None,
        }

        // Subscribe before dropping the old subscription so a key shared
        // with it never loses its last subscriber in between.
        let subscription =
            key.map(|key| self.ctx.cache().subscribe(key, self.options));
        self.subscription = subscription;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn state(&self) -> SearchHookReturn<T> {
        match &self.subscription {
            Some(subscription) => self.view(&subscription.snapshot()),
            None => SearchHookReturn::idle(),
        }
    }

    fn view(&self, snapshot: &Snapshot) -> SearchHookReturn<T> {
        let fallback = self
            .options
            .keep_previous_data
            .then_some(self.previous.as_ref())
            .flatten();
        SearchHookReturn::from_parts(snapshot, fallback)
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

    pub async fn settled(&self) -> SearchHookReturn<T> {
        match &self.subscription {
            Some(subscription) => self.view(&subscription.settled().await),
            None => SearchHookReturn::idle(),
        }
    }

    pub fn key(&self) -> Option<&CacheKey> {
        self.subscription.as_ref().map(Subscription::key)
    }
}
