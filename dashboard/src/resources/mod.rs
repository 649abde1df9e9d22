//! Per-resource hooks.
//!
//! Each submodule binds the generic hooks to one resource: its key
//! builders (the only place that resource's cache keys are produced), its
//! read hooks, and its mutation hooks with the keys each write
//! invalidates.

pub mod bookings;
pub mod events;
pub mod floors;
pub mod invoices;
pub mod room_types;
pub mod rooms;
pub mod tasks;
pub mod users;

use payloads::Endpoints;
use serde::Serialize;
use serde_json::Value;

use crate::CacheKey;
use crate::MutationError;
use crate::hooks::{MutationDef, WriteRequest};

/// Input of an update-style mutation: which record, and what to send.
#[derive(Debug, Clone, PartialEq)]
pub struct Update<Id, F> {
    pub id: Id,
    pub fields: F,
}

impl<Id, F> Update<Id, F> {
    pub fn new(id: impl Into<Id>, fields: F) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// A REST resource and the generic mutations every resource supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    pub endpoints: Endpoints,
    /// Human name used in notifications, e.g. "room type".
    pub label: &'static str,
}

impl Resource {
    pub const fn new(endpoints: Endpoints, label: &'static str) -> Self {
        Self { endpoints, label }
    }

    pub fn list_key(&self) -> CacheKey {
        CacheKey::list(&self.endpoints)
    }

    pub fn detail_key(&self, id: &str) -> Option<CacheKey> {
        CacheKey::detail(&self.endpoints, id)
    }

    pub fn query_key(&self, term: &str) -> Option<CacheKey> {
        CacheKey::query(&self.endpoints, term)
    }

    /// The list and, when the id is present, the record's detail key.
    pub fn record_keys(&self, id: &str) -> Vec<CacheKey> {
        std::iter::once(self.list_key())
            .chain(self.detail_key(id))
            .collect()
    }

    fn require_id<'a>(&self, id: &'a impl AsRef<str>) -> Result<&'a str, MutationError> {
        let id = id.as_ref();
        if id.trim().is_empty() {
            return Err(MutationError::InvalidInput(format!(
                "{} id is required",
                self.label
            )));
        }
        Ok(id)
    }

    /// POST the fields to the collection, then refetch the list.
    pub fn create<F, O>(self) -> MutationDef<F, O>
    where
        F: Serialize + 'static,
    {
        MutationDef::new(format!("create {}", self.label), move |fields: &F| {
            WriteRequest::post(self.endpoints.list, fields)
        })
        .invalidates(move |_: &F| vec![self.list_key()])
        .messages(
            format!("{} created", capitalize(self.label)),
            format!("Could not create {}", self.label),
        )
    }

    /// PUT the fields to the record, then refetch the list and the record.
    pub fn update<Id, F, O>(self) -> MutationDef<Update<Id, F>, O>
    where
        Id: AsRef<str> + 'static,
        F: Serialize + 'static,
    {
        MutationDef::new(
            format!("update {}", self.label),
            move |update: &Update<Id, F>| {
                let id = self.require_id(&update.id)?;
                WriteRequest::put(self.endpoints.detail_path(id), &update.fields)
            },
        )
        .invalidates(move |update: &Update<Id, F>| {
            self.record_keys(update.id.as_ref())
        })
        .messages(
            format!("{} updated", capitalize(self.label)),
            format!("Could not update {}", self.label),
        )
    }

    /// DELETE the record, then refetch the list and the record.
    pub fn delete<Id>(self) -> MutationDef<Id, Value>
    where
        Id: AsRef<str> + 'static,
    {
        MutationDef::new(format!("delete {}", self.label), move |id: &Id| {
            Ok(WriteRequest::delete(
                self.endpoints.detail_path(self.require_id(id)?),
            ))
        })
        .invalidates(move |id: &Id| self.record_keys(id.as_ref()))
        .messages(
            format!("{} deleted", capitalize(self.label)),
            format!("Could not delete {}", self.label),
        )
    }

    /// PUT to `details/<action>/<id>` with no body.
    pub fn action<Id, O>(
        self,
        action: &'static str,
        name: &str,
    ) -> MutationDef<Id, O>
    where
        Id: AsRef<str> + 'static,
    {
        MutationDef::new(format!("{name} {}", self.label), move |id: &Id| {
            Ok(WriteRequest::put_empty(
                self.endpoints.action_path(action, self.require_id(id)?),
            ))
        })
        .invalidates(move |id: &Id| self.record_keys(id.as_ref()))
    }

    /// PUT a body to `details/<action>/<id>`.
    pub fn action_with<Id, B, O>(
        self,
        action: &'static str,
        name: &str,
    ) -> MutationDef<Update<Id, B>, O>
    where
        Id: AsRef<str> + 'static,
        B: Serialize + 'static,
    {
        MutationDef::new(
            format!("{name} {}", self.label),
            move |update: &Update<Id, B>| {
                let id = self.require_id(&update.id)?;
                WriteRequest::put(
                    self.endpoints.action_path(action, id),
                    &update.fields,
                )
            },
        )
        .invalidates(move |update: &Update<Id, B>| {
            self.record_keys(update.id.as_ref())
        })
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
