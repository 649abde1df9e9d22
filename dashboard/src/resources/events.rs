use payloads::endpoints::EVENT;
use payloads::requests::EventFields;
use payloads::{Event, EventId};
use serde_json::Value;

use super::{Resource, Update};
use crate::DataContext;
use crate::cache::CacheKey;
use crate::hooks::{
    DetailHook, ListHook, MutationHook, Normalize, use_detail, use_list,
    use_mutation,
};

pub const EVENTS: Resource = Resource::new(EVENT, "event");

pub fn list_key() -> CacheKey {
    EVENTS.list_key()
}

pub fn detail_key(id: &EventId) -> Option<CacheKey> {
    EVENTS.detail_key(id.as_str())
}

impl Normalize for Event {}

pub fn use_events(ctx: &DataContext) -> ListHook<Event> {
    use_list(ctx, list_key())
}

pub fn use_event(ctx: &DataContext, id: Option<&EventId>) -> DetailHook<Event> {
    use_detail(ctx, id.and_then(detail_key))
}

pub fn use_create_event(ctx: &DataContext) -> MutationHook<EventFields, Event> {
    use_mutation(ctx, EVENTS.create())
}

pub fn use_update_event(
    ctx: &DataContext,
) -> MutationHook<Update<EventId, EventFields>, Event> {
    use_mutation(ctx, EVENTS.update())
}

pub fn use_delete_event(ctx: &DataContext) -> MutationHook<EventId, Value> {
    use_mutation(ctx, EVENTS.delete())
}
