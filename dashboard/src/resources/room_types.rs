use payloads::endpoints::ROOM_TYPE;
use payloads::requests::RoomTypeFields;
use payloads::{RoomType, RoomTypeId};
use serde_json::Value;

use super::{Resource, Update, rooms};
use crate::DataContext;
use crate::cache::CacheKey;
use crate::hooks::{
    DetailHook, ListHook, MutationHook, Normalize, use_detail, use_list,
    use_mutation,
};

pub const ROOM_TYPES: Resource = Resource::new(ROOM_TYPE, "room type");

pub fn list_key() -> CacheKey {
    ROOM_TYPES.list_key()
}

pub fn detail_key(id: &RoomTypeId) -> Option<CacheKey> {
    ROOM_TYPES.detail_key(id.as_str())
}

impl Normalize for RoomType {}

pub fn use_room_types(ctx: &DataContext) -> ListHook<RoomType> {
    use_list(ctx, list_key())
}

pub fn use_room_type(
    ctx: &DataContext,
    id: Option<&RoomTypeId>,
) -> DetailHook<RoomType> {
    use_detail(ctx, id.and_then(detail_key))
}

pub fn use_create_room_type(
    ctx: &DataContext,
) -> MutationHook<RoomTypeFields, RoomType> {
    use_mutation(ctx, ROOM_TYPES.create())
}

/// Rooms embed their type's name, so renaming a type refetches rooms.
pub fn use_update_room_type(
    ctx: &DataContext,
) -> MutationHook<Update<RoomTypeId, RoomTypeFields>, RoomType> {
    let def = ROOM_TYPES
        .update()
        .also_invalidates(|_: &Update<RoomTypeId, RoomTypeFields>| {
            vec![rooms::list_key()]
        });
    use_mutation(ctx, def)
}

pub fn use_delete_room_type(
    ctx: &DataContext,
) -> MutationHook<RoomTypeId, Value> {
    let def = ROOM_TYPES
        .delete()
        .also_invalidates(|_: &RoomTypeId| vec![rooms::list_key()]);
    use_mutation(ctx, def)
}
