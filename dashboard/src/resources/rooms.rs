use payloads::endpoints::{ROOM, STATUS_ACTION};
use payloads::requests::{RoomFields, UpdateRoomStatus};
use payloads::{Room, RoomId, RoomStatus, RoomTypeRef};
use serde_json::Value;

use super::{Resource, Update};
use crate::DataContext;
use crate::cache::CacheKey;
use crate::hooks::{
    DetailHook, ListHook, MutationHook, Normalize, SearchHook, use_detail,
    use_list, use_mutation, use_search,
};

pub const ROOMS: Resource = Resource::new(ROOM, "room");

/// Label shown for rooms whose type has no name.
pub const DEFAULT_ROOM_TYPE: &str = "Standard";

pub fn list_key() -> CacheKey {
    ROOMS.list_key()
}

pub fn detail_key(id: &RoomId) -> Option<CacheKey> {
    ROOMS.detail_key(id.as_str())
}

pub fn query_key(term: &str) -> Option<CacheKey> {
    ROOMS.query_key(term)
}

impl Normalize for Room {
    fn normalize(self) -> Self {
        let room_type = self.room_type.unwrap_or_default();
        Self {
            status: self.status.or(Some(RoomStatus::Available)),
            room_type: Some(RoomTypeRef {
                name: room_type.name.or_else(|| Some(DEFAULT_ROOM_TYPE.into())),
                ..room_type
            }),
            ..self
        }
    }
}

pub fn use_rooms(ctx: &DataContext) -> ListHook<Room> {
    use_list(ctx, list_key())
}

pub fn use_room(ctx: &DataContext, id: Option<&RoomId>) -> DetailHook<Room> {
    use_detail(ctx, id.and_then(detail_key))
}

pub fn use_room_search(ctx: &DataContext, query: &str) -> SearchHook<Room> {
    use_search(ctx, &ROOM, query)
}

pub fn use_create_room(ctx: &DataContext) -> MutationHook<RoomFields, Room> {
    use_mutation(ctx, ROOMS.create())
}

pub fn use_update_room(
    ctx: &DataContext,
) -> MutationHook<Update<RoomId, RoomFields>, Room> {
    use_mutation(ctx, ROOMS.update())
}

pub fn use_delete_room(ctx: &DataContext) -> MutationHook<RoomId, Value> {
    use_mutation(ctx, ROOMS.delete())
}

/// `PUT /api/room/status/<id>`, used by housekeeping to flip a room between
/// cleaning and available.
pub fn use_update_room_status(
    ctx: &DataContext,
) -> MutationHook<Update<RoomId, UpdateRoomStatus>, Room> {
    let def = ROOMS
        .action_with(STATUS_ACTION, "update status of")
        .messages("Room status updated", "Could not update room status");
    use_mutation(ctx, def)
}
