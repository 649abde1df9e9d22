use payloads::endpoints::FLOOR;
use payloads::requests::FloorFields;
use payloads::{Floor, FloorId};
use serde_json::Value;

use super::{Resource, Update, rooms};
use crate::DataContext;
use crate::cache::CacheKey;
use crate::hooks::{
    DetailHook, ListHook, MutationHook, Normalize, use_detail, use_list,
    use_mutation,
};

pub const FLOORS: Resource = Resource::new(FLOOR, "floor");

pub fn list_key() -> CacheKey {
    FLOORS.list_key()
}

pub fn detail_key(id: &FloorId) -> Option<CacheKey> {
    FLOORS.detail_key(id.as_str())
}

impl Normalize for Floor {}

pub fn use_floors(ctx: &DataContext) -> ListHook<Floor> {
    use_list(ctx, list_key())
}

pub fn use_floor(ctx: &DataContext, id: Option<&FloorId>) -> DetailHook<Floor> {
    use_detail(ctx, id.and_then(detail_key))
}

pub fn use_create_floor(ctx: &DataContext) -> MutationHook<FloorFields, Floor> {
    use_mutation(ctx, FLOORS.create())
}

pub fn use_update_floor(
    ctx: &DataContext,
) -> MutationHook<Update<FloorId, FloorFields>, Floor> {
    use_mutation(ctx, FLOORS.update())
}

/// Deleting a floor detaches its rooms, so the room list is refetched.
pub fn use_delete_floor(ctx: &DataContext) -> MutationHook<FloorId, Value> {
    let def = FLOORS
        .delete()
        .also_invalidates(|_: &FloorId| vec![rooms::list_key()]);
    use_mutation(ctx, def)
}
