use payloads::endpoints::USER;
use payloads::requests::UserFields;
use payloads::{User, UserId};
use serde_json::Value;

use super::{Resource, Update};
use crate::DataContext;
use crate::cache::CacheKey;
use crate::hooks::{
    DetailHook, ListHook, MutationHook, Normalize, SearchHook, use_detail,
    use_list, use_mutation, use_search,
};

pub const USERS: Resource = Resource::new(USER, "user");

pub fn list_key() -> CacheKey {
    USERS.list_key()
}

pub fn detail_key(id: &UserId) -> Option<CacheKey> {
    USERS.detail_key(id.as_str())
}

pub fn query_key(term: &str) -> Option<CacheKey> {
    USERS.query_key(term)
}

impl Normalize for User {}

pub fn use_users(ctx: &DataContext) -> ListHook<User> {
    use_list(ctx, list_key())
}

pub fn use_user(ctx: &DataContext, id: Option<&UserId>) -> DetailHook<User> {
    use_detail(ctx, id.and_then(detail_key))
}

pub fn use_user_search(ctx: &DataContext, query: &str) -> SearchHook<User> {
    use_search(ctx, &USER, query)
}

pub fn use_create_user(ctx: &DataContext) -> MutationHook<UserFields, User> {
    use_mutation(ctx, USERS.create())
}

pub fn use_update_user(
    ctx: &DataContext,
) -> MutationHook<Update<UserId, UserFields>, User> {
    use_mutation(ctx, USERS.update())
}

pub fn use_delete_user(ctx: &DataContext) -> MutationHook<UserId, Value> {
    use_mutation(ctx, USERS.delete())
}
