use payloads::endpoints::{BOOKING, booking_actions};
use payloads::requests::{BookingFields, ExtendStay};
use payloads::{Booking, BookingId, BookingStatus};
use serde_json::Value;

use super::{Resource, Update, rooms};
use crate::DataContext;
use crate::cache::CacheKey;
use crate::hooks::{
    DetailHook, ListHook, MutationHook, Normalize, SearchHook, use_detail,
    use_list, use_mutation, use_search,
};

pub const BOOKINGS: Resource = Resource::new(BOOKING, "booking");

pub fn list_key() -> CacheKey {
    BOOKINGS.list_key()
}

pub fn detail_key(id: &BookingId) -> Option<CacheKey> {
    BOOKINGS.detail_key(id.as_str())
}

pub fn query_key(term: &str) -> Option<CacheKey> {
    BOOKINGS.query_key(term)
}

impl Normalize for Booking {
    fn normalize(self) -> Self {
        Self {
            status: self.status.or(Some(BookingStatus::Reserved)),
            ..self
        }
    }
}

pub fn use_bookings(ctx: &DataContext) -> ListHook<Booking> {
    use_list(ctx, list_key())
}

pub fn use_booking(
    ctx: &DataContext,
    id: Option<&BookingId>,
) -> DetailHook<Booking> {
    use_detail(ctx, id.and_then(detail_key))
}

pub fn use_booking_search(ctx: &DataContext, query: &str) -> SearchHook<Booking> {
    use_search(ctx, &BOOKING, query)
}

pub fn use_create_booking(
    ctx: &DataContext,
) -> MutationHook<BookingFields, Booking> {
    use_mutation(ctx, BOOKINGS.create())
}

pub fn use_update_booking(
    ctx: &DataContext,
) -> MutationHook<Update<BookingId, BookingFields>, Booking> {
    use_mutation(ctx, BOOKINGS.update())
}

pub fn use_delete_booking(ctx: &DataContext) -> MutationHook<BookingId, Value> {
    use_mutation(ctx, BOOKINGS.delete())
}

/// `PUT /api/booking/cancelBooking/<id>`
pub fn use_cancel_booking(ctx: &DataContext) -> MutationHook<BookingId, Value> {
    let def = BOOKINGS
        .action(booking_actions::CANCEL, "cancel")
        .messages("Booking cancelled", "Could not cancel booking");
    use_mutation(ctx, def)
}

/// `PUT /api/booking/checkout/<id>`. Checking out frees the room, so the
/// room list is refetched too.
pub fn use_checkout_booking(
    ctx: &DataContext,
) -> MutationHook<BookingId, Value> {
    let def = BOOKINGS
        .action(booking_actions::CHECKOUT, "check out")
        .also_invalidates(|_: &BookingId| vec![rooms::list_key()])
        .messages("Guest checked out", "Could not check out guest");
    use_mutation(ctx, def)
}

/// `PUT /api/booking/extendstay/<id>` with the new check-out date.
pub fn use_extend_stay(
    ctx: &DataContext,
) -> MutationHook<Update<BookingId, ExtendStay>, Booking> {
    let def = BOOKINGS
        .action_with(booking_actions::EXTEND_STAY, "extend stay for")
        .messages("Stay extended", "Could not extend stay");
    use_mutation(ctx, def)
}
