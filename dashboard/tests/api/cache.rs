use std::time::Duration;

use dashboard::FetchError;
use dashboard::resources::{bookings, rooms};
use payloads::BookingId;
use payloads::endpoints::BOOKING;
use serde_json::Value;
use test_helpers::{booking, spawn_app};

use crate::eventually;

#[tokio::test]
async fn detail_without_id_makes_no_request() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_bookings();

    let missing = bookings::use_booking(&app.ctx, None);
    let blank = bookings::use_booking(&app.ctx, Some(&BookingId::from("  ")));

    for state in [missing.state(), blank.state()] {
        assert_eq!(state.entity, None);
        assert!(!state.is_loading);
        assert!(!state.is_validating);
        assert_eq!(state.error, None);
    }
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(app.mock.requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn list_loads_then_settles() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_bookings();

    let hook = bookings::use_bookings(&app.ctx);
    let pending = hook.state();
    assert!(pending.is_loading);
    assert!(pending.is_validating);
    assert!(!pending.is_empty);

    let loaded = hook.settled().await;
    assert!(!loaded.is_loading);
    assert!(!loaded.is_validating);
    assert!(!loaded.is_empty);
    assert_eq!(loaded.items.len(), 2);
    assert_eq!(loaded.items[0].guest_name.as_deref(), Some("Ada Byron"));
    Ok(())
}

#[tokio::test]
async fn empty_collection_is_empty_not_loading() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let state = bookings::use_bookings(&app.ctx).settled().await;
    assert!(state.items.is_empty());
    assert!(!state.is_loading);
    assert!(state.is_empty);
    assert_eq!(state.error, None);
    Ok(())
}

#[tokio::test]
async fn concurrent_reads_share_one_request() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_bookings();
    app.mock.set_latency("/api/booking", Duration::from_millis(100));

    let first = bookings::use_bookings(&app.ctx);
    let second = bookings::use_bookings(&app.ctx);
    first.refresh();
    second.refresh();
    first.settled().await;
    second.settled().await;
    assert_eq!(app.mock.count("GET", "/api/booking"), 1);

    // two quick refreshes add at most one request
    first.refresh();
    first.refresh();
    first.settled().await;
    assert_eq!(app.mock.count("GET", "/api/booking"), 2);
    Ok(())
}

#[tokio::test]
async fn revalidation_keeps_showing_data() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_bookings();
    let hook = bookings::use_bookings(&app.ctx);
    hook.settled().await;

    app.mock.set_latency("/api/booking", Duration::from_millis(100));
    hook.refresh();
    let state = hook.state();
    assert!(state.is_validating);
    assert!(!state.is_loading);
    assert_eq!(state.items.len(), 2);

    let state = hook.settled().await;
    assert!(!state.is_validating);
    assert_eq!(state.items.len(), 2);
    Ok(())
}

#[tokio::test]
async fn response_started_before_invalidation_is_discarded()
-> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_bookings();
    app.mock.set_latency("/api/booking", Duration::from_millis(150));

    // This fetch sees both bookings but arrives late.
    let hook = bookings::use_bookings(&app.ctx);
    eventually(|| app.mock.count("GET", "/api/booking") == 1).await?;
    app.mock.seed(&BOOKING, vec![booking("b1", "Ada Byron", "r1", "reserved")]);
    app.ctx.cache().invalidate(&bookings::list_key()).await;

    let state = hook.state();
    assert!(!state.is_validating);
    assert_eq!(state.items.len(), 1);
    assert_eq!(app.mock.count("GET", "/api/booking"), 2);
    Ok(())
}

#[tokio::test]
async fn failed_list_fetch_retries_with_backoff() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_bookings();
    app.mock.fail_times("GET", "/api/booking", 500, 2);
    let ctx = app.retrying_context();

    let mut hook = bookings::use_bookings(&ctx);
    let first = hook.settled().await;
    assert_eq!(
        first.error,
        Some(FetchError::Api {
            status: 500,
            message: "Injected failure".into(),
        })
    );
    assert!(first.is_empty);

    while hook.state().items.is_empty() {
        tokio::time::timeout(Duration::from_secs(2), hook.changed()).await?;
    }
    let state = hook.settled().await;
    assert_eq!(state.error, None);
    assert_eq!(state.items.len(), 2);
    assert_eq!(app.mock.count("GET", "/api/booking"), 3);
    Ok(())
}

#[tokio::test]
async fn retries_stop_at_the_delay_cap() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.mock.fail_times("GET", "/api/booking", 503, 10);
    let ctx = app.retrying_context();

    let hook = bookings::use_bookings(&ctx);
    // 20ms, 40ms and 80ms retries after the first attempt, then nothing
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(app.mock.count("GET", "/api/booking"), 4);

    let state = hook.state();
    assert!(!state.is_loading);
    assert!(state.is_empty);
    assert_eq!(state.error.and_then(|e| e.status()), Some(503));
    Ok(())
}

#[tokio::test]
async fn details_are_not_retried() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let ctx = app.retrying_context();

    let hook = rooms::use_room(&ctx, Some(&"nope".into()));
    let state = hook.settled().await;
    assert_eq!(state.error.as_ref().and_then(FetchError::status), Some(404));
    assert_eq!(state.entity, None);
    assert!(state.is_empty);

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(app.mock.count("GET", "/api/room/nope"), 1);
    Ok(())
}

#[tokio::test]
async fn slow_responses_time_out() -> anyhow::Result<()> {
    let app =
        test_helpers::spawn_app_with_timeout(Duration::from_millis(100)).await;
    app.seed_rooms();
    app.mock.set_latency("/api/room", Duration::from_millis(400));

    let state = rooms::use_room(&app.ctx, Some(&"r1".into())).settled().await;
    assert_eq!(state.error, Some(FetchError::Timeout));
    assert_eq!(state.entity, None);
    Ok(())
}

#[tokio::test]
async fn focus_and_reconnect_refetch_lists_only() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_rooms();
    let list = rooms::use_rooms(&app.ctx);
    let detail = rooms::use_room(&app.ctx, Some(&"r1".into()));
    list.settled().await;
    detail.settled().await;

    app.ctx.cache().on_focus();
    list.settled().await;
    app.ctx.cache().on_reconnect();
    list.settled().await;

    assert_eq!(app.mock.count("GET", "/api/room"), 3);
    assert_eq!(app.mock.count("GET", "/api/room/r1"), 1);
    Ok(())
}

#[tokio::test]
async fn dropped_hooks_leave_entries_for_garbage_collection()
-> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_rooms();
    app.mock.set_latency("/api/room", Duration::from_millis(100));
    let cache = app.ctx.cache();
    let key = rooms::list_key();

    let hook = rooms::use_rooms(&app.ctx);
    assert_eq!(cache.subscriber_count(&key), 1);
    drop(hook);
    assert_eq!(cache.subscriber_count(&key), 0);

    // still in flight
    assert_eq!(cache.collect_garbage(), 0);

    eventually(|| cache.peek(&key).is_some()).await?;
    let cached = cache.peek(&key);
    assert_eq!(
        cached.as_deref().and_then(Value::as_array).map(Vec::len),
        Some(3)
    );
    assert_eq!(cache.collect_garbage(), 1);
    assert!(!cache.contains(&key));
    Ok(())
}

#[tokio::test]
async fn remounting_fresh_data_does_not_refetch() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_rooms();

    let first = rooms::use_rooms(&app.ctx);
    first.settled().await;
    drop(first);

    let second = rooms::use_rooms(&app.ctx);
    let state = second.state();
    assert!(!state.is_validating);
    assert_eq!(state.items.len(), 3);
    assert_eq!(app.mock.count("GET", "/api/room"), 1);
    Ok(())
}
