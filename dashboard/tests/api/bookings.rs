use std::time::Duration;

use dashboard::resources::invoices::{InvoiceDelete, InvoiceUpdate};
use dashboard::resources::{Update, bookings, invoices, rooms};
use dashboard::{FetchError, MutationError};
use jiff::civil::date;
use payloads::requests::{BookingFields, ExtendStay, InvoiceFields};
use payloads::endpoints::INVOICE;
use payloads::{BookingId, BookingStatus, InvoiceId, InvoiceStatus};
use rust_decimal::dec;
use serde_json::json;
use test_helpers::spawn_app;

#[tokio::test]
async fn update_shows_the_servers_post_write_state() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_bookings();
    let b1 = BookingId::from("b1");
    let list = bookings::use_bookings(&app.ctx);
    let detail = bookings::use_booking(&app.ctx, Some(&b1));
    list.settled().await;
    detail.settled().await;

    let update = bookings::use_update_booking(&app.ctx);
    let saved = update
        .trigger(Update::new(
            "b1",
            BookingFields {
                guest_name: Some("Ada Lovelace".into()),
                ..Default::default()
            },
        ))
        .await?;
    assert_eq!(saved.guest_name.as_deref(), Some("Ada Lovelace"));

    // invalidations have settled by the time the mutation resolves
    let entity = detail.state().entity.expect("booking b1");
    assert_eq!(entity.guest_name.as_deref(), Some("Ada Lovelace"));
    let names: Vec<_> = list
        .state()
        .items
        .into_iter()
        .filter_map(|booking| booking.guest_name)
        .collect();
    assert_eq!(names, ["Ada Lovelace", "Grace Hopper"]);

    assert_eq!(app.success_toasts(), ["Booking updated"]);
    assert_eq!(update.state().error, None);
    assert!(!update.state().is_in_flight);
    Ok(())
}

#[tokio::test]
async fn failed_write_leaves_cached_data_alone() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_bookings();
    let b1 = BookingId::from("b1");
    let list = bookings::use_bookings(&app.ctx);
    let detail = bookings::use_booking(&app.ctx, Some(&b1));
    let before_list = list.settled().await;
    let before_detail = detail.settled().await;
    app.mock.clear_requests();
    app.mock.fail_next("PUT", "/api/booking/b1", 500);

    let update = bookings::use_update_booking(&app.ctx);
    let result = update
        .trigger(Update::new(
            "b1",
            BookingFields {
                guest_name: Some("Nobody".into()),
                ..Default::default()
            },
        ))
        .await;

    let expected = MutationError::Request(FetchError::Api {
        status: 500,
        message: "Injected failure".into(),
    });
    assert_eq!(result.unwrap_err(), expected);
    assert_eq!(update.state().error, Some(expected));
    assert!(!update.state().is_in_flight);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(list.state(), before_list);
    assert_eq!(detail.state(), before_detail);
    assert_eq!(app.mock.count("GET", "/api/booking"), 0);
    assert_eq!(app.mock.count("GET", "/api/booking/b1"), 0);
    assert_eq!(
        app.error_toasts(),
        ["Could not update booking: Injected failure"]
    );
    assert!(app.success_toasts().is_empty());
    Ok(())
}

#[tokio::test]
async fn cancel_sends_the_action_and_refetches_the_list() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_bookings();
    let list = bookings::use_bookings(&app.ctx);
    list.settled().await;

    let body = bookings::use_cancel_booking(&app.ctx)
        .trigger(BookingId::from("b1"))
        .await?;
    assert_eq!(body["_id"], "b1");
    assert_eq!(body["status"], "cancelled");

    assert_eq!(app.mock.count("PUT", "/api/booking/cancelBooking/b1"), 1);
    assert_eq!(app.mock.count("GET", "/api/booking"), 2);
    let cancelled = list
        .state()
        .items
        .into_iter()
        .find(|booking| booking.id.as_str() == "b1")
        .and_then(|booking| booking.status);
    assert_eq!(cancelled, Some(BookingStatus::Cancelled));
    assert_eq!(app.success_toasts(), ["Booking cancelled"]);
    Ok(())
}

#[tokio::test]
async fn missing_id_fails_before_any_request() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let cancel = bookings::use_cancel_booking(&app.ctx);

    let result = cancel.trigger(BookingId::from("")).await;

    assert!(matches!(result, Err(MutationError::InvalidInput(_))));
    assert!(matches!(
        cancel.state().error,
        Some(MutationError::InvalidInput(_))
    ));
    assert!(app.mock.requests().is_empty());
    assert_eq!(app.error_toasts().len(), 1);
    Ok(())
}

#[tokio::test]
async fn checkout_refetches_rooms_too() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_bookings();
    app.seed_rooms();
    let booking_list = bookings::use_bookings(&app.ctx);
    let room_list = rooms::use_rooms(&app.ctx);
    booking_list.settled().await;
    room_list.settled().await;

    bookings::use_checkout_booking(&app.ctx)
        .trigger(BookingId::from("b2"))
        .await?;

    assert_eq!(app.mock.count("PUT", "/api/booking/checkout/b2"), 1);
    assert_eq!(app.mock.count("GET", "/api/booking"), 2);
    assert_eq!(app.mock.count("GET", "/api/room"), 2);
    Ok(())
}

#[tokio::test]
async fn extend_stay_moves_the_check_out_date() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_bookings();
    let b1 = BookingId::from("b1");
    let detail = bookings::use_booking(&app.ctx, Some(&b1));
    detail.settled().await;

    let extended = bookings::use_extend_stay(&app.ctx)
        .trigger(Update::new(
            "b1",
            ExtendStay {
                check_out: date(2025, 3, 6),
            },
        ))
        .await?;
    assert_eq!(extended.id, b1);
    assert_eq!(extended.check_out, Some(date(2025, 3, 6)));

    let request = app
        .mock
        .requests()
        .into_iter()
        .find(|request| request.method == "PUT")
        .expect("extend stay request");
    assert_eq!(request.path, "/api/booking/extendstay/b1");
    assert_eq!(
        request.body,
        Some(json!({"checkOut": "2025-03-06"}))
    );
    let entity = detail.state().entity.expect("booking b1");
    assert_eq!(entity.check_out, Some(date(2025, 3, 6)));
    Ok(())
}

#[tokio::test]
async fn create_and_delete_refresh_the_list() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_bookings();
    let list = bookings::use_bookings(&app.ctx);
    list.settled().await;

    let created = bookings::use_create_booking(&app.ctx)
        .trigger(BookingFields {
            guest_name: Some("Katherine Johnson".into()),
            room_id: Some("r3".into()),
            check_in: Some(date(2025, 4, 1)),
            check_out: Some(date(2025, 4, 3)),
            total_price: Some(dec!(310.50)),
            ..Default::default()
        })
        .await?;
    assert!(!created.id.is_blank());
    assert_eq!(created.total_price, Some(dec!(310.50)));
    assert_eq!(list.state().items.len(), 3);

    bookings::use_delete_booking(&app.ctx)
        .trigger(BookingId::from("b2"))
        .await?;
    let ids: Vec<_> = list
        .state()
        .items
        .into_iter()
        .map(|booking| booking.id)
        .collect();
    assert_eq!(ids, [BookingId::from("b1"), created.id]);
    assert_eq!(
        app.success_toasts().len(),
        2,
        "one toast per successful write"
    );
    Ok(())
}

#[tokio::test]
async fn mutation_reports_in_flight_while_writing() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_bookings();
    app.mock
        .set_latency("/api/booking/cancelBooking", Duration::from_millis(100));
    let cancel = bookings::use_cancel_booking(&app.ctx);

    let (result, seen_in_flight) =
        tokio::join!(cancel.trigger(BookingId::from("b1")), async {
            tokio::time::sleep(Duration::from_millis(30)).await;
            cancel.state().is_in_flight
        });

    result?;
    assert!(seen_in_flight);
    assert!(!cancel.state().is_in_flight);
    Ok(())
}

#[tokio::test]
async fn invoices_for_a_booking_refresh_on_create() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_bookings();
    let b1 = BookingId::from("b1");
    let scoped = invoices::use_booking_invoices(&app.ctx, Some(&b1));
    let state = scoped.settled().await;
    assert!(state.is_empty);

    invoices::use_create_invoice(&app.ctx)
        .trigger(InvoiceFields {
            booking_id: Some(b1.clone()),
            amount: Some(dec!(540.00)),
            ..Default::default()
        })
        .await?;

    assert_eq!(app.mock.count("GET", "/api/invoice/booking/b1"), 2);
    let state = scoped.state();
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].booking_id.as_ref(), Some(&b1));

    let none = invoices::use_booking_invoices(&app.ctx, None);
    assert!(none.state().is_empty);
    assert!(!none.state().is_loading);
    Ok(())
}

#[tokio::test]
async fn invoice_writes_refresh_the_owning_bookings_list() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.mock.seed(
        &INVOICE,
        vec![json!({
            "_id": "i1",
            "bookingId": "b1",
            "amount": "540.00",
            "status": "unpaid",
        })],
    );
    let b1 = BookingId::from("b1");
    let b2 = BookingId::from("b2");
    let first = invoices::use_booking_invoices(&app.ctx, Some(&b1));
    let second = invoices::use_booking_invoices(&app.ctx, Some(&b2));
    first.settled().await;
    second.settled().await;

    // the body doesn't mention the booking
    invoices::use_update_invoice(&app.ctx)
        .trigger(InvoiceUpdate {
            invoice_id: InvoiceId::from("i1"),
            fields: InvoiceFields {
                status: Some(InvoiceStatus::Paid),
                ..Default::default()
            },
            booking_id: Some(b1.clone()),
        })
        .await?;
    assert_eq!(first.state().items[0].status, Some(InvoiceStatus::Paid));

    invoices::use_update_invoice(&app.ctx)
        .trigger(InvoiceUpdate {
            invoice_id: InvoiceId::from("i1"),
            fields: InvoiceFields {
                booking_id: Some(b2.clone()),
                ..Default::default()
            },
            booking_id: Some(b1.clone()),
        })
        .await?;
    assert!(first.state().is_empty);
    assert_eq!(second.state().items.len(), 1);

    invoices::use_delete_invoice(&app.ctx)
        .trigger(InvoiceDelete {
            invoice_id: InvoiceId::from("i1"),
            booking_id: Some(b2.clone()),
        })
        .await?;
    assert!(second.state().is_empty);
    assert_eq!(app.mock.count("GET", "/api/invoice/booking/b2"), 3);
    Ok(())
}
