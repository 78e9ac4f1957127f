use super::*;
use crate::utils::{BookingError, RejectReason};


#[tokio::test]
async fn assign_binds_and_records_history() {
    let ctx = setup().await;
    let tz = ctx.engine.state().config.timezone;
    let table = add_table(&ctx, 5, 4, TableLocation::Indoor).await;

    let (date, time) = slot_in_hours(tz, 3);
    let reservation = make_reservation(&ctx, 4, TableLocation::Indoor, &date, &time).await;
    ctx.engine
        .assign(BookingRef::Reservation(reservation.id), table.id, &staff())
        .await
        .unwrap();

    let history = ctx
        .engine
        .status_history(BookingRef::Reservation(reservation.id))
        .await
        .unwrap();
    let last = history.last().unwrap();
    assert_eq!(last.note.as_deref(), Some("assigned to table 5"));
    assert_eq!(last.actor().name, "Alice");
    assert_eq!(last.actor_role, ActorRole::Staff);
}


#[tokio::test]
async fn pending_binding_does_not_mark_table_reserved() {
    let ctx = setup().await;
    let tz = ctx.engine.state().config.timezone;
    let table = add_table(&ctx, 1, 4, TableLocation::Indoor).await;

    let (date, time) = slot_in_hours(tz, 3);
    let reservation = make_reservation(&ctx, 2, TableLocation::Indoor, &date, &time).await;
    ctx.engine
        .assign(BookingRef::Reservation(reservation.id), table.id, &staff())
        .await
        .unwrap();

    // Only a confirmed reservation reserves the table
    let summary = ctx.engine.table_summary(table.id).await.unwrap();
    assert_eq!(summary.status, TableStatus::Available);

    ctx.engine
        .transition_reservation(reservation.id, ReservationStatus::Confirmed, &staff(), None)
        .await
        .unwrap();
    let summary = ctx.engine.table_summary(table.id).await.unwrap();
    assert_eq!(summary.status, TableStatus::Reserved);
}


#[tokio::test]
async fn capacity_exceeded_is_rejected() {
    let ctx = setup().await;
    let tz = ctx.engine.state().config.timezone;
    let table = add_table(&ctx, 1, 4, TableLocation::Indoor).await;

    let (date, time) = slot_in_hours(tz, 3);
    let reservation = make_reservation(&ctx, 6, TableLocation::Indoor, &date, &time).await;
    let err = ctx
        .engine
        .assign(BookingRef::Reservation(reservation.id), table.id, &staff())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BookingError::Rejected(RejectReason::CapacityExceeded)
    ));
}


#[tokio::test]
async fn location_mismatch_is_rejected() {
    let ctx = setup().await;
    let tz = ctx.engine.state().config.timezone;
    let table = add_table(&ctx, 1, 4, TableLocation::Indoor).await;

    let (date, time) = slot_in_hours(tz, 3);
    let reservation = make_reservation(&ctx, 2, TableLocation::Outdoor, &date, &time).await;
    let err = ctx
        .engine
        .assign(BookingRef::Reservation(reservation.id), table.id, &staff())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BookingError::Rejected(RejectReason::LocationMismatch)
    ));
}


#[tokio::test]
async fn inactive_table_is_rejected() {
    let ctx = setup().await;
    let tz = ctx.engine.state().config.timezone;
    let table = add_table(&ctx, 1, 4, TableLocation::Indoor).await;
    ctx.engine
        .update_table(
            table.id,
            DiningTableUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let (date, time) = slot_in_hours(tz, 3);
    let reservation = make_reservation(&ctx, 2, TableLocation::Indoor, &date, &time).await;
    let err = ctx
        .engine
        .assign(BookingRef::Reservation(reservation.id), table.id, &staff())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BookingError::Rejected(RejectReason::TableInactive)
    ));
}


#[tokio::test]
async fn overlapping_window_is_rejected_at_bind_time() {
    let ctx = setup().await;
    let tz = ctx.engine.state().config.timezone;
    let table = add_table(&ctx, 7, 4, TableLocation::Indoor).await;

    let (date, time) = slot_in_hours(tz, 3);
    let first = make_reservation(&ctx, 2, TableLocation::Indoor, &date, &time).await;
    ctx.engine
        .assign(BookingRef::Reservation(first.id), table.id, &staff())
        .await
        .unwrap();

    let (date2, time2) = slot_in_hours(tz, 4);
    let second = make_reservation(&ctx, 2, TableLocation::Indoor, &date2, &time2).await;
    let err = ctx
        .engine
        .assign(BookingRef::Reservation(second.id), table.id, &staff())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BookingError::Rejected(RejectReason::TimeConflict)
    ));
    assert!(err.is_retryable());
}


#[tokio::test]
async fn double_assignment_is_rejected() {
    let ctx = setup().await;
    let tz = ctx.engine.state().config.timezone;
    add_table(&ctx, 1, 4, TableLocation::Indoor).await;
    let other = add_table(&ctx, 2, 4, TableLocation::Indoor).await;

    let (date, time) = slot_in_hours(tz, 3);
    let reservation = make_reservation(&ctx, 2, TableLocation::Indoor, &date, &time).await;
    let table = ctx
        .engine
        .assignment()
        .resolve_and_assign(BookingRef::Reservation(reservation.id), &staff())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(table.number, 1);

    let err = ctx
        .engine
        .assign(BookingRef::Reservation(reservation.id), other.id, &staff())
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Validation(_)));
}


#[tokio::test]
async fn release_frees_the_table() {
    let ctx = setup().await;
    let table = add_table(&ctx, 3, 4, TableLocation::Indoor).await;

    let order = make_order(&ctx, OrderKind::DineIn, 3, None).await;
    ctx.engine
        .assign(BookingRef::Order(order.id), table.id, &staff())
        .await
        .unwrap();
    ctx.engine
        .transition_order(order.id, OrderStatus::Confirmed, &staff(), None)
        .await
        .unwrap();
    assert_eq!(
        ctx.engine.table_summary(table.id).await.unwrap().status,
        TableStatus::Occupied
    );

    ctx.engine
        .release(BookingRef::Order(order.id), &staff())
        .await
        .unwrap();
    assert_eq!(
        ctx.engine.table_summary(table.id).await.unwrap().status,
        TableStatus::Available
    );

    let history = ctx
        .engine
        .status_history(BookingRef::Order(order.id))
        .await
        .unwrap();
    assert_eq!(
        history.last().unwrap().note.as_deref(),
        Some("released table 3")
    );
}


#[tokio::test]
async fn releasing_unbound_booking_is_a_noop() {
    let ctx = setup().await;
    let order = make_order(&ctx, OrderKind::DineIn, 3, None).await;
    ctx.engine
        .release(BookingRef::Order(order.id), &staff())
        .await
        .unwrap();
}


#[tokio::test]
async fn order_covers_come_from_item_count_bounds() {
    let ctx = setup().await;
    // Only a 2-seat table exists
    let table = add_table(&ctx, 1, 2, TableLocation::Indoor).await;

    // One item clamps up to the 2-cover floor: fits
    let small = make_order(&ctx, OrderKind::DineIn, 1, None).await;
    ctx.engine
        .assign(BookingRef::Order(small.id), table.id, &staff())
        .await
        .unwrap();
    ctx.engine
        .release(BookingRef::Order(small.id), &staff())
        .await
        .unwrap();

    // Ten items clamp down to the 4-cover ceiling: too big for 2 seats
    let big = make_order(&ctx, OrderKind::DineIn, 10, None).await;
    let err = ctx
        .engine
        .assign(BookingRef::Order(big.id), table.id, &staff())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BookingError::Rejected(RejectReason::CapacityExceeded)
    ));

    // An explicit guest count overrides the estimate
    let stated = make_order(&ctx, OrderKind::DineIn, 10, Some(2)).await;
    ctx.engine
        .assign(BookingRef::Order(stated.id), table.id, &staff())
        .await
        .unwrap();
}


#[tokio::test]
async fn takeaway_orders_cannot_take_tables() {
    let ctx = setup().await;
    let table = add_table(&ctx, 1, 4, TableLocation::Indoor).await;

    let order = make_order(&ctx, OrderKind::Takeaway, 2, None).await;
    let err = ctx
        .engine
        .assign(BookingRef::Order(order.id), table.id, &staff())
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Validation(_)));
}


#[tokio::test]
async fn auto_assignment_miss_is_not_fatal() {
    let ctx = setup().await;
    // No tables at all
    let tz = ctx.engine.state().config.timezone;
    let (date, time) = slot_in_hours(tz, 3);
    let reservation = make_reservation(&ctx, 2, TableLocation::Indoor, &date, &time).await;

    let confirmed = ctx
        .engine
        .transition_reservation(reservation.id, ReservationStatus::Confirmed, &staff(), None)
        .await
        .unwrap();
    assert_eq!(confirmed.status, ReservationStatus::Confirmed);
    assert_eq!(confirmed.table_id, None);
}


#[tokio::test]
async fn confirm_auto_assigns_system_attributed_table() {
    let ctx = setup().await;
    let tz = ctx.engine.state().config.timezone;
    add_table(&ctx, 5, 4, TableLocation::Indoor).await;

    let (date, time) = slot_in_hours(tz, 3);
    let reservation = make_reservation(&ctx, 4, TableLocation::Indoor, &date, &time).await;
    let confirmed = ctx
        .engine
        .transition_reservation(reservation.id, ReservationStatus::Confirmed, &staff(), None)
        .await
        .unwrap();
    assert!(confirmed.table_id.is_some());

    let history = ctx
        .engine
        .status_history(BookingRef::Reservation(reservation.id))
        .await
        .unwrap();
    let binding = history.last().unwrap();
    assert_eq!(binding.note.as_deref(), Some("assigned to table 5"));
    assert_eq!(binding.actor_role, ActorRole::System);
}
