use super::*;
use crate::utils::BookingError;


// ========================================================================
// Guard matrix
// ========================================================================

#[test]
fn reservation_guards() {
    use ReservationStatus::*;
    assert!(Pending.can_transition_to(Confirmed));
    assert!(Pending.can_transition_to(Cancelled));
    assert!(Confirmed.can_transition_to(Completed));
    assert!(Confirmed.can_transition_to(Cancelled));

    assert!(!Pending.can_transition_to(Completed));
    assert!(!Confirmed.can_transition_to(Pending));
    for terminal in [Completed, Cancelled] {
        for next in [Pending, Confirmed, Completed, Cancelled] {
            assert!(!terminal.can_transition_to(next));
        }
    }
}


#[test]
fn order_guards() {
    use OrderStatus::*;
    assert!(Pending.can_transition_to(Confirmed));
    assert!(Confirmed.can_transition_to(Preparing));
    assert!(Preparing.can_transition_to(Ready));
    assert!(Ready.can_transition_to(Completed));
    // Kitchen stages are optional
    assert!(Confirmed.can_transition_to(Completed));
    assert!(Preparing.can_transition_to(Completed));
    // Cancelled from any non-terminal state
    for from in [Pending, Confirmed, Preparing, Ready] {
        assert!(from.can_transition_to(Cancelled));
    }

    assert!(!Pending.can_transition_to(Preparing));
    assert!(!Ready.can_transition_to(Preparing));
    for terminal in [Completed, Cancelled] {
        for next in [Pending, Confirmed, Preparing, Ready, Completed, Cancelled] {
            assert!(!terminal.can_transition_to(next));
        }
    }
}


// ========================================================================
// Engine transitions
// ========================================================================

#[tokio::test]
async fn invalid_transition_names_the_rule() {
    let ctx = setup().await;
    let tz = ctx.engine.state().config.timezone;
    let (date, time) = slot_in_hours(tz, 3);
    let reservation = make_reservation(&ctx, 2, TableLocation::Indoor, &date, &time).await;

    let err = ctx
        .engine
        .transition_reservation(reservation.id, ReservationStatus::Completed, &staff(), None)
        .await
        .unwrap_err();
    match err {
        BookingError::InvalidTransition(msg) => {
            assert!(msg.contains("PENDING"));
            assert!(msg.contains("COMPLETED"));
        }
        other => panic!("expected InvalidTransition, got {other:?}"),
    }
}


#[tokio::test]
async fn terminal_states_are_final() {
    let ctx = setup().await;
    let tz = ctx.engine.state().config.timezone;
    let (date, time) = slot_in_hours(tz, 3);
    let reservation = make_reservation(&ctx, 2, TableLocation::Indoor, &date, &time).await;

    ctx.engine
        .transition_reservation(reservation.id, ReservationStatus::Cancelled, &staff(), None)
        .await
        .unwrap();
    let err = ctx
        .engine
        .transition_reservation(reservation.id, ReservationStatus::Confirmed, &staff(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::InvalidTransition(_)));
}


#[tokio::test]
async fn history_grows_in_order() {
    let ctx = setup().await;
    let tz = ctx.engine.state().config.timezone;
    add_table(&ctx, 1, 4, TableLocation::Indoor).await;
    let (date, time) = slot_in_hours(tz, 3);
    let reservation = make_reservation(&ctx, 2, TableLocation::Indoor, &date, &time).await;

    ctx.engine
        .transition_reservation(reservation.id, ReservationStatus::Confirmed, &staff(), None)
        .await
        .unwrap();
    ctx.engine
        .transition_reservation(
            reservation.id,
            ReservationStatus::Completed,
            &staff(),
            Some("party seated and served"),
        )
        .await
        .unwrap();

    let history = ctx
        .engine
        .status_history(BookingRef::Reservation(reservation.id))
        .await
        .unwrap();
    let statuses: Vec<&str> = history.iter().map(|e| e.status.as_str()).collect();
    // created → confirmed → auto-assigned (still CONFIRMED) → completed
    assert_eq!(
        statuses,
        vec!["PENDING", "CONFIRMED", "CONFIRMED", "COMPLETED"]
    );
    assert_eq!(
        history.last().unwrap().note.as_deref(),
        Some("party seated and served")
    );
}


#[tokio::test]
async fn customer_cancellation_respects_lead_time() {
    let ctx = setup().await;
    let tz = ctx.engine.state().config.timezone;
    let customer = Actor::customer(42, "Bob");

    // Slot one hour out is inside the 2h lead: customer is refused
    let (date, time) = slot_in_hours(tz, 1);
    let near = make_reservation(&ctx, 2, TableLocation::Indoor, &date, &time).await;
    let err = ctx
        .engine
        .transition_reservation(near.id, ReservationStatus::Cancelled, &customer, None)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::InvalidTransition(_)));

    // Staff can always cancel
    ctx.engine
        .transition_reservation(near.id, ReservationStatus::Cancelled, &staff(), None)
        .await
        .unwrap();

    // Slot five hours out is fine for self-service
    let (date, time) = slot_in_hours(tz, 5);
    let far = make_reservation(&ctx, 2, TableLocation::Indoor, &date, &time).await;
    ctx.engine
        .transition_reservation(far.id, ReservationStatus::Cancelled, &customer, None)
        .await
        .unwrap();
}


#[tokio::test]
async fn customer_cannot_cancel_confirmed_order() {
    let ctx = setup().await;
    let customer = Actor::customer(42, "Bob");
    let order = make_order(&ctx, OrderKind::DineIn, 2, None).await;

    // Pending orders may still be cancelled by the customer
    let other = make_order(&ctx, OrderKind::DineIn, 2, None).await;
    ctx.engine
        .transition_order(other.id, OrderStatus::Cancelled, &customer, None)
        .await
        .unwrap();

    ctx.engine
        .transition_order(order.id, OrderStatus::Confirmed, &staff(), None)
        .await
        .unwrap();
    let err = ctx
        .engine
        .transition_order(order.id, OrderStatus::Cancelled, &customer, None)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::InvalidTransition(_)));
}


#[tokio::test]
async fn completing_order_releases_table() {
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

    let completed = ctx
        .engine
        .transition_order(order.id, OrderStatus::Completed, &staff(), None)
        .await
        .unwrap();
    assert_eq!(completed.table_id, None);
    assert_eq!(
        ctx.engine.table_summary(table.id).await.unwrap().status,
        TableStatus::Available
    );

    // History lives on the order, not the table
    let history = ctx
        .engine
        .status_history(BookingRef::Order(order.id))
        .await
        .unwrap();
    assert_eq!(history.last().unwrap().status, "COMPLETED");
}


#[tokio::test]
async fn cancelling_reservation_releases_table() {
    let ctx = setup().await;
    let tz = ctx.engine.state().config.timezone;
    let table = add_table(&ctx, 1, 4, TableLocation::Indoor).await;

    let (date, time) = slot_in_hours(tz, 3);
    let reservation = make_reservation(&ctx, 2, TableLocation::Indoor, &date, &time).await;
    let confirmed = ctx
        .engine
        .transition_reservation(reservation.id, ReservationStatus::Confirmed, &staff(), None)
        .await
        .unwrap();
    assert_eq!(confirmed.table_id, Some(table.id));
    assert_eq!(
        ctx.engine.table_summary(table.id).await.unwrap().status,
        TableStatus::Reserved
    );

    let cancelled = ctx
        .engine
        .transition_reservation(reservation.id, ReservationStatus::Cancelled, &staff(), None)
        .await
        .unwrap();
    assert_eq!(cancelled.table_id, None);
    assert_eq!(
        ctx.engine.table_summary(table.id).await.unwrap().status,
        TableStatus::Available
    );
}


#[tokio::test]
async fn kitchen_flow_keeps_table_occupied_until_completion() {
    let ctx = setup().await;
    let table = add_table(&ctx, 1, 4, TableLocation::Indoor).await;

    let order = make_order(&ctx, OrderKind::DineIn, 3, None).await;
    ctx.engine
        .assign(BookingRef::Order(order.id), table.id, &staff())
        .await
        .unwrap();
    for status in [
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
    ] {
        ctx.engine
            .transition_order(order.id, status, &staff(), None)
            .await
            .unwrap();
        assert_eq!(
            ctx.engine.table_summary(table.id).await.unwrap().status,
            TableStatus::Occupied
        );
    }

    ctx.engine
        .transition_order(order.id, OrderStatus::Completed, &staff(), None)
        .await
        .unwrap();
    assert_eq!(
        ctx.engine.table_summary(table.id).await.unwrap().status,
        TableStatus::Available
    );
}
