use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tollgate_booking::{Customer, Reservation, ReservationError, TooLateCause};
use tollgate_core::{CurrencyCode, FixedClock, FulfillmentEvent};
use tollgate_order::{Destination, LocationType, Order, OrderError, OrderItem, PricingError};
use tollgate_service::{FulfillmentService, ServiceError};
use tollgate_store::{
    Config, EventLog, MemoryOrderRepository, MemoryReservationRepository, OrderRepository,
    ReservationRepository,
};
use uuid::Uuid;

const CONFIG: &str = r#"
    [business_rules]
    shipping_lead_days = 1
    gold_notice_hours = 24
    regular_notice_hours = 48
    currency = "USD"

    [shipping.domestic]
    kind = "free_over"
    threshold = "50.00"
    otherwise = "4.99"

    [shipping.international]
    kind = "weight_based"
    base = "12.00"
    per_kg = "3.50"
"#;

struct Harness {
    service: Arc<FulfillmentService>,
    clock: Arc<FixedClock>,
    events: Arc<EventLog>,
    orders: Arc<MemoryOrderRepository>,
    reservations: Arc<MemoryReservationRepository>,
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 12, 20, 10, 0, 0).unwrap()
}

fn harness() -> Harness {
    // Another test may have installed it already
    let _ = tollgate_service::telemetry::init_tracing();

    let config = Config::from_toml_str(CONFIG).unwrap();
    let clock = Arc::new(FixedClock::new(now()));
    let events = Arc::new(EventLog::default());
    let orders = Arc::new(MemoryOrderRepository::new());
    let reservations = Arc::new(MemoryReservationRepository::new());

    let service = FulfillmentService::from_config(
        &config,
        clock.clone(),
        events.clone(),
        orders.clone(),
        reservations.clone(),
    );

    Harness {
        service: Arc::new(service),
        clock,
        events,
        orders,
        reservations,
    }
}

fn order(location: LocationType) -> Order {
    let mut order = Order::new(
        "customer@example.com".to_string(),
        Destination::new("US", "73301", location),
        CurrencyCode::USD,
        now(),
    );
    order.add_item(
        OrderItem::new("KETTLE", "Kettle", 1, Decimal::new(2999, 2)).with_weight(Decimal::new(120, 2)),
    );
    order
}

#[tokio::test]
async fn test_ship_stored_order() {
    let h = harness();
    let order = order(LocationType::Domestic);
    h.orders.save_order(&order).await.unwrap();

    let shipped = h.service.ship_order(order.id).await.unwrap();

    let shipment = shipped.shipment().unwrap();
    assert_eq!(shipment.cost().amount, Decimal::new(499, 2));
    assert_eq!(shipment.shipping_date(), NaiveDate::from_ymd_opt(2024, 12, 21).unwrap());
    assert_eq!(shipment.strategy(), "rate_table");

    let stored = h.orders.get_order(order.id).await.unwrap().unwrap();
    assert_eq!(stored, shipped);
    assert_eq!(h.events.len(), 1);
}

#[tokio::test]
async fn test_international_weight_pricing() {
    let h = harness();
    let order = order(LocationType::International);
    h.orders.save_order(&order).await.unwrap();

    let shipped = h.service.ship_order(order.id).await.unwrap();

    // 12.00 + 3.50 × 1.2
    assert_eq!(shipped.shipment().unwrap().cost().amount, Decimal::new(1620, 2));
}

#[tokio::test]
async fn test_unconfigured_location_is_unpriceable_and_not_saved() {
    let h = harness();
    let order = order(LocationType::Remote);
    h.orders.save_order(&order).await.unwrap();

    let err = h.service.ship_order(order.id).await.unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Order(OrderError::UnpriceableOrder {
            source: PricingError::NoRateForLocation(LocationType::Remote),
            ..
        })
    ));
    assert!(err.is_retryable());
    let stored = h.orders.get_order(order.id).await.unwrap().unwrap();
    assert!(!stored.is_shipped());
    assert!(h.events.is_empty());
}

#[tokio::test]
async fn test_ship_twice_is_rejected() {
    let h = harness();
    let order = order(LocationType::Domestic);
    h.orders.save_order(&order).await.unwrap();

    let first = h.service.ship_order(order.id).await.unwrap();
    h.clock.advance(Duration::days(2));
    let err = h.service.ship_order(order.id).await.unwrap_err();

    assert!(matches!(err, ServiceError::Order(OrderError::AlreadyShipped(id)) if id == order.id));
    assert!(!err.is_retryable());
    assert_eq!(h.orders.get_order(order.id).await.unwrap().unwrap(), first);
}

#[tokio::test]
async fn test_missing_entities() {
    let h = harness();

    assert!(matches!(
        h.service.ship_order(Uuid::new_v4()).await,
        Err(ServiceError::OrderNotFound(_))
    ));
    assert!(matches!(
        h.service.cancel_reservation(Uuid::new_v4()).await,
        Err(ServiceError::ReservationNotFound(_))
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_ship_same_order() {
    let h = harness();
    let order = order(LocationType::Domestic);
    h.orders.save_order(&order).await.unwrap();

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let service = h.service.clone();
            let id = order.id;
            tokio::spawn(async move { service.ship_order(id).await })
        })
        .collect();

    let mut shipped = 0;
    let mut rejected = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => shipped += 1,
            Err(ServiceError::Order(OrderError::AlreadyShipped(_))) => rejected += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(shipped, 1);
    assert_eq!(rejected, 7);
    assert_eq!(h.events.len(), 1);
}

#[tokio::test]
async fn test_cancel_reservation_flow() {
    let h = harness();
    let mut rx = h.events.subscribe();
    let gold = Arc::new(Customer::new("gold-guest", 150));
    let reservation = Reservation::new(gold, now() + Duration::hours(25), now());
    h.reservations.save_reservation(&reservation).await.unwrap();

    let canceled = h.service.cancel_reservation(reservation.id).await.unwrap();
    assert!(canceled.is_canceled());

    let stored = h.reservations.get_reservation(reservation.id).await.unwrap().unwrap();
    assert_eq!(stored.canceled_at(), Some(now()));

    match rx.recv().await.unwrap() {
        FulfillmentEvent::ReservationCanceled(e) => {
            assert_eq!(e.reservation_id, reservation.id);
            assert_eq!(e.hours_before_start, 25);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    let err = h.service.cancel_reservation(reservation.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::Reservation(ReservationError::AlreadyCanceled { .. })));
}

#[tokio::test]
async fn test_regular_customer_inside_notice_window() {
    let h = harness();
    let regular = Arc::new(Customer::new("regular-guest", 50));
    let reservation = Reservation::new(regular, now() + Duration::hours(47), now());
    h.reservations.save_reservation(&reservation).await.unwrap();

    let err = h.service.cancel_reservation(reservation.id).await.unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Reservation(ReservationError::TooLateToCancel {
            cause: TooLateCause::InsufficientNotice { .. },
            ..
        })
    ));
    let stored = h.reservations.get_reservation(reservation.id).await.unwrap().unwrap();
    assert!(!stored.is_canceled());
    assert_eq!(h.events.snapshot()[0].event_type(), "cancellation_rejected");
}

#[tokio::test]
async fn test_started_reservation() {
    let h = harness();
    let gold = Arc::new(Customer::new("gold-guest", 500));
    let reservation = Reservation::new(gold, now() + Duration::hours(2), now());
    h.reservations.save_reservation(&reservation).await.unwrap();

    h.clock.advance(Duration::hours(3));
    let err = h.service.cancel_reservation(reservation.id).await.unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Reservation(ReservationError::TooLateToCancel {
            cause: TooLateCause::AlreadyStarted { .. },
            ..
        })
    ));
}

#[tokio::test]
async fn test_locks_are_released_after_each_call() {
    let h = harness();
    let order = order(LocationType::Domestic);
    h.orders.save_order(&order).await.unwrap();

    h.service.ship_order(order.id).await.unwrap();
    h.service.cancel_reservation(Uuid::new_v4()).await.unwrap_err();

    assert_eq!(h.service.locked_entities(), 0);
}

#[tokio::test]
async fn test_unknown_ids_leave_no_locks_behind() {
    let h = harness();

    for _ in 0..50 {
        let err = h.service.ship_order(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::OrderNotFound(_)));
    }

    assert_eq!(h.service.locked_entities(), 0);
}
