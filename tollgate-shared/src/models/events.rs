use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct OrderShippedEvent {
    pub order_id: Uuid,
    pub customer_id: String,
    pub cost: Decimal,
    pub currency: String,
    pub shipping_date: NaiveDate,
    pub strategy: String,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct ReservationCanceledEvent {
    pub reservation_id: Uuid,
    pub customer_id: String,
    pub tier: String,
    pub hours_before_start: i64,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct CancellationRejectedEvent {
    pub reservation_id: Uuid,
    pub customer_id: String,
    pub tier: String,
    pub reason: String, // ALREADY_STARTED | INSUFFICIENT_NOTICE
    pub timestamp: i64,
}
