use serde::{Deserialize, Serialize};
use tollgate_shared::models::events::{
    CancellationRejectedEvent, OrderShippedEvent, ReservationCanceledEvent,
};

/// Everything the engine reports about a transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FulfillmentEvent {
    OrderShipped(OrderShippedEvent),
    ReservationCanceled(ReservationCanceledEvent),
    CancellationRejected(CancellationRejectedEvent),
}

impl FulfillmentEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::OrderShipped(_) => "order_shipped",
            Self::ReservationCanceled(_) => "reservation_canceled",
            Self::CancellationRejected(_) => "cancellation_rejected",
        }
    }
}

/// Receives events as transitions happen.
///
/// Called inline from engine operations, so implementations must not block.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: FulfillmentEvent);
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&self, event: FulfillmentEvent) {
        tracing::trace!(event_type = event.event_type(), "event discarded");
    }
}
