use std::sync::Arc;
use tollgate_booking::{
    CancellationHandler, CancellationPolicy, CancellationReceipt, Reservation, ReservationError,
};
use tollgate_core::{Clock, EventSink, FulfillmentEvent, NullSink};
use tollgate_order::{Order, OrderError, OrderProcessor, Shipment, ShippingCostStrategy};
use tollgate_shared::models::events::{
    CancellationRejectedEvent, OrderShippedEvent, ReservationCanceledEvent,
};

/// Decides order shipments and reservation cancellations.
///
/// Holds no entity state: each call works only on the entity passed in,
/// so calls for different entities can run in parallel. Callers that share
/// one entity between threads must lock it themselves.
pub struct FulfillmentEngine {
    clock: Arc<dyn Clock>,
    processor: OrderProcessor,
    cancellations: CancellationHandler,
    events: Arc<dyn EventSink>,
}

impl FulfillmentEngine {
    pub fn new(
        clock: Arc<dyn Clock>,
        shipping: Arc<dyn ShippingCostStrategy>,
        policy: CancellationPolicy,
    ) -> Self {
        Self {
            clock,
            processor: OrderProcessor::new(shipping),
            cancellations: CancellationHandler::new(policy),
            events: Arc::new(NullSink),
        }
    }

    /// Days between processing and the shipping date
    pub fn with_lead_days(mut self, lead_days: u32) -> Self {
        self.processor = self.processor.with_lead_days(lead_days);
        self
    }

    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn policy(&self) -> &CancellationPolicy {
        self.cancellations.policy()
    }

    /// Ship an order that has not shipped yet
    pub fn process(&self, order: &mut Order) -> Result<Shipment, OrderError> {
        let today = self.clock.today();

        let shipment = match self.processor.process(order, today) {
            Ok(shipment) => shipment,
            Err(e) => {
                tracing::warn!(order_id = %order.id, error = %e, "order rejected");
                return Err(e);
            }
        };

        tracing::info!(
            order_id = %order.id,
            cost = %shipment.cost(),
            shipping_date = %shipment.shipping_date(),
            strategy = shipment.strategy(),
            "order shipped"
        );

        self.events.publish(FulfillmentEvent::OrderShipped(OrderShippedEvent {
            order_id: order.id,
            customer_id: order.customer_id.clone(),
            cost: shipment.cost().amount,
            currency: shipment.cost().currency.code().to_string(),
            shipping_date: shipment.shipping_date(),
            strategy: shipment.strategy().to_string(),
            timestamp: self.clock.now().timestamp(),
        }));

        Ok(shipment)
    }

    /// Cancel a reservation if the customer's tier still allows it
    pub fn cancel(
        &self,
        reservation: &mut Reservation,
    ) -> Result<CancellationReceipt, ReservationError> {
        let now = self.clock.now();

        match self.cancellations.cancel(reservation, now) {
            Ok(receipt) => {
                tracing::info!(
                    reservation_id = %reservation.id,
                    tier = %receipt.tier,
                    hours_before_start = receipt.notice_given.num_hours(),
                    "reservation canceled"
                );
                self.events.publish(FulfillmentEvent::ReservationCanceled(
                    ReservationCanceledEvent {
                        reservation_id: reservation.id,
                        customer_id: reservation.customer.id.clone(),
                        tier: receipt.tier.to_string(),
                        hours_before_start: receipt.notice_given.num_hours(),
                        timestamp: now.timestamp(),
                    },
                ));
                Ok(receipt)
            }
            Err(e) => {
                tracing::warn!(reservation_id = %reservation.id, error = %e, "cancellation rejected");
                if let ReservationError::TooLateToCancel { tier, cause, .. } = &e {
                    self.events.publish(FulfillmentEvent::CancellationRejected(
                        CancellationRejectedEvent {
                            reservation_id: reservation.id,
                            customer_id: reservation.customer.id.clone(),
                            tier: tier.to_string(),
                            reason: cause.code().to_string(),
                            timestamp: now.timestamp(),
                        },
                    ));
                }
                Err(e)
            }
        }
    }
}
