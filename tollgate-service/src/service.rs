use crate::error::ServiceError;
use crate::locks::EntityLocks;
use std::sync::Arc;
use tollgate_booking::Reservation;
use tollgate_core::{Clock, EventSink};
use tollgate_engine::FulfillmentEngine;
use tollgate_order::Order;
use tollgate_store::{Config, OrderRepository, ReservationRepository};
use uuid::Uuid;

/// Runs engine operations against stored entities.
///
/// Each call holds the entity's lock across load, decide and save, so two
/// requests for the same order or reservation never interleave.
pub struct FulfillmentService {
    engine: Arc<FulfillmentEngine>,
    orders: Arc<dyn OrderRepository>,
    reservations: Arc<dyn ReservationRepository>,
    locks: EntityLocks,
}

impl FulfillmentService {
    pub fn new(
        engine: Arc<FulfillmentEngine>,
        orders: Arc<dyn OrderRepository>,
        reservations: Arc<dyn ReservationRepository>,
    ) -> Self {
        Self {
            engine,
            orders,
            reservations,
            locks: EntityLocks::new(),
        }
    }

    /// Build the engine from configuration
    pub fn from_config(
        config: &Config,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventSink>,
        orders: Arc<dyn OrderRepository>,
        reservations: Arc<dyn ReservationRepository>,
    ) -> Self {
        let rules = &config.business_rules;
        let engine = FulfillmentEngine::new(
            clock,
            Arc::new(config.shipping.rate_table()),
            rules.cancellation_policy(),
        )
        .with_lead_days(rules.shipping_lead_days)
        .with_event_sink(events);

        tracing::info!(
            lead_days = rules.shipping_lead_days,
            gold_notice_hours = rules.gold_notice_hours,
            regular_notice_hours = rules.regular_notice_hours,
            "fulfillment service configured"
        );
        Self::new(Arc::new(engine), orders, reservations)
    }

    pub fn engine(&self) -> &FulfillmentEngine {
        &self.engine
    }

    pub async fn ship_order(&self, order_id: Uuid) -> Result<Order, ServiceError> {
        let _guard = self.locks.acquire(order_id).await;

        let mut order = self
            .orders
            .get_order(order_id)
            .await
            .map_err(|e| anyhow::anyhow!(e))?
            .ok_or(ServiceError::OrderNotFound(order_id))?;

        self.engine.process(&mut order)?;

        self.orders
            .save_order(&order)
            .await
            .map_err(|e| anyhow::anyhow!(e))?;
        Ok(order)
    }

    pub async fn cancel_reservation(&self, reservation_id: Uuid) -> Result<Reservation, ServiceError> {
        let _guard = self.locks.acquire(reservation_id).await;

        let mut reservation = self
            .reservations
            .get_reservation(reservation_id)
            .await
            .map_err(|e| anyhow::anyhow!(e))?
            .ok_or(ServiceError::ReservationNotFound(reservation_id))?;

        self.engine.cancel(&mut reservation)?;

        self.reservations
            .save_reservation(&reservation)
            .await
            .map_err(|e| anyhow::anyhow!(e))?;
        Ok(reservation)
    }

    /// Entities with a call in flight
    pub fn locked_entities(&self) -> usize {
        self.locks.len()
    }
}
