use crate::models::{Order, Shipment};
use crate::shipping::{PricingError, ShippingCostStrategy};
use chrono::{Days, NaiveDate};
use std::sync::Arc;
use uuid::Uuid;

/// Shipments leave the day after processing unless configured otherwise
pub const DEFAULT_LEAD_DAYS: u32 = 1;

/// Turns unshipped orders into shipped ones
pub struct OrderProcessor {
    strategy: Arc<dyn ShippingCostStrategy>,
    lead_days: u32,
}

impl OrderProcessor {
    pub fn new(strategy: Arc<dyn ShippingCostStrategy>) -> Self {
        Self {
            strategy,
            lead_days: DEFAULT_LEAD_DAYS,
        }
    }

    pub fn with_lead_days(mut self, lead_days: u32) -> Self {
        self.lead_days = lead_days;
        self
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    /// Price and attach the shipment.
    ///
    /// Every check runs before the order is touched: on error the order is
    /// exactly as it was passed in.
    pub fn process(&self, order: &mut Order, today: NaiveDate) -> Result<Shipment, OrderError> {
        if order.is_shipped() {
            return Err(OrderError::AlreadyShipped(order.id));
        }

        let cost = self
            .strategy
            .calculate(order)
            .and_then(|cost| {
                if cost.currency != order.currency {
                    return Err(PricingError::CurrencyMismatch {
                        expected: order.currency,
                        actual: cost.currency,
                    });
                }
                if cost.is_negative() {
                    return Err(PricingError::NegativeCost(cost));
                }
                Ok(cost)
            })
            .map_err(|source| OrderError::UnpriceableOrder {
                order_id: order.id,
                source,
            })?;

        let shipping_date = today
            .checked_add_days(Days::new(u64::from(self.lead_days)))
            .ok_or(OrderError::ShippingDateOutOfRange {
                order_id: order.id,
                today,
                lead_days: self.lead_days,
            })?;

        let shipment = Shipment::new(cost, shipping_date, self.strategy.name().to_string());
        order.attach_shipment(shipment.clone());

        tracing::debug!(
            order_id = %order.id,
            cost = %cost,
            %shipping_date,
            "shipment attached"
        );
        Ok(shipment)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrderError {
    #[error("Order already shipped: {0}")]
    AlreadyShipped(Uuid),

    #[error("Order {order_id} could not be priced: {source}")]
    UnpriceableOrder {
        order_id: Uuid,
        #[source]
        source: PricingError,
    },

    #[error("Shipping date out of range for order {order_id}: {today} + {lead_days} days")]
    ShippingDateOutOfRange {
        order_id: Uuid,
        today: NaiveDate,
        lead_days: u32,
    },
}

impl OrderError {
    /// Only pricing failures may succeed on a later attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::UnpriceableOrder { .. })
    }
}
