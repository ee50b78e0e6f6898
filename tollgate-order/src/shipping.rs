use crate::models::{LocationType, Order};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tollgate_core::{CurrencyCode, Money};
use uuid::Uuid;

/// Prices the shipment of an order.
///
/// Implementations only read the order; they see its items and
/// destination but never its shipment state. A strategy that cannot price
/// an order returns a `PricingError` instead of panicking.
pub trait ShippingCostStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn calculate(&self, order: &Order) -> Result<Money, PricingError>;
}

impl<S: ShippingCostStrategy + ?Sized> ShippingCostStrategy for Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn calculate(&self, order: &Order) -> Result<Money, PricingError> {
        (**self).calculate(order)
    }
}

/// The fixed set of named shipping strategies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShippingStrategy {
    /// Same cost for every order
    FlatRate { amount: Decimal },

    /// `base + per_kg × total weight`; every item must carry a weight
    WeightBased { base: Decimal, per_kg: Decimal },

    /// `amount × total quantity`
    PerItem { amount: Decimal },

    /// Free once the subtotal reaches `threshold`, `otherwise` below it
    FreeOver { threshold: Decimal, otherwise: Decimal },
}

impl ShippingStrategy {
    fn total_weight(order: &Order) -> Result<Decimal, PricingError> {
        order.items.iter().try_fold(Decimal::ZERO, |acc, item| {
            let weight = item.weight_kg.ok_or(PricingError::MissingWeight(item.id))?;
            weight
                .checked_mul(Decimal::from(item.quantity))
                .and_then(|line| acc.checked_add(line))
                .ok_or_else(|| PricingError::Unavailable("weight overflow".to_string()))
        })
    }
}

impl ShippingCostStrategy for ShippingStrategy {
    fn name(&self) -> &str {
        match self {
            Self::FlatRate { .. } => "flat_rate",
            Self::WeightBased { .. } => "weight_based",
            Self::PerItem { .. } => "per_item",
            Self::FreeOver { .. } => "free_over",
        }
    }

    fn calculate(&self, order: &Order) -> Result<Money, PricingError> {
        let overflow = || PricingError::Unavailable(format!("{} cost overflow", self.name()));

        let amount = match self {
            Self::FlatRate { amount } => *amount,
            Self::WeightBased { base, per_kg } => {
                if order.items.is_empty() {
                    return Err(PricingError::EmptyOrder);
                }
                let weight = Self::total_weight(order)?;
                per_kg
                    .checked_mul(weight)
                    .and_then(|variable| base.checked_add(variable))
                    .ok_or_else(overflow)?
            }
            Self::PerItem { amount } => {
                if order.items.is_empty() {
                    return Err(PricingError::EmptyOrder);
                }
                amount
                    .checked_mul(Decimal::from(order.total_quantity()))
                    .ok_or_else(overflow)?
            }
            Self::FreeOver { threshold, otherwise } => {
                let subtotal = order.subtotal().ok_or_else(overflow)?;
                if subtotal >= *threshold {
                    Decimal::ZERO
                } else {
                    *otherwise
                }
            }
        };

        Ok(Money::new(amount, order.currency))
    }
}

/// Selects a strategy by the destination's location type
#[derive(Debug, Clone, Default)]
pub struct ShippingRateTable {
    rates: HashMap<LocationType, ShippingStrategy>,
}

impl ShippingRateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(mut self, location: LocationType, strategy: ShippingStrategy) -> Self {
        self.rates.insert(location, strategy);
        self
    }

    pub fn rate_for(&self, location: LocationType) -> Option<&ShippingStrategy> {
        self.rates.get(&location)
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl ShippingCostStrategy for ShippingRateTable {
    fn name(&self) -> &str {
        "rate_table"
    }

    fn calculate(&self, order: &Order) -> Result<Money, PricingError> {
        let location = order.destination.location_type;
        let strategy = self
            .rate_for(location)
            .ok_or(PricingError::NoRateForLocation(location))?;

        tracing::debug!(
            order_id = %order.id,
            location = ?location,
            strategy = strategy.name(),
            "selected shipping rate"
        );
        strategy.calculate(order)
    }
}

/// Adapts a plain function into a strategy
pub struct FnStrategy<F> {
    name: String,
    f: F,
}

impl<F> FnStrategy<F>
where
    F: Fn(&Order) -> Result<Money, PricingError> + Send + Sync,
{
    pub fn new(name: &str, f: F) -> Self {
        Self {
            name: name.to_string(),
            f,
        }
    }
}

impl<F> fmt::Debug for FnStrategy<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStrategy").field("name", &self.name).finish()
    }
}

impl<F> ShippingCostStrategy for FnStrategy<F>
where
    F: Fn(&Order) -> Result<Money, PricingError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn calculate(&self, order: &Order) -> Result<Money, PricingError> {
        (self.f)(order)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error("Item has no weight: {0}")]
    MissingWeight(Uuid),

    #[error("No shipping rate configured for {0:?} destinations")]
    NoRateForLocation(LocationType),

    #[error("Order has no items to price")]
    EmptyOrder,

    #[error("Cost quoted in {actual:?}, order is in {expected:?}")]
    CurrencyMismatch {
        expected: CurrencyCode,
        actual: CurrencyCode,
    },

    #[error("Negative shipping cost: {0}")]
    NegativeCost(Money),

    #[error("Pricing unavailable: {0}")]
    Unavailable(String),
}
