use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tollgate_core::{CurrencyCode, Money};
use uuid::Uuid;

/// Destination classification used to pick a shipping rate
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    Domestic,
    International,
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Destination {
    pub country: String,
    pub postal_code: String,
    pub location_type: LocationType,
}

impl Destination {
    pub fn new(country: &str, postal_code: &str, location_type: LocationType) -> Self {
        Self {
            country: country.to_string(),
            postal_code: postal_code.to_string(),
            location_type,
        }
    }
}

/// A customer's order awaiting (or past) shipment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: String,
    pub items: Vec<OrderItem>,
    pub destination: Destination,
    pub currency: CurrencyCode,
    #[serde(default)]
    shipment: Option<Shipment>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn new(
        customer_id: String,
        destination: Destination,
        currency: CurrencyCode,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id,
            items: Vec::new(),
            destination,
            currency,
            shipment: None,
            created_at,
        }
    }

    /// Add an item to the order
    pub fn add_item(&mut self, item: OrderItem) {
        self.items.push(item);
    }

    pub fn is_shipped(&self) -> bool {
        self.shipment.is_some()
    }

    pub fn shipment(&self) -> Option<&Shipment> {
        self.shipment.as_ref()
    }

    /// Sum of unit price × quantity over all items, `None` on overflow
    pub fn subtotal(&self) -> Option<Decimal> {
        self.items.iter().try_fold(Decimal::ZERO, |acc, item| {
            item.unit_price
                .checked_mul(Decimal::from(item.quantity))
                .and_then(|line| acc.checked_add(line))
        })
    }

    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Only the processor attaches shipments; a set shipment is never replaced.
    pub(crate) fn attach_shipment(&mut self, shipment: Shipment) {
        debug_assert!(self.shipment.is_none());
        self.shipment = Some(shipment);
    }
}

/// An individual product within an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub weight_kg: Option<Decimal>,
}

impl OrderItem {
    pub fn new(sku: &str, name: &str, quantity: u32, unit_price: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            sku: sku.to_string(),
            name: name.to_string(),
            quantity,
            unit_price,
            weight_kg: None,
        }
    }

    pub fn with_weight(mut self, weight_kg: Decimal) -> Self {
        self.weight_kg = Some(weight_kg);
        self
    }
}

/// Shipment attached to an order once it has been processed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Shipment {
    cost: Money,
    shipping_date: NaiveDate,
    strategy: String,
}

impl Shipment {
    pub(crate) fn new(cost: Money, shipping_date: NaiveDate, strategy: String) -> Self {
        Self {
            cost,
            shipping_date,
            strategy,
        }
    }

    pub fn cost(&self) -> Money {
        self.cost
    }

    pub fn shipping_date(&self) -> NaiveDate {
        self.shipping_date
    }

    /// Name of the strategy that priced this shipment
    pub fn strategy(&self) -> &str {
        &self.strategy
    }
}
