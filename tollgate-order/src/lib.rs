pub mod models;
pub mod shipping;
pub mod processor;

pub use models::{Destination, LocationType, Order, OrderItem, Shipment};
pub use shipping::{FnStrategy, PricingError, ShippingCostStrategy, ShippingRateTable, ShippingStrategy};
pub use processor::{OrderError, OrderProcessor};
