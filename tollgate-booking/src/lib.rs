pub mod models;
pub mod policy;
pub mod cancellation;

pub use models::{Customer, CustomerTier, Reservation, ReservationStatus};
pub use policy::{CancellationDecision, CancellationPolicy, CancellationRule, ReasonCode};
pub use cancellation::{CancellationHandler, CancellationReceipt, ReservationError, TooLateCause};
