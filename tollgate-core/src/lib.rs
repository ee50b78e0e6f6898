pub mod clock;
pub mod money;
pub mod events;

pub use clock::{Clock, FixedClock, SystemClock};
pub use money::{CurrencyCode, Money};
pub use events::{EventSink, FulfillmentEvent, NullSink};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Currency mismatch: expected {expected:?}, got {actual:?}")]
    CurrencyMismatch {
        expected: CurrencyCode,
        actual: CurrencyCode,
    },
    #[error("Arithmetic overflow: {0}")]
    Overflow(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
