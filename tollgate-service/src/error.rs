use tollgate_booking::ReservationError;
use tollgate_order::OrderError;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Order not found: {0}")]
    OrderNotFound(Uuid),

    #[error("Reservation not found: {0}")]
    ReservationNotFound(Uuid),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Reservation(#[from] ReservationError),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl ServiceError {
    /// Business-rule rejections are final; storage failures may clear up
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Order(e) => e.is_retryable(),
            Self::Storage(_) => true,
            _ => false,
        }
    }
}
