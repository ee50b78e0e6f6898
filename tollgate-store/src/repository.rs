use async_trait::async_trait;
use tollgate_booking::Reservation;
use tollgate_order::Order;
use uuid::Uuid;

pub type RepoResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Repository trait for order data access
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn get_order(&self, id: Uuid) -> RepoResult<Option<Order>>;

    /// Insert or replace
    async fn save_order(&self, order: &Order) -> RepoResult<()>;
}

/// Repository trait for reservation data access
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    async fn get_reservation(&self, id: Uuid) -> RepoResult<Option<Reservation>>;

    /// Insert or replace
    async fn save_reservation(&self, reservation: &Reservation) -> RepoResult<()>;
}
