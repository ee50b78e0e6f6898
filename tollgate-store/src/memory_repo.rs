use crate::repository::{OrderRepository, RepoResult, ReservationRepository};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tollgate_booking::Reservation;
use tollgate_order::Order;
use uuid::Uuid;

/// Orders kept in process memory
#[derive(Default)]
pub struct MemoryOrderRepository {
    orders: RwLock<HashMap<Uuid, Order>>,
}

impl MemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }
}

#[async_trait]
impl OrderRepository for MemoryOrderRepository {
    async fn get_order(&self, id: Uuid) -> RepoResult<Option<Order>> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn save_order(&self, order: &Order) -> RepoResult<()> {
        self.orders.write().await.insert(order.id, order.clone());
        tracing::debug!(order_id = %order.id, shipped = order.is_shipped(), "order saved");
        Ok(())
    }
}

/// Reservations kept in process memory
#[derive(Default)]
pub struct MemoryReservationRepository {
    reservations: RwLock<HashMap<Uuid, Reservation>>,
}

impl MemoryReservationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReservationRepository for MemoryReservationRepository {
    async fn get_reservation(&self, id: Uuid) -> RepoResult<Option<Reservation>> {
        Ok(self.reservations.read().await.get(&id).cloned())
    }

    async fn save_reservation(&self, reservation: &Reservation) -> RepoResult<()> {
        self.reservations
            .write()
            .await
            .insert(reservation.id, reservation.clone());
        tracing::debug!(
            reservation_id = %reservation.id,
            status = ?reservation.status(),
            "reservation saved"
        );
        Ok(())
    }
}
