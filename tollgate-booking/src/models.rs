use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Customers above this many loyalty points are Gold
pub const GOLD_LOYALTY_THRESHOLD: u32 = 100;

/// Customer tier, derived from loyalty points and never stored
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerTier {
    Gold,
    Regular,
}

impl fmt::Display for CustomerTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gold => write!(f, "GOLD"),
            Self::Regular => write!(f, "REGULAR"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    pub id: String,
    pub loyalty_points: u32,
}

impl Customer {
    pub fn new(id: &str, loyalty_points: u32) -> Self {
        Self {
            id: id.to_string(),
            loyalty_points,
        }
    }

    pub fn tier(&self) -> CustomerTier {
        if self.loyalty_points > GOLD_LOYALTY_THRESHOLD {
            CustomerTier::Gold
        } else {
            CustomerTier::Regular
        }
    }
}

/// Lifecycle of a reservation. `Canceled` is terminal and carries the
/// instant it happened, so a canceled record always knows when.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Active,
    Canceled { at: DateTime<Utc> },
}

/// A booked slot starting at `start_time`.
///
/// The customer is shared with whoever owns it; a reservation only reads
/// it to classify the cancellation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reservation {
    pub id: Uuid,
    pub customer: Arc<Customer>,
    pub start_time: DateTime<Utc>,
    status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn new(
        customer: Arc<Customer>,
        start_time: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer,
            start_time,
            status: ReservationStatus::Active,
            created_at,
        }
    }

    pub fn status(&self) -> ReservationStatus {
        self.status
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self.status, ReservationStatus::Canceled { .. })
    }

    pub fn canceled_at(&self) -> Option<DateTime<Utc>> {
        match self.status {
            ReservationStatus::Canceled { at } => Some(at),
            ReservationStatus::Active => None,
        }
    }

    /// Active → Canceled; there is no way back.
    pub(crate) fn mark_canceled(&mut self, at: DateTime<Utc>) {
        self.status = ReservationStatus::Canceled { at };
    }
}
