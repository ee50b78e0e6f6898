use crate::models::{CustomerTier, Reservation, ReservationStatus};
use crate::policy::{CancellationPolicy, ReasonCode};
use chrono::{DateTime, Duration, Utc};
use std::fmt;
use uuid::Uuid;

/// What a successful cancellation looked like
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancellationReceipt {
    pub reservation_id: Uuid,
    pub tier: CustomerTier,
    pub canceled_at: DateTime<Utc>,
    /// How far ahead of the start the cancellation came in
    pub notice_given: Duration,
}

/// Applies the cancellation policy to reservations
pub struct CancellationHandler {
    policy: CancellationPolicy,
}

impl CancellationHandler {
    pub fn new(policy: CancellationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &CancellationPolicy {
        &self.policy
    }

    /// Active → Canceled, if the policy allows it at `now`.
    ///
    /// A canceled reservation is terminal: canceling it again is an
    /// `AlreadyCanceled` error and the policy is not consulted.
    pub fn cancel(
        &self,
        reservation: &mut Reservation,
        now: DateTime<Utc>,
    ) -> Result<CancellationReceipt, ReservationError> {
        if let ReservationStatus::Canceled { at: canceled_at } = reservation.status() {
            return Err(ReservationError::AlreadyCanceled {
                reservation_id: reservation.id,
                canceled_at,
            });
        }

        let tier = reservation.customer.tier();
        let decision = self.policy.is_cancelable(tier, now, reservation.start_time);

        let cause = match decision.reason {
            ReasonCode::Allowed => None,
            ReasonCode::AlreadyStarted => Some(TooLateCause::AlreadyStarted {
                started_at: reservation.start_time,
            }),
            ReasonCode::InsufficientNotice { required, remaining } => {
                Some(TooLateCause::InsufficientNotice { required, remaining })
            }
        };
        if let Some(cause) = cause {
            return Err(ReservationError::TooLateToCancel {
                reservation_id: reservation.id,
                tier,
                cause,
            });
        }

        reservation.mark_canceled(now);
        Ok(CancellationReceipt {
            reservation_id: reservation.id,
            tier,
            canceled_at: now,
            notice_given: reservation.start_time - now,
        })
    }
}

impl Default for CancellationHandler {
    fn default() -> Self {
        Self::new(CancellationPolicy::default())
    }
}

/// Why a cancellation came too late
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TooLateCause {
    AlreadyStarted {
        started_at: DateTime<Utc>,
    },
    InsufficientNotice {
        required: Duration,
        remaining: Duration,
    },
}

impl TooLateCause {
    pub fn code(&self) -> &'static str {
        match self {
            Self::AlreadyStarted { .. } => "ALREADY_STARTED",
            Self::InsufficientNotice { .. } => "INSUFFICIENT_NOTICE",
        }
    }
}

impl fmt::Display for TooLateCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyStarted { started_at } => write!(f, "already started at {}", started_at),
            Self::InsufficientNotice { required, remaining } => write!(
                f,
                "{} minutes notice given, {} hours required",
                remaining.num_minutes(),
                required.num_hours()
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReservationError {
    #[error("Too late to cancel reservation {reservation_id} ({tier}): {cause}")]
    TooLateToCancel {
        reservation_id: Uuid,
        tier: CustomerTier,
        cause: TooLateCause,
    },

    #[error("Reservation {reservation_id} already canceled at {canceled_at}")]
    AlreadyCanceled {
        reservation_id: Uuid,
        canceled_at: DateTime<Utc>,
    },
}
