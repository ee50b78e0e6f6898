use crate::models::CustomerTier;
use chrono::{DateTime, Duration, Utc};

pub const GOLD_NOTICE_HOURS: i64 = 24;
pub const REGULAR_NOTICE_HOURS: i64 = 48;

/// One row of the cancellation table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancellationRule {
    /// Nothing can be canceled once it has begun
    NotStarted,

    /// Customers of `tier` must cancel at least `notice` ahead of the start
    MinimumNotice { tier: CustomerTier, notice: Duration },
}

impl CancellationRule {
    /// `Some(reason)` when this rule denies the cancellation
    fn violation(
        &self,
        tier: CustomerTier,
        now: DateTime<Utc>,
        start_time: DateTime<Utc>,
    ) -> Option<ReasonCode> {
        match self {
            Self::NotStarted => (now > start_time).then_some(ReasonCode::AlreadyStarted),
            Self::MinimumNotice { tier: rule_tier, notice } => {
                if *rule_tier != tier {
                    return None;
                }
                let remaining = start_time - now;
                (remaining < *notice).then_some(ReasonCode::InsufficientNotice {
                    required: *notice,
                    remaining,
                })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReasonCode {
    Allowed,
    AlreadyStarted,
    InsufficientNotice { required: Duration, remaining: Duration },
}

impl ReasonCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Allowed => "ALLOWED",
            Self::AlreadyStarted => "ALREADY_STARTED",
            Self::InsufficientNotice { .. } => "INSUFFICIENT_NOTICE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancellationDecision {
    pub allowed: bool,
    pub reason: ReasonCode,
}

impl CancellationDecision {
    fn allow() -> Self {
        Self {
            allowed: true,
            reason: ReasonCode::Allowed,
        }
    }

    fn deny(reason: ReasonCode) -> Self {
        Self {
            allowed: false,
            reason,
        }
    }
}

/// Ordered rule table, evaluated top-down; the first rule that denies wins.
///
/// `NotStarted` always comes first, so a reservation that has begun reports
/// `AlreadyStarted` rather than `InsufficientNotice`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancellationPolicy {
    rules: Vec<CancellationRule>,
}

impl CancellationPolicy {
    pub fn new(gold_notice: Duration, regular_notice: Duration) -> Self {
        Self {
            rules: vec![
                CancellationRule::NotStarted,
                CancellationRule::MinimumNotice {
                    tier: CustomerTier::Gold,
                    notice: gold_notice,
                },
                CancellationRule::MinimumNotice {
                    tier: CustomerTier::Regular,
                    notice: regular_notice,
                },
            ],
        }
    }

    /// Out-of-range hours saturate to the largest representable notice
    pub fn from_hours(gold_notice_hours: i64, regular_notice_hours: i64) -> Self {
        let hours = |h: i64| Duration::try_hours(h).unwrap_or(Duration::MAX);
        Self::new(hours(gold_notice_hours), hours(regular_notice_hours))
    }

    pub fn rules(&self) -> &[CancellationRule] {
        &self.rules
    }

    /// Notice the table demands from `tier`; zero when no rule names it
    pub fn required_notice(&self, tier: CustomerTier) -> Duration {
        self.rules
            .iter()
            .find_map(|rule| match rule {
                CancellationRule::MinimumNotice { tier: t, notice } if *t == tier => Some(*notice),
                _ => None,
            })
            .unwrap_or_else(Duration::zero)
    }

    pub fn is_cancelable(
        &self,
        tier: CustomerTier,
        now: DateTime<Utc>,
        start_time: DateTime<Utc>,
    ) -> CancellationDecision {
        let decision = self
            .rules
            .iter()
            .find_map(|rule| rule.violation(tier, now, start_time))
            .map(CancellationDecision::deny)
            .unwrap_or_else(CancellationDecision::allow);

        tracing::debug!(
            %tier,
            %now,
            %start_time,
            reason = decision.reason.code(),
            "cancellation policy evaluated"
        );
        decision
    }
}

impl Default for CancellationPolicy {
    fn default() -> Self {
        Self::from_hours(GOLD_NOTICE_HOURS, REGULAR_NOTICE_HOURS)
    }
}
