use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::broadcast;
use tollgate_core::{EventSink, FulfillmentEvent};

/// Keeps the most recent `capacity` events and fans every event out to
/// live subscribers
pub struct EventLog {
    events: Mutex<VecDeque<FulfillmentEvent>>,
    capacity: usize,
    tx: broadcast::Sender<FulfillmentEvent>,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _) = broadcast::channel(capacity);
        Self {
            events: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            tx,
        }
    }

    /// Receive events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<FulfillmentEvent> {
        self.tx.subscribe()
    }

    /// Retained events, oldest first
    pub fn snapshot(&self) -> Vec<FulfillmentEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(100)
    }
}

impl EventSink for EventLog {
    fn publish(&self, event: FulfillmentEvent) {
        tracing::debug!(event_type = event.event_type(), "event recorded");
        {
            let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
            if events.len() == self.capacity {
                events.pop_front();
            }
            events.push_back(event.clone());
        }
        // No subscribers is fine
        let _ = self.tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reservation_canceled() -> FulfillmentEvent {
        canceled_with_notice(30)
    }

    fn canceled_with_notice(hours: i64) -> FulfillmentEvent {
        serde_json::from_value(serde_json::json!({
            "type": "RESERVATION_CANCELED",
            "reservation_id": "00000000-0000-0000-0000-000000000000",
            "customer_id": "guest-1",
            "tier": "GOLD",
            "hours_before_start": hours,
            "timestamp": 1_700_000_000,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_publish_records_and_broadcasts() {
        let log = EventLog::default();
        let mut rx = log.subscribe();

        log.publish(reservation_canceled());

        assert_eq!(log.len(), 1);
        let received = rx.recv().await.unwrap();
        assert_eq!(received.event_type(), "reservation_canceled");
        assert_eq!(log.snapshot(), vec![received]);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let log = EventLog::new(4);
        assert!(log.is_empty());

        log.publish(reservation_canceled());
        log.publish(reservation_canceled());

        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_history_is_bounded() {
        let log = EventLog::new(2);

        for hours in [10, 20, 30] {
            log.publish(canceled_with_notice(hours));
        }

        assert_eq!(log.len(), 2);
        assert_eq!(
            log.snapshot(),
            vec![canceled_with_notice(20), canceled_with_notice(30)]
        );
    }
}
