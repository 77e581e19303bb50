use crate::types::EventRecord;
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventRecord>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventRecord> {
        self.sender.subscribe()
    }

    /// Fails only when nobody is subscribed.
    pub fn publish(
        &self,
        event: EventRecord,
    ) -> Result<(), broadcast::error::SendError<EventRecord>> {
        self.sender.send(event).map(|_| ())
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventSource;
    use chrono::Utc;

    fn record(kind: &str) -> EventRecord {
        EventRecord {
            id: "evt_test".to_string(),
            seq: 1,
            at: Utc::now(),
            correlation_id: None,
            source: EventSource::Cli,
            body: serde_json::json!({ "type": kind, "payload": {} }),
        }
    }

    #[test]
    fn publish_without_subscribers_fails() {
        let bus = EventBus::new(4);
        assert!(bus.publish(record("ProfileCreated")).is_err());
    }

    #[test]
    fn subscriber_receives_published_record() {
        let bus = EventBus::new(4);
        let mut rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);
        bus.publish(record("RoadmapCreated")).unwrap();
        let received = rx.try_recv().unwrap();
        assert_eq!(received.kind(), Some("RoadmapCreated"));
    }
}
