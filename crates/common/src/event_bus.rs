use std::fmt::Debug;
use tokio::sync::broadcast;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Topic(pub &'static str);

#[derive(Debug, Clone)]
pub struct EventEnvelope<T: Clone + Send + Sync + Debug + 'static> {
    pub topic: Topic,
    pub payload: T,
    pub ts_ms: u128,
}

/// Fan-out of typed events to any number of subscribers.
///
/// Publishing never blocks and never awaits, so it is safe to call from
/// synchronous callbacks. Subscribers that fall more than `capacity` events
/// behind observe `RecvError::Lagged`.
#[derive(Clone)]
pub struct EventBus<T: Clone + Send + Sync + Debug + 'static> {
    tx: broadcast::Sender<EventEnvelope<T>>,
}

impl<T: Clone + Send + Sync + Debug + 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new(256)
    }
}

impl<T: Clone + Send + Sync + Debug + 'static> EventBus<T> {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Returns the number of subscribers that will see the event
    pub fn publish(&self, topic: Topic, payload: T) -> usize {
        let envelope = EventEnvelope {
            topic,
            payload,
            ts_ms: current_ts_ms(),
        };
        match self.tx.send(envelope) {
            Ok(receivers) => {
                trace!(target: "event_bus", topic = topic.0, receivers, "published");
                receivers
            }
            Err(_) => {
                debug!(target: "event_bus", topic = topic.0, "no subscribers");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope<T>> {
        self.tx.subscribe()
    }
}

fn current_ts_ms() -> u128 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}
