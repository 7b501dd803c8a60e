use super::types::{EventType, PlayerEvent};
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};
use tracing::trace;

/// Event subscriber handle
pub struct EventSubscriber {
    receiver: broadcast::Receiver<PlayerEvent>,
    filter: Option<EventFilter>,
}

impl EventSubscriber {
    pub fn new(receiver: broadcast::Receiver<PlayerEvent>, filter: Option<EventFilter>) -> Self {
        Self { receiver, filter }
    }

    /// Receive the next event matching the filter.
    ///
    /// Lagging behind the sender is not fatal: the missed events are skipped
    /// and the next live one is returned. Errors only once the bus is gone.
    pub async fn recv(&mut self) -> Result<PlayerEvent> {
        loop {
            let event = match self.receiver.recv().await {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    trace!("Event subscriber lagged, skipped {} events", skipped);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            match self.filter {
                Some(ref filter) if !filter.matches(&event) => continue,
                _ => return Ok(event),
            }
        }
    }

    /// Try to receive without blocking
    pub fn try_recv(&mut self) -> Result<Option<PlayerEvent>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if let Some(ref filter) = self.filter {
                        if filter.matches(&event) {
                            return Ok(Some(event));
                        }
                    } else {
                        return Ok(Some(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Event filter for selective subscription
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    event_types: Option<Vec<EventType>>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self { event_types: None }
    }

    pub fn with_types(mut self, types: Vec<EventType>) -> Self {
        self.event_types = Some(types);
        self
    }

    pub fn matches(&self, event: &PlayerEvent) -> bool {
        if let Some(ref types) = self.event_types
            && !types.contains(&event.event_type)
        {
            return false;
        }

        true
    }
}

/// Broadcast bus connecting the playback engine to the screens observing it
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<PlayerEvent>,
    stats: Arc<RwLock<EventBusStats>>,
}

#[derive(Debug, Default, Clone)]
pub struct EventBusStats {
    pub total_events: u64,
    pub events_by_type: HashMap<&'static str, u64>,
    pub subscriber_count: usize,
    pub dropped_events: u64,
}

impl EventBus {
    /// Create a new event bus with specified buffer capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);

        Self {
            sender,
            stats: Arc::new(RwLock::new(EventBusStats::default())),
        }
    }

    /// Publish an event to all subscribers
    pub async fn publish(&self, event: PlayerEvent) -> Result<()> {
        trace!("Publishing event: {:?}", event.event_type);

        {
            let mut stats = self.stats.write().await;
            stats.total_events += 1;
            *stats
                .events_by_type
                .entry(event.event_type.as_str())
                .or_insert(0) += 1;
        }

        if self.sender.send(event).is_err() {
            // No subscribers is normal while no screen is visible
            let mut stats = self.stats.write().await;
            stats.dropped_events += 1;
        }
        Ok(())
    }

    /// Subscribe to all events
    pub fn subscribe(&self) -> EventSubscriber {
        EventSubscriber::new(self.sender.subscribe(), None)
    }

    /// Subscribe with a filter
    pub fn subscribe_filtered(&self, filter: EventFilter) -> EventSubscriber {
        EventSubscriber::new(self.sender.subscribe(), Some(filter))
    }

    /// Subscribe to specific event types
    pub fn subscribe_to_types(&self, types: Vec<EventType>) -> EventSubscriber {
        self.subscribe_filtered(EventFilter::new().with_types(types))
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub async fn get_stats(&self) -> EventBusStats {
        let stats = self.stats.read().await;
        EventBusStats {
            subscriber_count: self.subscriber_count(),
            ..(*stats).clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EngineState;
    use crate::events::types::{EventPayload, TimeUpdate};
    use std::time::Duration;

    #[tokio::test]
    async fn test_filtered_subscriber_skips_other_types() {
        let bus = EventBus::new(16);
        let mut states = bus.subscribe_to_types(vec![EventType::EngineStateChanged]);

        bus.publish(PlayerEvent::time_changed(TimeUpdate::new(
            Duration::from_secs(1),
            Duration::from_secs(9),
        )))
        .await
        .unwrap();
        bus.publish(PlayerEvent::state_changed(EngineState::Paused))
            .await
            .unwrap();

        let event = states.recv().await.unwrap();
        assert_eq!(
            event.payload,
            EventPayload::State {
                state: EngineState::Paused
            }
        );
        assert!(states.try_recv().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_counts_drop() {
        let bus = EventBus::new(4);
        bus.publish(PlayerEvent::state_changed(EngineState::Playing))
            .await
            .unwrap();

        let stats = bus.get_stats().await;
        assert_eq!(stats.total_events, 1);
        assert_eq!(stats.dropped_events, 1);
        assert_eq!(stats.events_by_type.get("engine_state_changed"), Some(&1));
        assert_eq!(stats.subscriber_count, 0);
    }

    #[test]
    fn test_time_update_position() {
        let update = TimeUpdate::new(Duration::from_secs(30), Duration::from_secs(90));
        assert!((update.position - 0.25).abs() < f32::EPSILON);
        assert_eq!(update.duration(), Duration::from_secs(120));

        let empty = TimeUpdate::new(Duration::ZERO, Duration::ZERO);
        assert_eq!(empty.position, 0.0);
    }
}
