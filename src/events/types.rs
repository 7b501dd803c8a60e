use crate::core::EngineState;
use std::time::Duration;

/// Notification published on the player event bus
#[derive(Debug, Clone)]
pub struct PlayerEvent {
    pub event_type: EventType,
    pub payload: EventPayload,
}

impl PlayerEvent {
    pub fn new(event_type: EventType, payload: EventPayload) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    pub fn state_changed(state: EngineState) -> Self {
        Self::new(EventType::EngineStateChanged, EventPayload::State { state })
    }

    pub fn time_changed(update: TimeUpdate) -> Self {
        Self::new(EventType::EngineTimeChanged, EventPayload::Time(update))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    EngineStateChanged,
    EngineTimeChanged,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::EngineStateChanged => "engine_state_changed",
            EventType::EngineTimeChanged => "engine_time_changed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    State { state: EngineState },
    Time(TimeUpdate),
}

/// Snapshot of the engine clock at the moment the time changed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeUpdate {
    pub time: Duration,
    pub remaining: Duration,
    /// Fraction of the stream played, 0.0..=1.0
    pub position: f32,
}

impl TimeUpdate {
    pub fn new(time: Duration, remaining: Duration) -> Self {
        let total = time + remaining;
        let position = if total.is_zero() {
            0.0
        } else {
            (time.as_secs_f64() / total.as_secs_f64()) as f32
        };
        Self {
            time,
            remaining,
            position,
        }
    }

    pub fn duration(&self) -> Duration {
        self.time + self.remaining
    }
}
