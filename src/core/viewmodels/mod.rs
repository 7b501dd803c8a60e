pub mod player;
pub mod property;

pub use player::{
    ContinueWatchingChoice, ContinueWatchingPrompt, OverlayVisibility, PlayPauseIcon,
    PlayerServices, PlayerViewModel,
};
pub use property::{Property, PropertySubscriber};

use crate::events::EventBus;
use std::sync::Arc;

#[async_trait::async_trait]
pub trait ViewModel: Send + Sync {
    async fn initialize(&self, event_bus: Arc<EventBus>);

    fn subscribe_to_property(&self, property_name: &str) -> Option<PropertySubscriber>;

    async fn refresh(&self);

    fn dispose(&self);
}
