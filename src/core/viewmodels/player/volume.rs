use tracing::trace;

use super::PlayerViewModel;
use crate::utils::PlayerResult;

impl PlayerViewModel {
    /// Output level from the volume control, 0.0 to 1.0. The engine gain is
    /// scaled by the configured boost.
    pub async fn volume_changed(&self, level: f64) -> PlayerResult<()> {
        let level = level.clamp(0.0, 1.0);
        self.volume.set(level).await;

        let gain = level * self.config.playback.engine_volume;
        trace!("Volume {:.2} -> engine gain {:.2}", level, gain);
        self.services.engine.set_volume(gain).await?;
        Ok(())
    }
}
