use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::codec;
use crate::error::ConfigError;
use crate::shape::Argb;

/// What happens when a gesture completes while a restore is replaying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GesturePolicy {
    /// Cancel the replay, redraw the stored history, then accept the gesture
    #[default]
    CancelReplay,
    /// Reject the gesture until the replay has finished
    BlockDuringReplay,
}

/// Canvas settings. Missing fields take their default values when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Delay between restore ticks
    pub tick_interval_ms: u64,
    pub gesture_policy: GesturePolicy,
    /// Color used when a stored color cannot be read, as `"A,R,G,B"`
    pub fallback_color: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 300,
            gesture_policy: GesturePolicy::default(),
            fallback_color: codec::encode_color(Argb::BLACK),
        }
    }
}

impl CanvasConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn fallback_color(&self) -> Argb {
        codec::decode_color(&self.fallback_color, Argb::BLACK)
    }
}
