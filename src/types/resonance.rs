//! Resonance tags: the subjective perception attached to a memory shard.

use serde::{Deserialize, Serialize};

/// Emotional lens a resonance is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Joy,
    Grief,
    Fracture,
    Wonder,
    Neutral,
}

/// Subjective tagging attached to a memory shard at store time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResonanceTag {
    pub tone: Tone,
    pub symbol: String,
    /// -1.0..=1.0
    pub moral_charge: f64,
    /// 0.0..=1.0
    pub intensity: f64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl ResonanceTag {
    pub fn new(tone: Tone, symbol: impl Into<String>, moral_charge: f64, intensity: f64) -> Self {
        Self {
            tone,
            symbol: symbol.into(),
            moral_charge: moral_charge.clamp(-1.0, 1.0),
            intensity: intensity.clamp(0.0, 1.0),
            timestamp: chrono::Utc::now(),
        }
    }
}
