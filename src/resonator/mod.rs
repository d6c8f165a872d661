//! Resonator (C4): extracts a resonance record from a raw stimulus.
//!
//! This is the first stage of the pipeline and the only one that sees the
//! caller's unprocessed input. It is a thin, swappable trait so callers can
//! plug in whatever signal-extraction backend fits their stimulus modality.

use async_trait::async_trait;
use uuid::Uuid;

/// A resonance record extracted from a stimulus: a resonance score in
/// [0, 1] (how strongly the stimulus registered), a short symbolic label,
/// the patterns that contributed to the score, and when it was produced.
#[derive(Debug, Clone)]
pub struct ResonanceRecord {
    pub id: Uuid,
    pub resonance_score: f64,
    pub symbol: String,
    pub patterns: Vec<String>,
    pub produced_at: chrono::DateTime<chrono::Utc>,
}

#[async_trait]
pub trait Resonator: Send + Sync {
    async fn extract(&self, stimulus: &str) -> ResonanceRecord;
}

/// Deterministic resonator used when no richer backend is configured: scores
/// a stimulus by its length relative to a fixed saturation point, labels it
/// with its first word, and lists up to five distinct lowercased tokens as
/// its `patterns`.
pub struct DefaultResonator {
    saturation_chars: usize,
}

impl Default for DefaultResonator {
    fn default() -> Self {
        Self {
            saturation_chars: 240,
        }
    }
}

#[async_trait]
impl Resonator for DefaultResonator {
    async fn extract(&self, stimulus: &str) -> ResonanceRecord {
        let score = (stimulus.len() as f64 / self.saturation_chars as f64).clamp(0.0, 1.0);
        let symbol = stimulus
            .split_whitespace()
            .next()
            .unwrap_or("stimulus")
            .to_string();

        let mut patterns = Vec::new();
        for word in stimulus.split_whitespace() {
            let lowered = word.to_lowercase();
            if !patterns.contains(&lowered) {
                patterns.push(lowered);
            }
            if patterns.len() >= 5 {
                break;
            }
        }

        let record = ResonanceRecord {
            id: Uuid::new_v4(),
            resonance_score: score,
            symbol,
            patterns,
            produced_at: chrono::Utc::now(),
        };
        tracing::debug!(
            resonance_id = %record.id,
            resonance_score = record.resonance_score,
            symbol = %record.symbol,
            "resonance extracted"
        );
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn short_stimulus_scores_low() {
        let r = DefaultResonator::default();
        let record = r.extract("hi").await;
        assert!(record.resonance_score < 0.1);
        assert_eq!(record.symbol, "hi");
        assert_eq!(record.patterns, vec!["hi".to_string()]);
    }

    #[tokio::test]
    async fn long_stimulus_saturates_at_one() {
        let r = DefaultResonator::default();
        let record = r.extract(&"word ".repeat(200)).await;
        assert_eq!(record.resonance_score, 1.0);
    }

    #[tokio::test]
    async fn patterns_are_capped_at_five_distinct_tokens() {
        let r = DefaultResonator::default();
        let record = r.extract("one two three four five six seven").await;
        assert_eq!(record.patterns.len(), 5);
    }
}
