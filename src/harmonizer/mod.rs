//! Drift Harmonizer (C2): pure, stateless advisory computation of ethical
//! drift and adjusted moral charge. Never fails, never blocks a decision —
//! every value it returns is advisory only.

use crate::config::HarmonizerConfig;
use crate::types::{MemoryShard, Payload};

#[derive(Debug, Clone)]
pub struct DriftHarmonizer {
    config: HarmonizerConfig,
}

impl DriftHarmonizer {
    pub fn new(config: HarmonizerConfig) -> Self {
        Self { config }
    }

    /// Length-proxy drift computation: the relative change in serialized
    /// payload size, plus any explicit `"moral"` key delta, clamped to
    /// [-1, 1]. Deletion (`new_payload = None`) is scored as the negation of
    /// the old payload's `"moral"` value — a "loss" signal.
    pub fn compute_ethical_drift(&self, old_payload: &Payload, new_payload: Option<&Payload>) -> f64 {
        let drift = match new_payload {
            Some(new_payload) => {
                let old_len = serde_json::to_string(old_payload).unwrap_or_default().len() as f64;
                let new_len = serde_json::to_string(new_payload).unwrap_or_default().len() as f64;
                let mut drift = if old_len > 0.0 {
                    (new_len - old_len) / old_len
                } else {
                    0.0
                };
                if let (Some(old_moral), Some(new_moral)) =
                    (moral_of(old_payload), moral_of(new_payload))
                {
                    drift += new_moral - old_moral;
                }
                drift
            }
            None => -moral_of(old_payload).unwrap_or(0.0),
        };
        drift.clamp(-1.0, 1.0)
    }

    /// Computes advisory `(drift, adjusted_moral_charge)` for a shard given a
    /// hypothetical payload change (or `None` for a delete/reflect-only call).
    pub fn reflect_on_action(&self, shard: &MemoryShard, new_payload: Option<&Payload>) -> (f64, f64) {
        let drift = self.compute_ethical_drift(&shard.payload, new_payload);
        let adjusted_moral = (shard.resonance.moral_charge + drift * shard.resonance.intensity)
            .clamp(-1.0, 1.0);
        if self.is_high_drift(drift) || self.is_high_moral_charge(adjusted_moral) {
            tracing::debug!(memory_id = %shard.memory_id, drift, adjusted_moral, "elevated drift/moral charge reflected");
        } else {
            tracing::trace!(memory_id = %shard.memory_id, drift, adjusted_moral, "action reflected");
        }
        (drift, adjusted_moral)
    }

    /// Always approves. The harmonizer has no veto; the thresholds on
    /// `HarmonizerConfig` exist only to flag drift/moral-charge severity for
    /// logging and future policy hooks, not to gate anything today.
    pub fn approve_action(&self, shard: &MemoryShard, new_payload: Option<&Payload>) -> (bool, f64, f64) {
        let (drift, adjusted_moral) = self.reflect_on_action(shard, new_payload);
        (true, drift, adjusted_moral)
    }

    pub fn is_high_drift(&self, drift: f64) -> bool {
        drift.abs() > self.config.drift_threshold
    }

    pub fn is_high_moral_charge(&self, moral_charge: f64) -> bool {
        moral_charge.abs() > self.config.moral_threshold
    }
}

fn moral_of(payload: &Payload) -> Option<f64> {
    payload.get("moral").and_then(|v| v.as_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ResonanceTag, Tone};
    use std::collections::HashMap;

    fn harmonizer() -> DriftHarmonizer {
        DriftHarmonizer::new(HarmonizerConfig::default())
    }

    #[test]
    fn drift_is_clamped_to_unit_interval() {
        let h = harmonizer();
        let mut old = HashMap::new();
        old.insert("moral".to_string(), serde_json::json!(-1.0));
        let drift = h.compute_ethical_drift(&old, None);
        assert_eq!(drift, 1.0);
    }

    #[test]
    fn growing_payload_with_higher_moral_increases_drift() {
        let h = harmonizer();
        let mut old = HashMap::new();
        old.insert("moral".to_string(), serde_json::json!(0.0));
        let mut new = HashMap::new();
        new.insert("moral".to_string(), serde_json::json!(0.5));
        new.insert("extra".to_string(), serde_json::json!("padding-padding"));
        let drift = h.compute_ethical_drift(&old, Some(&new));
        assert!(drift > 0.0);
    }

    #[test]
    fn approve_action_always_approves() {
        let h = harmonizer();
        let shard = MemoryShard::new(
            "m1",
            HashMap::new(),
            ResonanceTag::new(Tone::Neutral, "x", 0.0, 0.5),
        );
        let (approved, _, _) = h.approve_action(&shard, None);
        assert!(approved);
    }
}
