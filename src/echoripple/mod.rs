//! EchoRipple (C7): runs a fixed number of short recursive adjustment
//! cycles over an EchoStack delta, dampening paradoxical (overly large)
//! per-seed adjustments, and reports a stability score plus a consensus
//! label for the result.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::config::EchoRippleConfig;
use crate::types::{Consensus, LogicSeed, ReflectionDelta, SeedFamily, StabilizedReflection};

pub struct EchoRipple {
    config: EchoRippleConfig,
    seeds: Vec<LogicSeed>,
}

impl EchoRipple {
    pub fn new(config: EchoRippleConfig, seeds: Vec<LogicSeed>) -> Self {
        Self { config, seeds }
    }

    /// Runs `config.cycles` cycles, each sleeping `config.interval_ms`
    /// between iterations. An empty seed bank still runs every cycle using a
    /// neutral identity seed, rather than short-circuiting.
    ///
    /// `seed` seeds a single `StdRng` reused across every cycle, so the same
    /// `seed` over the same `delta` always reproduces the same cycle path.
    pub async fn resonate(&self, delta: &ReflectionDelta, seed: u64) -> StabilizedReflection {
        let pool = self.sampling_pool();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut current_delta = delta.reflection_delta;
        let mut cycle_deltas = Vec::with_capacity(self.config.cycles as usize);

        for cycle in 0..self.config.cycles {
            let adjusted = self.run_logic_pass(current_delta, &pool, &mut rng);
            tracing::trace!(cycle, current_delta = adjusted, "echoripple cycle completed");
            cycle_deltas.push(adjusted);
            current_delta = adjusted;

            if cycle + 1 < self.config.cycles {
                tokio::time::sleep(std::time::Duration::from_millis(self.config.interval_ms)).await;
            }
        }

        let final_delta = mean(&cycle_deltas).unwrap_or(delta.reflection_delta);
        let stability_score = (1.0
            - delta.drift_magnitude / final_delta.abs().max(0.1))
        .clamp(0.0, 1.0);

        StabilizedReflection {
            delta: final_delta,
            magnitude: delta.drift_magnitude,
            stability_score,
            cycles_completed: self.config.cycles,
            consensus: consensus_of(final_delta),
            timestamp: chrono::Utc::now(),
        }
    }

    fn sampling_pool(&self) -> Vec<LogicSeed> {
        if self.seeds.is_empty() {
            vec![LogicSeed::new("default_logic", SeedFamily::Parsimony, 1.0)]
        } else {
            self.seeds.clone()
        }
    }

    fn run_logic_pass(&self, current_delta: f64, pool: &[LogicSeed], rng: &mut StdRng) -> f64 {
        let sample_size = self.config.seeds_per_cycle.min(pool.len());
        let sampled: Vec<&LogicSeed> = pool.choose_multiple(rng, sample_size).collect();

        let adjustments: Vec<f64> = sampled
            .iter()
            .map(|seed| {
                let raw = current_delta * seed.weight * rng.gen_range(0.9..=1.1);
                if raw.abs() > self.config.paradox_dampen_threshold {
                    raw * 0.5
                } else {
                    raw
                }
            })
            .collect();

        mean(&adjustments).unwrap_or(current_delta)
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn consensus_of(final_delta: f64) -> Consensus {
    if final_delta > 0.5 {
        Consensus::PositiveResonance
    } else if final_delta < -0.5 {
        Consensus::NegativeResonance
    } else {
        Consensus::NeutralStability
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn delta(reflection_delta: f64, drift_magnitude: f64) -> ReflectionDelta {
        ReflectionDelta {
            verdict_id: Uuid::new_v4(),
            reflection_delta,
            drift_magnitude,
            components_count: 1,
            seeds_applied: vec!["s".to_string()],
        }
    }

    #[tokio::test]
    async fn runs_exactly_config_cycles() {
        let ripple = EchoRipple::new(
            EchoRippleConfig {
                cycles: 3,
                interval_ms: 1,
                ..EchoRippleConfig::default()
            },
            vec![LogicSeed::new("s1", SeedFamily::Heuristic, 1.0)],
        );
        let result = ripple.resonate(&delta(0.3, 0.1), 7).await;
        assert_eq!(result.cycles_completed, 3);
    }

    #[tokio::test]
    async fn empty_seed_bank_still_completes_all_cycles() {
        let ripple = EchoRipple::new(
            EchoRippleConfig {
                cycles: 2,
                interval_ms: 1,
                ..EchoRippleConfig::default()
            },
            vec![],
        );
        let result = ripple.resonate(&delta(0.1, 0.0), 7).await;
        assert_eq!(result.cycles_completed, 2);
    }

    #[tokio::test]
    async fn stability_score_is_within_unit_interval() {
        let ripple = EchoRipple::new(
            EchoRippleConfig {
                cycles: 5,
                interval_ms: 1,
                ..EchoRippleConfig::default()
            },
            vec![LogicSeed::new("s1", SeedFamily::Antifragile, 1.0)],
        );
        let result = ripple.resonate(&delta(0.4, 0.3), 7).await;
        assert!(result.stability_score >= 0.0 && result.stability_score <= 1.0);
    }

    #[tokio::test]
    async fn large_positive_delta_reaches_positive_resonance_consensus() {
        let ripple = EchoRipple::new(
            EchoRippleConfig {
                cycles: 1,
                interval_ms: 1,
                seeds_per_cycle: 1,
                paradox_dampen_threshold: 100.0,
            },
            vec![LogicSeed::new("s1", SeedFamily::Nonmonotonic, 5.0)],
        );
        let result = ripple.resonate(&delta(1.0, 0.0), 7).await;
        // weight=5, delta=1.0, uniform factor in [0.9,1.1] => adjusted in [4.5, 5.5]
        assert!(matches!(result.consensus, Consensus::PositiveResonance));
    }
}
