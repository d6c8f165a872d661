//! Posterior Reasoner (C8): recursively rethinks a stabilized reflection for
//! `base_cycles`, extending to `extended_cycles` the first time a cycle's
//! drift exceeds the configured threshold. Detects maleficence (a pattern of
//! high drift paired with falling confidence) and "hackling" (unusually high
//! variance across cycles), both of which escalate the outcome to the
//! harmonizer for advisory logging only — escalation never blocks the
//! pipeline from reaching consent and articulation.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::config::PosteriorConfig;
use crate::types::{
    CycleResult, EscalationReason, FinalStability, LogicSeed, PosteriorOutcome, StabilizedReflection,
};

pub struct PosteriorReasoner {
    config: PosteriorConfig,
    philosopher_seeds: Vec<LogicSeed>,
    system_seeds: Vec<LogicSeed>,
}

impl PosteriorReasoner {
    pub fn new(config: PosteriorConfig, philosopher_seeds: Vec<LogicSeed>, system_seeds: Vec<LogicSeed>) -> Self {
        Self {
            config,
            philosopher_seeds,
            system_seeds,
        }
    }

    /// `seed` seeds a single `StdRng` reused across every cycle (including
    /// any cycles run after an extension), so the same `seed` over the same
    /// `stabilized` reflection always reproduces the same outcome.
    pub async fn rethink(&self, stabilized: &StabilizedReflection, seed: u64) -> PosteriorOutcome {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut active_cycles = self.config.base_cycles;
        let mut cycle_results = Vec::with_capacity(active_cycles as usize);
        let mut extended = false;

        let mut i = 0;
        while i < active_cycles {
            tokio::time::sleep(std::time::Duration::from_millis(self.config.interval_ms)).await;

            let drift_seed_weight = self.select_random_logics_weight(&mut rng);
            let base_drift = rng.gen_range(0.0..0.4) + stabilized.magnitude * 0.1;
            let confidence_modifier = rng.gen_range(-0.3..0.3);
            let drift_score = (base_drift * (1.0 + drift_seed_weight)).min(1.0);

            tracing::trace!(cycle = i, drift_score, confidence_modifier, "posterior cycle completed");

            cycle_results.push(CycleResult {
                drift_score,
                confidence_modifier,
            });

            if !extended && active_cycles == self.config.base_cycles && drift_score > self.config.drift_threshold {
                active_cycles = self.config.extended_cycles;
                extended = true;
            }

            i += 1;
        }

        let maleficence_detected = self.detect_maleficence(&cycle_results);
        let hackling_detected = self.detect_hackling(&cycle_results);
        let escalation_required = maleficence_detected || hackling_detected;
        let escalation_reason = if maleficence_detected {
            Some(EscalationReason::MaleficenceDetected)
        } else if hackling_detected {
            Some(EscalationReason::HacklingDetected)
        } else {
            None
        };

        if escalation_required {
            tracing::debug!(?escalation_reason, cycles = cycle_results.len(), "posterior escalation condition met");
        }

        PosteriorOutcome {
            sequence_id: Uuid::new_v4(),
            cycles_executed: cycle_results.len() as u32,
            cycle_results,
            final_stability: if escalation_required {
                FinalStability::Escalated
            } else {
                FinalStability::Validated
            },
            escalation_required,
            escalation_reason,
            harmonizer_verdict: None,
        }
    }

    fn select_random_logics_weight(&self, rng: &mut StdRng) -> f64 {
        let mut weights = Vec::new();
        if let Some(seed) = self.philosopher_seeds.choose(rng) {
            weights.push(seed.weight);
        }
        let sample_size = 4.min(self.system_seeds.len());
        weights.extend(self.system_seeds.choose_multiple(rng, sample_size).map(|s| s.weight));

        if weights.is_empty() {
            0.0
        } else {
            weights.iter().sum::<f64>() / weights.len() as f64
        }
    }

    fn detect_maleficence(&self, cycles: &[CycleResult]) -> bool {
        if cycles.is_empty() {
            return false;
        }
        let len = cycles.len() as f64;
        let high_drift = cycles.iter().filter(|c| c.drift_score > self.config.maleficence_threshold).count() as f64;
        let low_confidence = cycles.iter().filter(|c| c.confidence_modifier < -0.1).count() as f64;
        (high_drift / len) * (low_confidence / len) > self.config.maleficence_threshold
    }

    fn detect_hackling(&self, cycles: &[CycleResult]) -> bool {
        if cycles.is_empty() {
            return false;
        }
        let drift_scores: Vec<f64> = cycles.iter().map(|c| c.drift_score).collect();
        let confidences: Vec<f64> = cycles.iter().map(|c| c.confidence_modifier).collect();
        let avg_variance = (population_variance(&drift_scores) + population_variance(&confidences)) / 2.0;
        avg_variance > self.config.drift_threshold * self.config.hackling_sensitivity
    }
}

fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Consensus, SeedFamily};

    fn stabilized() -> StabilizedReflection {
        StabilizedReflection {
            delta: 0.3,
            magnitude: 0.1,
            stability_score: 0.8,
            cycles_completed: 5,
            consensus: Consensus::NeutralStability,
            timestamp: chrono::Utc::now(),
        }
    }

    fn reasoner(config: PosteriorConfig) -> PosteriorReasoner {
        PosteriorReasoner::new(
            config,
            vec![LogicSeed::new("phil", SeedFamily::Empiricist, 0.5)],
            vec![LogicSeed::new("sys", SeedFamily::Heuristic, 0.5)],
        )
    }

    #[tokio::test]
    async fn cycles_executed_is_base_cycles_when_not_escalated() {
        let config = PosteriorConfig {
            base_cycles: 5,
            extended_cycles: 10,
            interval_ms: 1,
            drift_threshold: 1.0, // unreachable, keeps it from ever extending
            maleficence_threshold: 1.0,
            hackling_sensitivity: 100.0,
        };
        let reasoner = reasoner(config);
        let outcome = reasoner.rethink(&stabilized(), 99).await;
        assert_eq!(outcome.cycles_executed, 5);
        assert!(!outcome.escalation_required);
        assert!(matches!(outcome.final_stability, FinalStability::Validated));
    }

    #[tokio::test]
    async fn cycles_executed_is_extended_cycles_when_drift_threshold_crossed() {
        let config = PosteriorConfig {
            base_cycles: 5,
            extended_cycles: 10,
            interval_ms: 1,
            drift_threshold: 0.0, // first cycle's drift_score (>=0) always exceeds this
            maleficence_threshold: 1.0,
            hackling_sensitivity: 100.0,
        };
        let reasoner = reasoner(config);
        let outcome = reasoner.rethink(&stabilized(), 99).await;
        assert_eq!(outcome.cycles_executed, 10);
    }

    #[tokio::test]
    async fn cycles_executed_is_always_base_or_extended() {
        let config = PosteriorConfig::default();
        let reasoner = reasoner(config);
        let outcome = reasoner.rethink(&stabilized(), 99).await;
        assert!(outcome.cycles_executed == config.base_cycles || outcome.cycles_executed == config.extended_cycles);
        assert_eq!(outcome.escalation_required, matches!(outcome.final_stability, FinalStability::Escalated));
    }
}
