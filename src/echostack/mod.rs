//! EchoStack (C6): applies every seed in the bank to a verdict's confidence,
//! producing a combined `reflection_delta` plus a `drift_magnitude` that is
//! the population standard deviation of the individual seed contributions.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{LogicSeed, ReflectionDelta, SeedBank, SeedFamily, Verdict};

pub struct EchoStack {
    bank: SeedBank,
}

impl EchoStack {
    pub fn new(bank: SeedBank) -> Self {
        Self { bank }
    }

    /// Walks the full seed bank in order, applying each seed's family
    /// transform to `verdict.confidence`. Returns the summed delta and the
    /// population stddev of the per-seed contributions as `drift_magnitude`.
    /// An empty bank produces a zero delta and zero magnitude.
    ///
    /// `seed` drives the only nondeterminism in this stage (`Nonmonotonic`'s
    /// jitter); the same `seed` over the same verdict always reproduces the
    /// same delta.
    pub fn process(&self, verdict: &Verdict, seed: u64) -> ReflectionDelta {
        let base = verdict.confidence;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut components = Vec::with_capacity(self.bank.full.len());
        let mut seeds_applied = Vec::with_capacity(self.bank.full.len());

        for seed in &self.bank.full {
            components.push(apply_seed_logic(base, seed, &mut rng));
            seeds_applied.push(seed.id.clone());
        }

        let reflection_delta: f64 = components.iter().sum();
        let drift_magnitude = population_stddev(&components);

        tracing::debug!(
            verdict_id = %verdict.id,
            reflection_delta,
            drift_magnitude,
            components_count = components.len(),
            "echostack processed verdict"
        );

        ReflectionDelta {
            verdict_id: verdict.id,
            reflection_delta,
            drift_magnitude,
            components_count: components.len(),
            seeds_applied,
        }
    }
}

/// Per-family transform of the verdict's confidence. Each family applies a
/// distinct nonlinearity around `base`, scaled by the seed's own weight.
/// `Skeptical` has no dedicated nonlinearity in the original reflection
/// loop, so it falls through to the plain `base * weight` default shared by
/// any family the algorithm doesn't special-case.
fn apply_seed_logic(base: f64, seed: &LogicSeed, rng: &mut StdRng) -> f64 {
    match seed.family {
        SeedFamily::Nonmonotonic => (base - 0.5) * seed.weight * rng.gen_range(0.8..=1.2),
        SeedFamily::Empiricist => base * (1.0 - base) * seed.weight,
        SeedFamily::Antifragile => (base - 0.5).abs() * seed.weight * 2.0,
        SeedFamily::Heuristic => (base + 0.1) * seed.weight,
        SeedFamily::Parsimony => base.min(0.8) * seed.weight,
        SeedFamily::EthicalGeometric => base.powi(2) * seed.weight,
        SeedFamily::Skeptical => base * seed.weight,
    }
}

fn population_stddev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn empty_bank_produces_zero_delta_and_magnitude() {
        let stack = EchoStack::new(SeedBank::new(vec![], vec![], vec![]));
        let verdict = Verdict::new("v", 0.6, Uuid::new_v4());
        let delta = stack.process(&verdict, 42);
        assert_eq!(delta.reflection_delta, 0.0);
        assert_eq!(delta.drift_magnitude, 0.0);
        assert_eq!(delta.components_count, 0);
    }

    #[test]
    fn full_bank_reports_every_seed_applied() {
        let stack = EchoStack::new(SeedBank::default_bank());
        let verdict = Verdict::new("v", 0.6, Uuid::new_v4());
        let delta = stack.process(&verdict, 42);
        assert_eq!(delta.components_count, SeedBank::default_bank().full.len());
        assert_eq!(delta.seeds_applied.len(), delta.components_count);
    }

    #[test]
    fn single_seed_bank_has_zero_drift_magnitude() {
        let bank = SeedBank::new(
            vec![LogicSeed::new("s1", SeedFamily::Parsimony, 1.0)],
            vec![],
            vec![],
        );
        let stack = EchoStack::new(bank);
        let verdict = Verdict::new("v", 0.5, Uuid::new_v4());
        let delta = stack.process(&verdict, 42);
        assert_eq!(delta.drift_magnitude, 0.0);
    }
}
