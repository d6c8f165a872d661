//! Logic seeds: read-only, startup-loaded weighted transforms.

use serde::{Deserialize, Serialize};

/// Families named in the seed bank. Each maps onto one of the named
/// philosopher/system logics the reflection loop was originally seeded with
/// (nonmonotonic/spinoza, empiricist/hume, skeptical, antifragile/taleb,
/// heuristic/proverbs, parsimony/ockham).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedFamily {
    Nonmonotonic,
    Empiricist,
    Skeptical,
    Antifragile,
    Heuristic,
    Parsimony,
    EthicalGeometric,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogicSeed {
    pub id: String,
    pub family: SeedFamily,
    pub weight: f64,
}

impl LogicSeed {
    pub fn new(id: impl Into<String>, family: SeedFamily, weight: f64) -> Self {
        Self {
            id: id.into(),
            family,
            weight,
        }
    }
}

/// The seed bank is loaded once at startup from configuration and never
/// mutated afterward. EchoStack walks the full bank in order; Posterior
/// draws from the `philosopher`/`system` partition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedBank {
    pub full: Vec<LogicSeed>,
    pub philosopher: Vec<LogicSeed>,
    pub system: Vec<LogicSeed>,
}

impl SeedBank {
    pub fn new(full: Vec<LogicSeed>, philosopher: Vec<LogicSeed>, system: Vec<LogicSeed>) -> Self {
        Self {
            full,
            philosopher,
            system,
        }
    }

    /// Matches the original seed roster: one seed per named family plus a
    /// philosopher/system split for Posterior's cycle sampling.
    pub fn default_bank() -> Self {
        let full = vec![
            LogicSeed::new("seed_nonmonotonic", SeedFamily::Nonmonotonic, 1.0),
            LogicSeed::new("seed_spinoza", SeedFamily::Empiricist, 0.9),
            LogicSeed::new("seed_hume", SeedFamily::Empiricist, 0.8),
            LogicSeed::new("seed_taleb", SeedFamily::Antifragile, 1.1),
            LogicSeed::new("seed_proverbs", SeedFamily::Heuristic, 0.7),
            LogicSeed::new("seed_ockhams_filter", SeedFamily::Parsimony, 0.6),
        ];
        let philosopher = vec![
            LogicSeed::new("seed_spinoza", SeedFamily::Empiricist, 0.9),
            LogicSeed::new("seed_hume", SeedFamily::Empiricist, 0.8),
        ];
        let system = vec![
            LogicSeed::new("seed_nonmonotonic", SeedFamily::Nonmonotonic, 1.0),
            LogicSeed::new("seed_taleb", SeedFamily::Antifragile, 1.1),
            LogicSeed::new("seed_proverbs", SeedFamily::Heuristic, 0.7),
            LogicSeed::new("seed_ockhams_filter", SeedFamily::Parsimony, 0.6),
        ];
        Self::new(full, philosopher, system)
    }
}
