//! Configuration surface for the Unified Cognition Loop
//!
//! `CognitionConfig` aggregates every knob the pipeline's stages read at
//! startup: the seed bank, EchoRipple/Posterior cycle counts and inter-cycle
//! intervals, the harmonizer's advisory thresholds, the consent mode and its
//! timeout, per-stage timeouts, and the orchestrator's admission limit.

use serde::{Deserialize, Serialize};

use crate::types::SeedBank;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CognitionConfig {
    pub seeds: SeedConfig,
    pub echo_ripple: EchoRippleConfig,
    pub posterior: PosteriorConfig,
    pub harmonizer: HarmonizerConfig,
    pub consent: ConsentConfig,
    pub orchestrator: OrchestratorConfig,
}

impl Default for CognitionConfig {
    fn default() -> Self {
        Self {
            seeds: SeedConfig::default(),
            echo_ripple: EchoRippleConfig::default(),
            posterior: PosteriorConfig::default(),
            harmonizer: HarmonizerConfig::default(),
            consent: ConsentConfig::default(),
            orchestrator: OrchestratorConfig::default(),
        }
    }
}

impl CognitionConfig {
    /// Validates cross-field invariants the `config` crate's plain
    /// deserialization can't express (ranges, non-zero cycle counts).
    /// Raised once at startup; never at request time.
    pub fn validate(&self) -> Result<(), crate::types::ConfigError> {
        if self.echo_ripple.cycles == 0 {
            return Err(crate::types::ConfigError::Invalid {
                field: "echo_ripple.cycles",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.posterior.base_cycles == 0 || self.posterior.extended_cycles < self.posterior.base_cycles {
            return Err(crate::types::ConfigError::Invalid {
                field: "posterior.extended_cycles",
                reason: "must be >= posterior.base_cycles and both must be nonzero".to_string(),
            });
        }
        if self.orchestrator.max_in_flight == 0 {
            return Err(crate::types::ConfigError::Invalid {
                field: "orchestrator.max_in_flight",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Which named seed roster to load. `Default` loads the built-in bank
/// matching the original philosopher/system split; `Custom` carries an
/// explicit bank for tests and alternate deployments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    pub bank: SeedBank,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            bank: SeedBank::default_bank(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EchoRippleConfig {
    pub cycles: u32,
    pub interval_ms: u64,
    pub paradox_dampen_threshold: f64,
    pub seeds_per_cycle: usize,
}

impl Default for EchoRippleConfig {
    fn default() -> Self {
        Self {
            cycles: 5,
            interval_ms: 20,
            paradox_dampen_threshold: 2.0,
            seeds_per_cycle: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PosteriorConfig {
    pub base_cycles: u32,
    pub extended_cycles: u32,
    pub interval_ms: u64,
    pub drift_threshold: f64,
    pub maleficence_threshold: f64,
    pub hackling_sensitivity: f64,
}

impl Default for PosteriorConfig {
    fn default() -> Self {
        Self {
            base_cycles: 5,
            extended_cycles: 10,
            interval_ms: 50,
            drift_threshold: 0.2,
            maleficence_threshold: 0.25,
            hackling_sensitivity: 0.8,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HarmonizerConfig {
    pub drift_threshold: f64,
    pub moral_threshold: f64,
}

impl Default for HarmonizerConfig {
    fn default() -> Self {
        Self {
            drift_threshold: 0.5,
            moral_threshold: 0.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentMode {
    AlwaysYes,
    AlwaysNo,
    Random,
    Manual,
    Voice,
    Custom,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConsentConfig {
    pub mode: ConsentMode,
    pub timeout_ms: u64,
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self {
            mode: ConsentMode::AlwaysYes,
            timeout_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    pub max_in_flight: usize,
    pub stage_timeout_ms: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 32,
            stage_timeout_ms: 5_000,
        }
    }
}
