//! Records produced by EchoStack, EchoRipple and the Posterior Reasoner.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectionDelta {
    pub verdict_id: Uuid,
    pub reflection_delta: f64,
    pub drift_magnitude: f64,
    pub components_count: usize,
    pub seeds_applied: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Consensus {
    PositiveResonance,
    NegativeResonance,
    NeutralStability,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StabilizedReflection {
    pub delta: f64,
    pub magnitude: f64,
    /// 0.0..=1.0
    pub stability_score: f64,
    pub cycles_completed: u32,
    pub consensus: Consensus,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalStability {
    Validated,
    Escalated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationReason {
    MaleficenceDetected,
    HacklingDetected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleResult {
    pub drift_score: f64,
    pub confidence_modifier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PosteriorOutcome {
    pub sequence_id: Uuid,
    pub cycles_executed: u32,
    pub cycle_results: Vec<CycleResult>,
    pub final_stability: FinalStability,
    pub escalation_required: bool,
    pub escalation_reason: Option<EscalationReason>,
    /// Always `Some` once the orchestrator has routed an escalated outcome
    /// through the harmonizer for advisory logging.
    pub harmonizer_verdict: Option<bool>,
}
