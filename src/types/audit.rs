//! Append-only audit log entries.

use serde::{Deserialize, Serialize};

use super::resonance::ResonanceTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Store,
    Modify,
    Delete,
    ConsentDecision,
    /// The orchestrator's advisory consultation of the Drift Harmonizer
    /// (the HARMONIZE stage between POSTERIOR and CONSENT).
    EthicalTest,
    /// A Posterior Reasoner outcome flagged for harmonizer attention.
    Escalation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditVerdict {
    Approved,
    Denied,
    /// The decision's wait exceeded its timeout and was treated as a denial.
    Timeout,
    /// Advisory-only entries (ethical tests, escalations) that never
    /// resolve to a final approve/deny decision.
    Pending,
}

/// One immutable, append-only record. The vault never mutates or removes an
/// entry once written; entries are ordered by insertion (happens-before the
/// decision they describe becoming visible to readers).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub action: AuditAction,
    pub memory_id: String,
    pub verdict: AuditVerdict,
    pub mode: String,
    pub resonance: Option<ResonanceTag>,
    pub ethical_drift: f64,
    pub adjusted_moral_charge: f64,
}

impl AuditEntry {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        action: AuditAction,
        memory_id: impl Into<String>,
        verdict: AuditVerdict,
        mode: impl Into<String>,
        resonance: Option<ResonanceTag>,
        ethical_drift: f64,
        adjusted_moral_charge: f64,
    ) -> Self {
        Self {
            timestamp: chrono::Utc::now(),
            action,
            memory_id: memory_id.into(),
            verdict,
            mode: mode.into(),
            resonance,
            ethical_drift,
            adjusted_moral_charge,
        }
    }
}
