//! Memory Vault (C1): content-addressed, immutable-until-consented shard storage
//! plus the append-only audit log that records every decision made about it.
//!
//! A single writer lock serializes all mutations to the shard table; readers
//! may proceed concurrently with each other and are never blocked by another
//! reader. The audit log is a separate, strictly append-only sequence: once
//! a decision is observed by a reader, its audit entry is already durable.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::RwLock;

use crate::harmonizer::DriftHarmonizer;
use crate::telemetry::CognitionTelemetry;
use crate::types::{
    AuditAction, AuditEntry, AuditVerdict, MemoryShard, Payload, ResonanceTag, VaultError,
};

/// What-if / historical reflection on a shard, with no audit side effect.
#[derive(Debug, Clone)]
pub struct ShardReflection {
    pub current_resonance: ResonanceTag,
    pub ethical_drift: f64,
    pub adjusted_moral_charge: f64,
    pub audit_history: Vec<AuditEntry>,
}

/// Lightweight projection returned by resonance queries.
#[derive(Debug, Clone)]
pub struct ResonanceQueryHit {
    pub memory_id: String,
    pub tone: crate::types::Tone,
    pub symbol: String,
    pub moral_charge: f64,
    pub intensity: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ResonanceQuery {
    pub tone: Option<crate::types::Tone>,
    pub symbol: Option<String>,
    pub min_intensity: f64,
    pub max_intensity: f64,
}

impl ResonanceQuery {
    pub fn new() -> Self {
        Self {
            tone: None,
            symbol: None,
            min_intensity: 0.0,
            max_intensity: 1.0,
        }
    }
}

pub struct MemoryVault {
    shards: RwLock<HashMap<String, MemoryShard>>,
    audit_log: Mutex<Vec<AuditEntry>>,
    harmonizer: DriftHarmonizer,
    telemetry: Arc<CognitionTelemetry>,
}

impl MemoryVault {
    pub fn new(harmonizer: DriftHarmonizer, telemetry: Arc<CognitionTelemetry>) -> Self {
        Self {
            shards: RwLock::new(HashMap::new()),
            audit_log: Mutex::new(Vec::new()),
            harmonizer,
            telemetry,
        }
    }

    /// Stores a new shard under `memory_id`. Callers choose the payload and
    /// the resonance tag; the vault never second-guesses either.
    pub async fn store(
        &self,
        memory_id: impl Into<String>,
        payload: Payload,
        resonance: ResonanceTag,
    ) -> Result<String, VaultError> {
        let memory_id = memory_id.into();
        let mut shards = self.shards.write().await;
        if shards.contains_key(&memory_id) {
            return Err(VaultError::AlreadyExists(memory_id));
        }
        let shard = MemoryShard::new(memory_id.clone(), payload, resonance.clone());
        let hash_signature = shard.hash_signature.clone();
        shards.insert(memory_id.clone(), shard);
        drop(shards);

        self.append_audit(AuditEntry::new(
            AuditAction::Store,
            memory_id.clone(),
            AuditVerdict::Approved,
            "n/a",
            Some(resonance),
            0.0,
            0.0,
        ));
        tracing::info!(memory_id = %memory_id, hash_signature = %hash_signature, "shard stored");
        self.telemetry.shard_stored(&memory_id);

        Ok(hash_signature)
    }

    /// Modifies a shard's payload under a caller-supplied consent decision.
    /// The harmonizer's drift/moral-charge computation is advisory: it is
    /// logged regardless of the outcome, but never gates the verdict itself.
    pub async fn modify(
        &self,
        memory_id: &str,
        new_payload: Payload,
        consent_granted: bool,
        new_resonance: Option<ResonanceTag>,
    ) -> Result<bool, VaultError> {
        let mut shards = self.shards.write().await;
        let shard = shards
            .get(memory_id)
            .ok_or_else(|| VaultError::NotFound(memory_id.to_string()))?;

        let (drift, adjusted_moral) = self
            .harmonizer
            .reflect_on_action(shard, Some(&new_payload));
        let approved = consent_granted;

        if approved {
            let shard = shards.get_mut(memory_id).expect("checked above");
            shard.payload = new_payload;
            if let Some(resonance) = new_resonance {
                shard.resonance = resonance;
            }
            shard.last_modified = chrono::Utc::now();
            shard.recompute_hash();
        }
        let resonance_after = shards.get(memory_id).map(|s| s.resonance.clone());
        drop(shards);

        self.append_audit(AuditEntry::new(
            AuditAction::Modify,
            memory_id,
            verdict_of(approved),
            "n/a",
            resonance_after,
            drift,
            adjusted_moral,
        ));
        tracing::info!(memory_id, approved, drift, "shard modification evaluated");
        self.telemetry.shard_mutated(memory_id, approved);

        Ok(approved)
    }

    /// Deletes a shard under a caller-supplied consent decision.
    pub async fn delete(&self, memory_id: &str, consent_granted: bool) -> Result<bool, VaultError> {
        let mut shards = self.shards.write().await;
        let shard = shards
            .get(memory_id)
            .ok_or_else(|| VaultError::NotFound(memory_id.to_string()))?;

        let (drift, adjusted_moral) = self.harmonizer.reflect_on_action(shard, None);
        let approved = consent_granted;

        if approved {
            shards.remove(memory_id);
        }
        drop(shards);

        self.append_audit(AuditEntry::new(
            AuditAction::Delete,
            memory_id,
            verdict_of(approved),
            "n/a",
            None,
            drift,
            adjusted_moral,
        ));
        tracing::info!(memory_id, approved, "shard deletion evaluated");
        self.telemetry.shard_mutated(memory_id, approved);

        Ok(approved)
    }

    pub async fn get(&self, memory_id: &str) -> Option<MemoryShard> {
        self.shards.read().await.get(memory_id).cloned()
    }

    /// Read-only what-if reflection: computes drift/adjusted moral charge for
    /// a hypothetical payload without mutating anything or appending to the
    /// audit log.
    pub async fn reflect(
        &self,
        memory_id: &str,
        hypothetical_new_payload: Option<&Payload>,
    ) -> Result<ShardReflection, VaultError> {
        let shards = self.shards.read().await;
        let shard = shards
            .get(memory_id)
            .ok_or_else(|| VaultError::NotFound(memory_id.to_string()))?;
        let (ethical_drift, adjusted_moral_charge) = self
            .harmonizer
            .reflect_on_action(shard, hypothetical_new_payload);
        let current_resonance = shard.resonance.clone();
        drop(shards);

        let audit_history = self
            .audit_log
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| entry.memory_id == memory_id)
            .cloned()
            .collect();

        tracing::debug!(memory_id, ethical_drift, adjusted_moral_charge, "shard reflected");
        Ok(ShardReflection {
            current_resonance,
            ethical_drift,
            adjusted_moral_charge,
            audit_history,
        })
    }

    pub async fn query_by_resonance(&self, query: &ResonanceQuery) -> Vec<ResonanceQueryHit> {
        let shards = self.shards.read().await;
        shards
            .values()
            .filter(|shard| {
                let r = &shard.resonance;
                if let Some(tone) = query.tone {
                    if r.tone != tone {
                        return false;
                    }
                }
                if let Some(symbol) = &query.symbol {
                    if &r.symbol != symbol {
                        return false;
                    }
                }
                r.intensity >= query.min_intensity && r.intensity <= query.max_intensity
            })
            .map(|shard| ResonanceQueryHit {
                memory_id: shard.memory_id.clone(),
                tone: shard.resonance.tone,
                symbol: shard.resonance.symbol.clone(),
                moral_charge: shard.resonance.moral_charge,
                intensity: shard.resonance.intensity,
            })
            .collect()
    }

    pub fn audit_log(&self) -> Vec<AuditEntry> {
        self.audit_log.lock().unwrap().clone()
    }

    /// Appends a consent-decision entry on behalf of the Consent Authority.
    /// Kept on the vault so every audit append goes through the same
    /// single, strictly-ordered sink.
    pub fn append_consent_entry(&self, entry: AuditEntry) {
        self.append_audit(entry);
    }

    /// Records the orchestrator's advisory HARMONIZE-stage consultation of
    /// the Drift Harmonizer. Always `Pending`: it never resolves to an
    /// approve/deny decision, it only informs the audit trail.
    pub fn record_ethical_test(
        &self,
        memory_id: &str,
        ethical_drift: f64,
        adjusted_moral_charge: f64,
    ) {
        tracing::debug!(memory_id, ethical_drift, adjusted_moral_charge, "ethical test recorded");
        self.append_audit(AuditEntry::new(
            AuditAction::EthicalTest,
            memory_id,
            AuditVerdict::Pending,
            "n/a",
            None,
            ethical_drift,
            adjusted_moral_charge,
        ));
    }

    /// Records a Posterior Reasoner outcome flagged for harmonizer attention.
    /// Advisory only, same as `record_ethical_test`: it never gates the
    /// pipeline, it only leaves a trail of what was flagged and why.
    pub fn record_escalation(
        &self,
        memory_id: &str,
        reason: &str,
        ethical_drift: f64,
        adjusted_moral_charge: f64,
    ) {
        tracing::warn!(memory_id, reason, "posterior escalation recorded");
        self.append_audit(AuditEntry::new(
            AuditAction::Escalation,
            memory_id,
            AuditVerdict::Pending,
            reason,
            None,
            ethical_drift,
            adjusted_moral_charge,
        ));
    }

    fn append_audit(&self, entry: AuditEntry) {
        self.audit_log.lock().unwrap().push(entry);
    }
}

fn verdict_of(approved: bool) -> AuditVerdict {
    if approved {
        AuditVerdict::Approved
    } else {
        AuditVerdict::Denied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tone;
    use std::collections::HashMap;

    fn vault() -> MemoryVault {
        MemoryVault::new(
            DriftHarmonizer::new(Default::default()),
            Arc::new(crate::telemetry::CognitionTelemetry::new()),
        )
    }

    fn tag() -> ResonanceTag {
        ResonanceTag::new(Tone::Joy, "star", 0.4, 0.6)
    }

    #[tokio::test]
    async fn store_then_get_round_trips() {
        let v = vault();
        let mut payload = HashMap::new();
        payload.insert("k".to_string(), serde_json::json!("v"));
        let hash = v.store("m1", payload, tag()).await.unwrap();
        let shard = v.get("m1").await.unwrap();
        assert_eq!(shard.hash_signature, hash);
    }

    #[tokio::test]
    async fn store_twice_is_already_exists() {
        let v = vault();
        v.store("m1", HashMap::new(), tag()).await.unwrap();
        let err = v.store("m1", HashMap::new(), tag()).await.unwrap_err();
        assert!(matches!(err, VaultError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn modify_denied_leaves_payload_untouched() {
        let v = vault();
        let mut payload = HashMap::new();
        payload.insert("k".to_string(), serde_json::json!(1));
        v.store("m1", payload.clone(), tag()).await.unwrap();

        let mut new_payload = HashMap::new();
        new_payload.insert("k".to_string(), serde_json::json!(2));
        let approved = v.modify("m1", new_payload, false, None).await.unwrap();
        assert!(!approved);

        let shard = v.get("m1").await.unwrap();
        assert_eq!(shard.payload, payload);
    }

    #[tokio::test]
    async fn modify_approved_recomputes_hash() {
        let v = vault();
        v.store("m1", HashMap::new(), tag()).await.unwrap();
        let original = v.get("m1").await.unwrap();

        let mut new_payload = HashMap::new();
        new_payload.insert("k".to_string(), serde_json::json!("changed"));
        let approved = v.modify("m1", new_payload, true, None).await.unwrap();
        assert!(approved);

        let updated = v.get("m1").await.unwrap();
        assert_ne!(updated.hash_signature, original.hash_signature);
    }

    #[tokio::test]
    async fn audit_log_is_append_only_and_records_every_mutation_attempt() {
        let v = vault();
        v.store("m1", HashMap::new(), tag()).await.unwrap();
        v.modify("m1", HashMap::new(), false, None).await.unwrap();
        v.modify("m1", HashMap::new(), true, None).await.unwrap();
        v.delete("m1", false).await.unwrap();

        let log = v.audit_log();
        assert_eq!(log.len(), 4);
        assert!(matches!(log[0].action, AuditAction::Store));
        assert!(matches!(log[3].verdict, AuditVerdict::Denied));
    }

    #[tokio::test]
    async fn reflect_does_not_append_audit_entries() {
        let v = vault();
        v.store("m1", HashMap::new(), tag()).await.unwrap();
        let before = v.audit_log().len();
        let _ = v.reflect("m1", None).await.unwrap();
        assert_eq!(v.audit_log().len(), before);
    }

    #[tokio::test]
    async fn query_by_resonance_filters_on_tone_and_intensity() {
        let v = vault();
        v.store("m1", HashMap::new(), ResonanceTag::new(Tone::Joy, "a", 0.0, 0.9))
            .await
            .unwrap();
        v.store("m2", HashMap::new(), ResonanceTag::new(Tone::Grief, "b", 0.0, 0.2))
            .await
            .unwrap();

        let mut query = ResonanceQuery::new();
        query.tone = Some(Tone::Joy);
        let hits = v.query_by_resonance(&query).await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].memory_id, "m1");
    }
}
