//! Anterior Reasoner (C5): turns a resonance record into a `Verdict`.
//!
//! The reasoning itself is delegated to an `AnteriorAdapter`; this module's
//! job is the contract around that adapter — if it errors or times out, the
//! reasoner never propagates the failure upstream. It downgrades to a
//! low-confidence fallback verdict and lets the pipeline continue.

use async_trait::async_trait;

use crate::resonator::ResonanceRecord;
use crate::types::{AdapterError, Verdict};

#[async_trait]
pub trait AnteriorAdapter: Send + Sync {
    async fn reason(&self, record: &ResonanceRecord) -> Result<Verdict, AdapterError>;
}

/// Deterministic adapter used when no model-backed reasoner is configured:
/// folds the resonance score directly into verdict confidence.
pub struct DefaultAnteriorAdapter;

#[async_trait]
impl AnteriorAdapter for DefaultAnteriorAdapter {
    async fn reason(&self, record: &ResonanceRecord) -> Result<Verdict, AdapterError> {
        Ok(Verdict::new(record.symbol.clone(), record.resonance_score, record.id))
    }
}

pub struct AnteriorReasoner {
    adapter: Box<dyn AnteriorAdapter>,
}

impl AnteriorReasoner {
    pub fn new(adapter: Box<dyn AnteriorAdapter>) -> Self {
        Self { adapter }
    }

    /// Always returns a `Verdict`. An adapter failure is logged and replaced
    /// with `Verdict::fallback`, never surfaced as an error to the caller.
    /// `upstream_id` is always the producing `ResonanceRecord`'s own id.
    pub async fn produce_verdict(&self, record: &ResonanceRecord) -> Verdict {
        match self.adapter.reason(record).await {
            Ok(verdict) => {
                tracing::debug!(verdict_id = %verdict.id, confidence = verdict.confidence, "verdict produced");
                verdict
            }
            Err(err) => {
                tracing::warn!(error = %err, resonance_id = %record.id, "anterior adapter failed, falling back to low-confidence verdict");
                Verdict::fallback(record.id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    struct FailingAdapter;

    #[async_trait]
    impl AnteriorAdapter for FailingAdapter {
        async fn reason(&self, _record: &ResonanceRecord) -> Result<Verdict, AdapterError> {
            Err(AdapterError::Failed {
                backend: "test".to_string(),
                message: "boom".to_string(),
            })
        }
    }

    fn record(resonance_score: f64) -> ResonanceRecord {
        ResonanceRecord {
            id: Uuid::new_v4(),
            resonance_score,
            symbol: "s".to_string(),
            patterns: vec!["s".to_string()],
            produced_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn default_adapter_carries_resonance_score_into_confidence() {
        let reasoner = AnteriorReasoner::new(Box::new(DefaultAnteriorAdapter));
        let record = record(0.7);
        let verdict = reasoner.produce_verdict(&record).await;
        assert_eq!(verdict.confidence, 0.7);
        assert_eq!(verdict.upstream_id, record.id);
    }

    #[tokio::test]
    async fn adapter_error_downgrades_to_low_confidence_fallback_without_erroring() {
        let reasoner = AnteriorReasoner::new(Box::new(FailingAdapter));
        let record = record(0.9);
        let verdict = reasoner.produce_verdict(&record).await;
        assert!(verdict.confidence < 0.2);
        assert_eq!(verdict.upstream_id, record.id);
    }
}
