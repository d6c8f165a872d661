//! Articulator Adapter (C10): a thin, stateless wrapper around whatever
//! Speaker capability turns an approved pipeline result into spoken output.
//! It has no state of its own and is only ever invoked after consent has
//! been granted. It validates that the harmonized payload carries a
//! non-empty `final_verdict` before forwarding to the `Speaker`, and records
//! the exact text sent along with the verdict's confidence and consensus
//! label so callers can audit what was actually spoken.

use async_trait::async_trait;

use crate::types::{AdapterError, Consensus};

#[async_trait]
pub trait Speaker: Send + Sync {
    async fn speak(&self, text: &str, voice_style: Option<&str>) -> Result<String, AdapterError>;
}

/// Deterministic speaker used when no richer output backend is configured:
/// echoes the input unchanged, ignoring `voice_style`.
pub struct EchoSpeaker;

#[async_trait]
impl Speaker for EchoSpeaker {
    async fn speak(&self, text: &str, _voice_style: Option<&str>) -> Result<String, AdapterError> {
        Ok(text.to_string())
    }
}

/// What was actually spoken, retained for audit/observability purposes.
#[derive(Debug, Clone)]
pub struct ArticulationRecord {
    pub spoken_text: String,
    pub final_verdict: String,
    pub confidence: f64,
    pub consensus: Consensus,
}

pub struct Articulator {
    speaker: Box<dyn Speaker>,
}

impl Articulator {
    pub fn new(speaker: Box<dyn Speaker>) -> Self {
        Self { speaker }
    }

    /// Validates `final_verdict` is non-empty, forwards it (plus the
    /// optional `voice_style`) to the configured `Speaker`, and returns a
    /// record of exactly what was spoken. A speaker failure is reported as
    /// `AdapterError` and recorded by the caller as `speaker_error`; it does
    /// not otherwise propagate.
    pub async fn articulate(
        &self,
        final_verdict: &str,
        voice_style: Option<&str>,
        confidence: f64,
        consensus: Consensus,
    ) -> Result<ArticulationRecord, AdapterError> {
        if final_verdict.trim().is_empty() {
            tracing::warn!("articulator received an empty final_verdict");
            return Err(AdapterError::EmptyVerdict);
        }

        let spoken_text = self.speaker.speak(final_verdict, voice_style).await?;
        tracing::info!(
            chars = spoken_text.len(),
            confidence,
            consensus = ?consensus,
            "articulated final output"
        );

        Ok(ArticulationRecord {
            spoken_text,
            final_verdict: final_verdict.to_string(),
            confidence,
            consensus,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echo_speaker_returns_input_unchanged() {
        let articulator = Articulator::new(Box::new(EchoSpeaker));
        let record = articulator
            .articulate("hello", None, 0.8, Consensus::NeutralStability)
            .await
            .unwrap();
        assert_eq!(record.spoken_text, "hello");
        assert_eq!(record.final_verdict, "hello");
    }

    #[tokio::test]
    async fn empty_final_verdict_is_rejected_before_reaching_the_speaker() {
        let articulator = Articulator::new(Box::new(EchoSpeaker));
        let err = articulator
            .articulate("   ", None, 0.5, Consensus::NeutralStability)
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::EmptyVerdict));
    }

    struct FailingSpeaker;

    #[async_trait]
    impl Speaker for FailingSpeaker {
        async fn speak(&self, _text: &str, _voice_style: Option<&str>) -> Result<String, AdapterError> {
            Err(AdapterError::Failed {
                backend: "test".to_string(),
                message: "no connection".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn speaker_failure_is_reported_as_adapter_error() {
        let articulator = Articulator::new(Box::new(FailingSpeaker));
        let err = articulator
            .articulate("hello", None, 0.5, Consensus::NeutralStability)
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::Failed { .. }));
    }
}
