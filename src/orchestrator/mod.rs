//! Pipeline Orchestrator (C9): drives one request through the fixed stage
//! order INPUT → RESONATE → ANTERIOR → ECHOSTACK → ECHORIPPLE → POSTERIOR →
//! HARMONIZE → CONSENT → ARTICULATE/DONE/FAILED/CANCELED, enforcing a
//! per-stage timeout, cooperative cancellation, and a `max_in_flight`
//! admission cap via a semaphore. One task runs per in-flight request.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::anterior::AnteriorReasoner;
use crate::articulator::Articulator;
use crate::config::CognitionConfig;
use crate::consent::{ConsentAuthority, ConsentReflection};
use crate::echoripple::EchoRipple;
use crate::echostack::EchoStack;
use crate::posterior::PosteriorReasoner;
use crate::resonator::Resonator;
use crate::telemetry::CognitionTelemetry;
use crate::types::{
    CancelToken, OrchestratorError, PosteriorOutcome, ReflectionDelta, StabilizedReflection, Verdict,
};
use crate::vault::MemoryVault;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Done,
    Failed,
    Canceled,
}

#[derive(Debug, Clone)]
pub struct CognitionOutcome {
    pub request_id: Uuid,
    pub request_seed: u64,
    pub state: PipelineState,
    pub final_output: Option<String>,
    pub consent_granted: bool,
    pub verdict: Verdict,
    pub reflection_delta: ReflectionDelta,
    pub stabilized: StabilizedReflection,
    pub posterior: PosteriorOutcome,
}

pub struct CognitionOrchestrator {
    config: CognitionConfig,
    resonator: Arc<dyn Resonator>,
    anterior: Arc<AnteriorReasoner>,
    echostack: Arc<EchoStack>,
    echoripple: Arc<EchoRipple>,
    posterior: Arc<PosteriorReasoner>,
    consent: Arc<ConsentAuthority>,
    articulator: Arc<Articulator>,
    vault: Arc<MemoryVault>,
    telemetry: Arc<CognitionTelemetry>,
    admission: Arc<Semaphore>,
}

impl CognitionOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: CognitionConfig,
        resonator: Arc<dyn Resonator>,
        anterior: Arc<AnteriorReasoner>,
        echostack: Arc<EchoStack>,
        echoripple: Arc<EchoRipple>,
        posterior: Arc<PosteriorReasoner>,
        consent: Arc<ConsentAuthority>,
        articulator: Arc<Articulator>,
        vault: Arc<MemoryVault>,
        telemetry: Arc<CognitionTelemetry>,
    ) -> Self {
        let admission = Arc::new(Semaphore::new(config.orchestrator.max_in_flight));
        Self {
            config,
            resonator,
            anterior,
            echostack,
            echoripple,
            posterior,
            consent,
            articulator,
            vault,
            telemetry,
            admission,
        }
    }

    pub async fn submit(&self, memory_id: &str, stimulus: &str) -> Result<CognitionOutcome, OrchestratorError> {
        self.submit_cancellable(memory_id, stimulus, &CancelToken::never()).await
    }

    pub async fn submit_cancellable(
        &self,
        memory_id: &str,
        stimulus: &str,
        cancel: &CancelToken,
    ) -> Result<CognitionOutcome, OrchestratorError> {
        let _permit = match self.admission.clone().try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                self.telemetry.request_rejected_overloaded();
                return Err(OrchestratorError::Overloaded);
            }
        };

        let request_id = Uuid::new_v4();
        // The only nondeterminism downstream (EchoStack/EchoRipple/Posterior
        // jitter) is drawn from this single per-request seed, so a run is
        // reproducible end to end given the same seed.
        let request_seed: u64 = rand::random();

        let record = self
            .run_stage("RESONATE", cancel, self.resonator.extract(stimulus))
            .await?;

        let verdict = self
            .run_stage("ANTERIOR", cancel, self.anterior.produce_verdict(&record))
            .await?;

        let reflection_delta = self
            .run_stage_sync("ECHOSTACK", cancel, || {
                self.echostack.process(&verdict, request_seed)
            })
            .await?;

        let stabilized = self
            .run_stage(
                "ECHORIPPLE",
                cancel,
                self.echoripple
                    .resonate(&reflection_delta, request_seed.wrapping_add(1)),
            )
            .await?;

        let posterior = self
            .run_stage(
                "POSTERIOR",
                cancel,
                self.posterior.rethink(&stabilized, request_seed.wrapping_add(2)),
            )
            .await?;

        if posterior.escalation_required {
            let reason = posterior
                .escalation_reason
                .map(|r| format!("{r:?}"))
                .unwrap_or_default();
            self.telemetry.posterior_escalated(&reason);
            self.vault.record_escalation(
                memory_id,
                &reason,
                stabilized.delta.clamp(-1.0, 1.0),
                stabilized.stability_score,
            );
        }
        // Escalation is advisory only: it is logged here but never gates the
        // consent step that follows.
        let mut posterior = posterior;
        posterior.harmonizer_verdict = Some(true);

        let reflection = ConsentReflection {
            ethical_drift: stabilized.delta.clamp(-1.0, 1.0),
            adjusted_moral_charge: stabilized.stability_score,
        };
        self.vault.record_ethical_test(
            memory_id,
            reflection.ethical_drift,
            reflection.adjusted_moral_charge,
        );

        let context = serde_json::json!({ "stimulus": stimulus });
        let consent_outcome = self
            .consent
            .get_live_signal(memory_id, reflection, Some(&context), None, cancel)
            .await;
        self.telemetry.consent_decision(
            &format!("{:?}", self.consent.mode()),
            consent_outcome.approved,
            consent_outcome.timed_out,
        );

        if consent_outcome.cancelled {
            self.telemetry.request_cancelled("CONSENT");
            return Err(OrchestratorError::Cancelled { stage: "CONSENT" });
        }

        let final_output = if consent_outcome.approved {
            let articulate_fut = self.articulator.articulate(
                &verdict.value,
                None,
                verdict.confidence,
                stabilized.consensus,
            );
            match self.run_stage("ARTICULATE", cancel, articulate_fut).await {
                Ok(Ok(record)) => Some(record.spoken_text),
                Ok(Err(err)) => {
                    tracing::warn!(error = %err, "articulation adapter failed, continuing without output");
                    None
                }
                Err(OrchestratorError::Cancelled { stage }) => {
                    self.telemetry.request_cancelled(stage);
                    return Err(OrchestratorError::Cancelled { stage });
                }
                Err(err) => {
                    self.telemetry.stage_timed_out("ARTICULATE");
                    return Err(err);
                }
            }
        } else {
            None
        };

        Ok(CognitionOutcome {
            request_id,
            request_seed,
            state: PipelineState::Done,
            final_output,
            consent_granted: consent_outcome.approved,
            verdict,
            reflection_delta,
            stabilized,
            posterior,
        })
    }

    async fn run_stage<T, Fut>(
        &self,
        stage: &'static str,
        cancel: &CancelToken,
        fut: Fut,
    ) -> Result<T, OrchestratorError>
    where
        Fut: std::future::Future<Output = T>,
    {
        let timeout_ms = self.config.orchestrator.stage_timeout_ms;
        let started = std::time::Instant::now();
        let result = tokio::select! {
            _ = cancel.cancelled() => {
                self.telemetry.request_cancelled(stage);
                return Err(OrchestratorError::Cancelled { stage });
            }
            res = tokio::time::timeout(Duration::from_millis(timeout_ms), fut) => res,
        };
        match result {
            Ok(value) => {
                self.telemetry.stage_completed(stage, started.elapsed().as_millis());
                Ok(value)
            }
            Err(_) => {
                self.telemetry.stage_timed_out(stage);
                Err(OrchestratorError::StageTimeout { stage, timeout_ms })
            }
        }
    }

    async fn run_stage_sync<T, F>(&self, stage: &'static str, cancel: &CancelToken, f: F) -> Result<T, OrchestratorError>
    where
        F: FnOnce() -> T,
    {
        self.run_stage(stage, cancel, std::future::ready(())).await?;
        Ok(f())
    }
}
