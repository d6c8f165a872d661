//! Consent Authority (C3): a pluggable boolean-decision gate with six modes
//! (`always_yes`, `always_no`, `random`, `manual`, `voice`, `custom`).
//!
//! `manual`/`voice` consent is resolved through a one-shot completion slot per
//! `memory_id`. A producer (`provide_live_signal`) may race ahead of the
//! consumer (`get_live_signal`): if the signal arrives first, it is stashed
//! as an already-resolved slot so the later `get_live_signal` call returns
//! immediately instead of hanging.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use rand::Rng;
use tokio::sync::oneshot;
use tokio::time::Duration;

use crate::config::{ConsentConfig, ConsentMode};
use crate::types::{AuditAction, AuditEntry, AuditVerdict, CancelToken, Payload};
use crate::vault::MemoryVault;

/// External collaborator that turns a spoken prompt into a yes/no decision.
/// `context` and `proposed_payload` let the callback see what it is being
/// asked to approve instead of just the bare `memory_id`.
#[async_trait]
pub trait VoiceCallback: Send + Sync {
    async fn ask(
        &self,
        memory_id: &str,
        context: Option<&serde_json::Value>,
        proposed_payload: Option<&Payload>,
    ) -> Result<bool, String>;
}

pub type CustomConsentFn = Arc<
    dyn Fn(&str, Option<&serde_json::Value>, Option<&Payload>) -> Result<bool, String>
        + Send
        + Sync,
>;

/// Advisory reflection values carried into the consent audit entry. These
/// come from the Drift Harmonizer and never affect the decision itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsentReflection {
    pub ethical_drift: f64,
    pub adjusted_moral_charge: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct ConsentOutcome {
    pub approved: bool,
    pub timed_out: bool,
    pub cancelled: bool,
}

enum ConsentSlot {
    Waiting(oneshot::Sender<bool>),
    Resolved(bool),
}

pub struct ConsentAuthority {
    mode: ConsentMode,
    timeout: Duration,
    custom_fn: Option<CustomConsentFn>,
    voice_callback: Option<Arc<dyn VoiceCallback>>,
    waiters: DashMap<String, ConsentSlot>,
    vault: Arc<MemoryVault>,
}

impl ConsentAuthority {
    pub fn new(config: ConsentConfig, vault: Arc<MemoryVault>) -> Self {
        Self {
            mode: config.mode,
            timeout: Duration::from_millis(config.timeout_ms),
            custom_fn: None,
            voice_callback: None,
            waiters: DashMap::new(),
            vault,
        }
    }

    pub fn set_custom_logic(&mut self, f: CustomConsentFn) {
        self.custom_fn = Some(f);
        self.mode = ConsentMode::Custom;
    }

    pub fn set_voice_callback(&mut self, callback: Arc<dyn VoiceCallback>) {
        self.voice_callback = Some(callback);
    }

    /// Resolves consent for `memory_id` and appends exactly one audit entry
    /// recording the decision, regardless of mode or outcome. `context` and
    /// `proposed_payload` are forwarded to `custom`/`voice` backends so a real
    /// policy function can see what it is being asked to approve.
    pub async fn get_live_signal(
        &self,
        memory_id: &str,
        reflection: ConsentReflection,
        context: Option<&serde_json::Value>,
        proposed_payload: Option<&Payload>,
        cancel: &CancelToken,
    ) -> ConsentOutcome {
        let outcome = self
            .resolve(memory_id, context, proposed_payload, cancel)
            .await;

        let verdict = if outcome.timed_out {
            AuditVerdict::Timeout
        } else if outcome.approved {
            AuditVerdict::Approved
        } else {
            AuditVerdict::Denied
        };
        self.vault.append_consent_entry(AuditEntry::new(
            AuditAction::ConsentDecision,
            memory_id,
            verdict,
            mode_label(self.mode),
            None,
            reflection.ethical_drift,
            reflection.adjusted_moral_charge,
        ));

        outcome
    }

    async fn resolve(
        &self,
        memory_id: &str,
        context: Option<&serde_json::Value>,
        proposed_payload: Option<&Payload>,
        cancel: &CancelToken,
    ) -> ConsentOutcome {
        match self.mode {
            ConsentMode::AlwaysYes => ConsentOutcome {
                approved: true,
                timed_out: false,
                cancelled: false,
            },
            ConsentMode::AlwaysNo => ConsentOutcome {
                approved: false,
                timed_out: false,
                cancelled: false,
            },
            ConsentMode::Random => ConsentOutcome {
                approved: rand::thread_rng().gen_bool(0.5),
                timed_out: false,
                cancelled: false,
            },
            ConsentMode::Custom => {
                let approved = match &self.custom_fn {
                    Some(f) => f(memory_id, context, proposed_payload).unwrap_or(false),
                    None => false,
                };
                ConsentOutcome {
                    approved,
                    timed_out: false,
                    cancelled: false,
                }
            }
            ConsentMode::Voice => {
                let callback = self.voice_callback.clone();
                self.wait_for_external(memory_id, cancel, move |id| {
                    let callback = callback.clone();
                    let id = id.to_string();
                    async move {
                        match callback {
                            Some(cb) => cb.ask(&id, context, proposed_payload).await.unwrap_or(false),
                            None => false,
                        }
                    }
                })
                .await
            }
            ConsentMode::Manual => {
                self.wait_for_manual_signal(memory_id, cancel).await
            }
        }
    }

    /// Shared plumbing for modes that must suspend on an external signal
    /// (voice uses a direct callback await; manual uses the waiter slot).
    async fn wait_for_external<F, Fut>(
        &self,
        memory_id: &str,
        cancel: &CancelToken,
        call: F,
    ) -> ConsentOutcome
    where
        F: FnOnce(&str) -> Fut,
        Fut: std::future::Future<Output = bool>,
    {
        tokio::select! {
            _ = cancel.cancelled() => ConsentOutcome { approved: false, timed_out: false, cancelled: true },
            result = tokio::time::timeout(self.timeout, call(memory_id)) => match result {
                Ok(approved) => ConsentOutcome { approved, timed_out: false, cancelled: false },
                Err(_) => ConsentOutcome { approved: false, timed_out: true, cancelled: false },
            },
        }
    }

    async fn wait_for_manual_signal(&self, memory_id: &str, cancel: &CancelToken) -> ConsentOutcome {
        if let Some((_, slot)) = self.waiters.remove(memory_id) {
            if let ConsentSlot::Resolved(value) = slot {
                return ConsentOutcome {
                    approved: value,
                    timed_out: false,
                    cancelled: false,
                };
            }
        }

        let (tx, rx) = oneshot::channel();
        self.waiters.insert(memory_id.to_string(), ConsentSlot::Waiting(tx));

        let result = tokio::select! {
            _ = cancel.cancelled() => {
                self.waiters.remove(memory_id);
                return ConsentOutcome { approved: false, timed_out: false, cancelled: true };
            }
            result = tokio::time::timeout(self.timeout, rx) => result,
        };

        self.waiters.remove(memory_id);
        match result {
            Ok(Ok(approved)) => ConsentOutcome {
                approved,
                timed_out: false,
                cancelled: false,
            },
            Ok(Err(_)) | Err(_) => ConsentOutcome {
                approved: false,
                timed_out: true,
                cancelled: false,
            },
        }
    }

    /// Provides a manual consent decision. If a waiter is already parked on
    /// `memory_id`, it is resolved immediately; otherwise the decision is
    /// stashed so the next `get_live_signal` call for this `memory_id`
    /// returns it without waiting.
    pub fn provide_live_signal(&self, memory_id: &str, value: bool) {
        match self.waiters.remove(memory_id) {
            Some((_, ConsentSlot::Waiting(tx))) => {
                let _ = tx.send(value);
            }
            _ => {
                self.waiters
                    .insert(memory_id.to_string(), ConsentSlot::Resolved(value));
            }
        }
    }

    pub fn mode(&self) -> ConsentMode {
        self.mode
    }
}

fn mode_label(mode: ConsentMode) -> &'static str {
    match mode {
        ConsentMode::AlwaysYes => "always_yes",
        ConsentMode::AlwaysNo => "always_no",
        ConsentMode::Random => "random",
        ConsentMode::Manual => "manual",
        ConsentMode::Voice => "voice",
        ConsentMode::Custom => "custom",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harmonizer::DriftHarmonizer;

    fn vault() -> Arc<MemoryVault> {
        Arc::new(MemoryVault::new(
            DriftHarmonizer::new(Default::default()),
            Arc::new(crate::telemetry::CognitionTelemetry::new()),
        ))
    }

    #[tokio::test]
    async fn always_yes_approves_and_logs_exactly_one_entry() {
        let vault = vault();
        let authority = ConsentAuthority::new(
            ConsentConfig {
                mode: ConsentMode::AlwaysYes,
                timeout_ms: 1000,
            },
            vault.clone(),
        );
        let outcome = authority
            .get_live_signal("m1", ConsentReflection::default(), None, None, &CancelToken::never())
            .await;
        assert!(outcome.approved);
        assert_eq!(vault.audit_log().len(), 1);
    }

    #[tokio::test]
    async fn always_no_denies() {
        let vault = vault();
        let authority = ConsentAuthority::new(
            ConsentConfig {
                mode: ConsentMode::AlwaysNo,
                timeout_ms: 1000,
            },
            vault,
        );
        let outcome = authority
            .get_live_signal("m1", ConsentReflection::default(), None, None, &CancelToken::never())
            .await;
        assert!(!outcome.approved);
        assert!(!outcome.timed_out);
    }

    #[tokio::test]
    async fn manual_mode_times_out_when_no_signal_arrives() {
        let vault = vault();
        let authority = ConsentAuthority::new(
            ConsentConfig {
                mode: ConsentMode::Manual,
                timeout_ms: 20,
            },
            vault,
        );
        let outcome = authority
            .get_live_signal("m1", ConsentReflection::default(), None, None, &CancelToken::never())
            .await;
        assert!(!outcome.approved);
        assert!(outcome.timed_out);
    }

    #[tokio::test]
    async fn manual_mode_resolves_when_signal_arrives_before_request() {
        let vault = vault();
        let authority = ConsentAuthority::new(
            ConsentConfig {
                mode: ConsentMode::Manual,
                timeout_ms: 1000,
            },
            vault,
        );
        authority.provide_live_signal("m1", true);
        let outcome = authority
            .get_live_signal("m1", ConsentReflection::default(), None, None, &CancelToken::never())
            .await;
        assert!(outcome.approved);
        assert!(!outcome.timed_out);
    }

    #[tokio::test]
    async fn manual_mode_resolves_when_signal_arrives_after_request_starts() {
        let vault = vault();
        let authority = Arc::new(ConsentAuthority::new(
            ConsentConfig {
                mode: ConsentMode::Manual,
                timeout_ms: 1000,
            },
            vault,
        ));
        let authority2 = authority.clone();
        let waiter = tokio::spawn(async move {
            authority2
                .get_live_signal("m1", ConsentReflection::default(), None, None, &CancelToken::never())
                .await
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        authority.provide_live_signal("m1", true);
        let outcome = waiter.await.unwrap();
        assert!(outcome.approved);
    }

    #[tokio::test]
    async fn cancellation_resolves_as_denied_not_timed_out() {
        let vault = vault();
        let authority = ConsentAuthority::new(
            ConsentConfig {
                mode: ConsentMode::Manual,
                timeout_ms: 5000,
            },
            vault,
        );
        let cancel = CancelToken::never();
        cancel.cancel();
        let outcome = authority
            .get_live_signal("m1", ConsentReflection::default(), None, None, &cancel)
            .await;
        assert!(!outcome.approved);
        assert!(!outcome.timed_out);
        assert!(outcome.cancelled);
    }
}
