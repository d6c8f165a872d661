//! # Unified Cognition Loop
//!
//! A reflective reasoning pipeline that turns a raw stimulus into an
//! articulated, consented output by running it through a fixed sequence of
//! advisory stages: resonance extraction, anterior reasoning, multi-seed
//! reflection (EchoStack), recursive stabilization (EchoRipple), posterior
//! rethinking, drift harmonization, consent, and articulation.
//!
//! ## Overview
//!
//! Every request moves through the same nine stages in the same order:
//!
//! ```text
//! INPUT -> RESONATE -> ANTERIOR -> ECHOSTACK -> ECHORIPPLE -> POSTERIOR
//!       -> HARMONIZE -> CONSENT -> ARTICULATE (or DONE/FAILED/CANCELED)
//! ```
//!
//! No stage may run out of order and no stage may be skipped, though a
//! denied or timed-out consent decision short-circuits articulation. Every
//! mutation to stored memory, and every consent decision reached along the
//! way, is recorded in an append-only audit log.
//!
//! ## Key properties
//!
//! - **Content-addressed memory**: every stored shard is hashed from its
//!   canonicalized payload; identical payloads produce identical hashes.
//! - **Advisory drift and escalation**: the harmonizer's drift/moral-charge
//!   computation and the posterior reasoner's maleficence/hackling detectors
//!   never veto a request — they are logged and carried forward for the
//!   caller to act on, never used to block consent or articulation.
//! - **Pluggable consent**: six consent modes (`always_yes`, `always_no`,
//!   `random`, `manual`, `voice`, `custom`) behind one `ConsentAuthority`,
//!   with cooperative cancellation that resolves a pending wait as denied,
//!   distinct from a timeout.
//! - **Backpressure, not queuing**: a fixed `max_in_flight` admission limit
//!   rejects excess requests immediately rather than queuing them.
//!
//! ## Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use cognition_runtime::anterior::{AnteriorReasoner, DefaultAnteriorAdapter};
//! use cognition_runtime::articulator::{Articulator, EchoSpeaker};
//! use cognition_runtime::config::CognitionConfig;
//! use cognition_runtime::consent::ConsentAuthority;
//! use cognition_runtime::echoripple::EchoRipple;
//! use cognition_runtime::echostack::EchoStack;
//! use cognition_runtime::harmonizer::DriftHarmonizer;
//! use cognition_runtime::orchestrator::CognitionOrchestrator;
//! use cognition_runtime::posterior::PosteriorReasoner;
//! use cognition_runtime::resonator::DefaultResonator;
//! use cognition_runtime::telemetry::CognitionTelemetry;
//! use cognition_runtime::types::SeedBank;
//! use cognition_runtime::vault::MemoryVault;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CognitionConfig::default();
//!     config.validate()?;
//!
//!     let telemetry = Arc::new(CognitionTelemetry::new());
//!     let vault = Arc::new(MemoryVault::new(
//!         DriftHarmonizer::new(config.harmonizer),
//!         telemetry.clone(),
//!     ));
//!     let orchestrator = CognitionOrchestrator::new(
//!         config.clone(),
//!         Arc::new(DefaultResonator::default()),
//!         Arc::new(AnteriorReasoner::new(Box::new(DefaultAnteriorAdapter))),
//!         Arc::new(EchoStack::new(SeedBank::default_bank())),
//!         Arc::new(EchoRipple::new(config.echo_ripple, config.seeds.bank.full.clone())),
//!         Arc::new(PosteriorReasoner::new(
//!             config.posterior,
//!             config.seeds.bank.philosopher.clone(),
//!             config.seeds.bank.system.clone(),
//!         )),
//!         Arc::new(ConsentAuthority::new(config.consent, vault.clone())),
//!         Arc::new(Articulator::new(Box::new(EchoSpeaker))),
//!         vault,
//!         telemetry,
//!     );
//!
//!     let outcome = orchestrator.submit("memory-1", "a stimulus to reason about").await?;
//!     println!("{:?}", outcome.final_output);
//!     Ok(())
//! }
//! ```
//!
//! ## The pipeline stages
//!
//! 1. **Memory Vault** ([`vault`]): content-addressed, consent-gated shard
//!    storage plus the append-only audit log.
//! 2. **Drift Harmonizer** ([`harmonizer`]): pure, stateless advisory drift
//!    and moral-charge computation.
//! 3. **Consent Authority** ([`consent`]): the pluggable yes/no gate every
//!    mutation and every pipeline run must pass through.
//! 4. **Resonator** ([`resonator`]): extracts a resonance record from a raw
//!    stimulus.
//! 5. **Anterior Reasoner** ([`anterior`]): turns a resonance record into a
//!    verdict, degrading gracefully on adapter failure.
//! 6. **EchoStack** ([`echostack`]): applies every seed in the bank to a
//!    verdict's confidence.
//! 7. **EchoRipple** ([`echoripple`]): recursively stabilizes an EchoStack
//!    delta across a fixed number of cycles.
//! 8. **Posterior Reasoner** ([`posterior`]): rethinks a stabilized
//!    reflection, extending its cycle count on a first drift breach and
//!    flagging maleficence or hackling for advisory escalation.
//! 9. **Articulator** ([`articulator`]): turns an approved result into
//!    output text.
//!
//! [`orchestrator`] wires all nine into the per-request state machine.

#![warn(clippy::all)]

pub mod anterior;
pub mod articulator;
pub mod config;
pub mod consent;
pub mod echoripple;
pub mod echostack;
pub mod harmonizer;
pub mod orchestrator;
pub mod posterior;
pub mod resonator;
pub mod telemetry;
pub mod types;
pub mod vault;

pub use config::CognitionConfig;
pub use orchestrator::{CognitionOrchestrator, CognitionOutcome, PipelineState};
pub use telemetry::CognitionTelemetry;
pub use vault::MemoryVault;

pub use types::{
    AdapterError, AuditAction, AuditEntry, AuditVerdict, ConfigError, ConsentError, MemoryShard,
    OrchestratorError, Payload, ReflectionDelta, ResonanceTag, StabilizedReflection, Tone, VaultError,
    Verdict,
};
