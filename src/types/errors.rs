//! Error types for the Unified Cognition Loop
//!
//! One `thiserror` enum per failure domain, matching the error kinds fixed
//! by the error handling design: `not_found`, `already_exists`,
//! `stage_timeout`, `adapter_error`, `consent_timeout`, `overloaded`,
//! `cancelled`, `config_invalid`.

use thiserror::Error;

/// Errors raised by the memory vault (store/modify/delete/get/reflect).
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("memory not found: {0}")]
    NotFound(String),

    #[error("memory already exists: {0}")]
    AlreadyExists(String),

    #[error("consent denied for {memory_id}")]
    ConsentDenied { memory_id: String },
}

/// Errors raised by the consent authority.
#[derive(Debug, Error)]
pub enum ConsentError {
    #[error("consent request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("custom consent logic was not configured")]
    CustomLogicMissing,

    #[error("custom consent logic raised an error: {0}")]
    CustomLogicFailed(String),

    #[error("voice callback was not configured")]
    VoiceCallbackMissing,

    #[error("voice callback failed: {0}")]
    VoiceCallbackFailed(String),
}

/// Errors raised by upstream reasoning adapters (Anterior, Articulator).
///
/// These are always recovered locally by the caller; an `AdapterError`
/// never aborts a request before the consent stage.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("adapter '{backend}' failed: {message}")]
    Failed { backend: String, message: String },

    #[error("adapter '{backend}' timed out")]
    TimedOut { backend: String },

    #[error("articulator received an empty final_verdict, nothing to speak")]
    EmptyVerdict,
}

/// Errors raised by the pipeline orchestrator.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("stage '{stage}' exceeded its {timeout_ms}ms budget")]
    StageTimeout { stage: &'static str, timeout_ms: u64 },

    #[error("request rejected: max_in_flight capacity reached")]
    Overloaded,

    #[error("request was cancelled during stage '{stage}'")]
    Cancelled { stage: &'static str },
}

/// Configuration validation errors, raised only at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration field '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("failed to load configuration: {0}")]
    LoadFailed(String),
}
