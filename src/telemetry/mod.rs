//! Telemetry and observability for the Unified Cognition Loop

use std::sync::RwLock;

/// Runtime telemetry sink.
///
/// Uses `RwLock` for thread-safe interior mutability so the handle can be
/// shared across async tasks without requiring `&mut self` at call sites.
pub struct CognitionTelemetry {
    metrics: RwLock<MetricsCollector>,
}

impl Default for CognitionTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl CognitionTelemetry {
    pub fn new() -> Self {
        Self {
            metrics: RwLock::new(MetricsCollector::new()),
        }
    }

    pub fn shard_stored(&self, memory_id: &str) {
        tracing::info!(memory_id, "shard stored");
        self.metrics.write().unwrap().increment("vault_store_total");
    }

    pub fn shard_mutated(&self, memory_id: &str, approved: bool) {
        tracing::info!(memory_id, approved, "shard mutation evaluated");
        let metric = if approved {
            "vault_mutation_approved_total"
        } else {
            "vault_mutation_denied_total"
        };
        self.metrics.write().unwrap().increment(metric);
    }

    pub fn consent_decision(&self, mode: &str, approved: bool, timed_out: bool) {
        tracing::info!(mode, approved, timed_out, "consent decision recorded");
        self.metrics.write().unwrap().increment("consent_decisions_total");
        if timed_out {
            self.metrics.write().unwrap().increment("consent_timeouts_total");
        }
    }

    pub fn stage_completed(&self, stage: &str, elapsed_ms: u128) {
        tracing::debug!(stage, elapsed_ms, "pipeline stage completed");
        self.metrics
            .write()
            .unwrap()
            .record_gauge(&format!("stage_latency_ms:{stage}"), elapsed_ms as f64);
    }

    pub fn stage_timed_out(&self, stage: &str) {
        tracing::warn!(stage, "pipeline stage timed out");
        self.metrics.write().unwrap().increment("stage_timeouts_total");
    }

    pub fn request_rejected_overloaded(&self) {
        tracing::warn!("request rejected: max_in_flight reached");
        self.metrics.write().unwrap().increment("requests_overloaded_total");
    }

    pub fn request_cancelled(&self, stage: &str) {
        tracing::info!(stage, "request cancelled");
        self.metrics.write().unwrap().increment("requests_cancelled_total");
    }

    pub fn posterior_escalated(&self, reason: &str) {
        tracing::warn!(reason, "posterior reasoner escalated to harmonizer");
        self.metrics.write().unwrap().increment("posterior_escalations_total");
    }

    pub fn flush(&self) {
        tracing::debug!("flushing telemetry");
        self.metrics.read().unwrap().flush();
    }
}

struct MetricsCollector {
    counters: std::collections::HashMap<String, u64>,
    gauges: std::collections::HashMap<String, f64>,
}

impl MetricsCollector {
    fn new() -> Self {
        Self {
            counters: std::collections::HashMap::new(),
            gauges: std::collections::HashMap::new(),
        }
    }

    fn increment(&mut self, metric: &str) {
        *self.counters.entry(metric.to_string()).or_insert(0) += 1;
    }

    fn record_gauge(&mut self, metric: &str, value: f64) {
        self.gauges.insert(metric.to_string(), value);
    }

    fn flush(&self) {
        tracing::trace!(counters = ?self.counters, gauges = ?self.gauges, "metrics snapshot");
    }
}
