//! The Anterior Reasoner's output record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub id: Uuid,
    pub value: String,
    /// 0.0..=1.0
    pub confidence: f64,
    pub produced_at: chrono::DateTime<chrono::Utc>,
    pub upstream_id: Uuid,
}

impl Verdict {
    pub fn new(value: impl Into<String>, confidence: f64, upstream_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            value: value.into(),
            confidence: confidence.clamp(0.0, 1.0),
            produced_at: chrono::Utc::now(),
            upstream_id,
        }
    }

    /// Low-confidence placeholder verdict, produced when the adapter backing
    /// the Anterior Reasoner fails or times out. The pipeline never aborts on
    /// an adapter error; it downgrades to this and continues.
    pub fn fallback(upstream_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            value: "uncertain".to_string(),
            confidence: 0.1,
            produced_at: chrono::Utc::now(),
            upstream_id,
        }
    }
}
