//! Memory shards: the vault's content-addressed, immutable-until-consented unit.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

use super::resonance::ResonanceTag;

pub type Payload = HashMap<String, serde_json::Value>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryShard {
    pub memory_id: String,
    pub payload: Payload,
    pub resonance: ResonanceTag,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub last_modified: chrono::DateTime<chrono::Utc>,
    pub hash_signature: String,
}

impl MemoryShard {
    pub fn new(memory_id: impl Into<String>, payload: Payload, resonance: ResonanceTag) -> Self {
        let now = chrono::Utc::now();
        let hash_signature = hash_payload(&payload);
        Self {
            memory_id: memory_id.into(),
            payload,
            resonance,
            created_at: now,
            last_modified: now,
            hash_signature,
        }
    }

    /// Recomputes the content hash; callers must call this after any payload mutation.
    pub fn recompute_hash(&mut self) {
        self.hash_signature = hash_payload(&self.payload);
    }
}

/// Canonicalizes the payload (sorted keys) and hashes it with SHA-256, matching
/// the vault's content-addressing contract: identical payloads hash identically
/// regardless of insertion order.
pub fn hash_payload(payload: &Payload) -> String {
    let canonical = serde_json::to_string(&sort_value(payload))
        .expect("HashMap<String, Value> always serializes");
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// serde_json::Map preserves insertion order; this walks the structure to produce
/// a deterministic key-sorted `serde_json::Value` tree before serializing it.
fn sort_value(payload: &Payload) -> serde_json::Value {
    let mut keys: Vec<&String> = payload.keys().collect();
    keys.sort();
    let mut map = serde_json::Map::new();
    for key in keys {
        map.insert(key.clone(), payload[key].clone());
    }
    serde_json::Value::Object(map)
}
