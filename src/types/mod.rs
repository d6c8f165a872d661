//! Core type definitions for the Unified Cognition Loop

mod audit;
mod cancel;
mod errors;
mod reflection;
mod resonance;
mod seed;
mod shard;
mod verdict;

pub use audit::*;
pub use cancel::{CancelHandle, CancelToken};
pub use errors::*;
pub use reflection::*;
pub use resonance::*;
pub use seed::*;
pub use shard::{hash_payload, MemoryShard, Payload};
pub use verdict::Verdict;
