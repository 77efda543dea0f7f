pub mod accessor;
pub mod bridge;
pub mod cache;
mod client;
mod record;

pub use accessor::{Accessor, AccessorError, InMemoryAccessor};
pub use bridge::{BridgeError, Call, CallOutcome, Operation, QueryBridge};
pub use cache::{CacheError, Freshness, MutationGuard, OptimisticCache};
pub use client::{ClientError, Resource, ResourceClient};
pub use record::{id_of, merge_fields};

#[cfg(feature = "http")]
pub use bridge::{router, serve};

// Re-export the EventEmitter from the event_emitter_rs crate
#[cfg(feature = "emitter")]
pub use event_emitter_rs::EventEmitter;
