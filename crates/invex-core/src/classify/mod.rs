//! Record classification against prior persisted state.

pub mod engine;
pub mod store;

pub use engine::ClassificationEngine;
pub use store::{MemoryStore, RecordLookup, RecordSink, RecordStore};
