//! Platform implementations.
//!
//! - [`MemoryPlatform`]: history stack and event dispatch held in memory
//! - [`ListenerRegistry`]: the dispatch table it uses, reusable by other bindings

pub mod memory;
pub mod registry;

pub use memory::{HistoryEntry, HistoryRejected, MemoryPlatform};
pub use registry::ListenerRegistry;
