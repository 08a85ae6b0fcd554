//! # elegua-std
//!
//! Standard implementations for the Elegua navigation engine.
//!
//! This crate provides:
//! - **Reactive stores**: [`store::Writable`], [`store::ReadOnly`]
//! - **In-memory platform**: [`platform::MemoryPlatform`] (history stack and event dispatch)
//! - **Standard hooks**: Logging, closures as hooks
//! - **Testing utilities**: recording hooks and subscribers

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use elegua_core;

// Modules
pub mod hooks;
pub mod platform;
pub mod store;
pub mod testing;
