//! Standard hook implementations.

pub mod func;
pub mod logging;

pub use func::FnHook;
pub use logging::LoggingHook;
