//! # Stagehand Internal Library
//!
//! Re-exports the core stagehand crates for convenience.

/// Layer 1: Ordered start/stop hook orchestration.
pub use stagehand_lifecycle;

/// Layer 1: Tracing subscriber setup.
pub use stagehand_core;

/// Layer 2: Lifecycle supervision and shutdown.
pub use stagehand_runtime;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use stagehand_core::{TracingConfig, TracingFormat};
    pub use stagehand_lifecycle::prelude::*;
    pub use stagehand_runtime::{LifecycleConfig, RuntimeError, Shutdowner, Supervisor};
}
