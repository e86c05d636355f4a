//! Ordered startup and graceful shutdown for long-running Rust processes.
//!

pub use stagehand_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use stagehand_internal::prelude::*;
}
