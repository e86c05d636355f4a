//! Ordered startup and shutdown of registered hooks (Layer 1).
//!
//! `stagehand_lifecycle` provides the core primitives for sequencing the
//! components of a long-running process:
//!
//! - [`context`] - Cancellable, deadline-aware execution contexts
//! - [`hook`] - Hook values and the [`Component`](hook::Component) trait
//! - [`registry`] - Append-only, order-preserving hook storage
//! - [`lifecycle`] - Start/stop orchestration with rollback bookkeeping
//! - [`diagnostics`] - Human-readable listing of registered hooks
//! - [`error`] - Start, stop and context errors
//!
//! # Guarantees
//!
//! - Hooks start in registration order and stop in exact reverse order.
//! - The first failing start hook aborts the start pass; only hooks that
//!   actually started are eligible for stopping.
//! - Stopping is best-effort: every failure is collected and reported
//!   together, unless the stop context expires first.
//!
//! # Example
//!
//! ```
//! use stagehand_lifecycle::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let lifecycle = DefaultLifecycle::new();
//!
//! lifecycle.append(
//!     Hook::callbacks("database")
//!         .on_start(|_ctx| async { Ok(()) })
//!         .on_stop(|_ctx| async { Ok(()) })
//!         .into(),
//! );
//!
//! let ctx = Context::background();
//! lifecycle.start(&ctx).await.unwrap();
//! assert_eq!(lifecycle.num_started(), 1);
//!
//! lifecycle.stop(&ctx).await.unwrap();
//! assert_eq!(lifecycle.num_started(), 0);
//! # }
//! ```

/// Cancellable, deadline-aware execution contexts.
pub mod context;

/// Human-readable listing of registered hooks.
pub mod diagnostics;

/// Start, stop and context errors.
pub mod error;

/// Hook values and the component capability.
pub mod hook;

/// Start/stop orchestration.
pub mod lifecycle;

/// Append-only hook storage.
pub mod registry;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::context::{Context, ContextError, ContextGuard, HookContext};
    pub use crate::diagnostics::HookListing;
    pub use crate::error::{HookError, HookFailure, HookResult, LifecycleError, StopErrors};
    pub use crate::hook::{BoxFuture, CallbackHook, Component, Hook};
    pub use crate::lifecycle::{DefaultLifecycle, Lifecycle, LifecyclePhase};
    pub use crate::registry::HookRegistry;
}
