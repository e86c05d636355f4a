//! Supervision of a stagehand lifecycle (Layer 2).
//!
//! Wraps a [`DefaultLifecycle`](stagehand_lifecycle::lifecycle::DefaultLifecycle)
//! with the policy a long-running process needs around it:
//!
//! - [`LifecycleConfig`] - Start and stop budgets, loadable from TOML
//! - [`Shutdowner`] - Lets hooks and tasks request an exit
//! - [`Supervisor`] - Start, wait for shutdown or Ctrl-C, stop
//! - [`RuntimeError`] - Why a run ended badly

mod config;
mod error;
mod shutdown;
mod supervisor;

pub use config::{ConfigError, DEFAULT_START_TIMEOUT, DEFAULT_STOP_TIMEOUT, LifecycleConfig};
pub use error::RuntimeError;
pub use shutdown::Shutdowner;
pub use supervisor::Supervisor;
