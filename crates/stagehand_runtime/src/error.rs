//! Errors returned by [`Supervisor`](crate::Supervisor).

use stagehand_lifecycle::error::{HookError, LifecycleError};

/// Outcome of a failed [`Supervisor::run`](crate::Supervisor::run).
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The start pass failed. Started hooks were rolled back before this
    /// was returned.
    #[error("start failed: {0}")]
    Start(#[source] LifecycleError),
    /// The stop pass reported failures or ran out of time.
    #[error("stop failed: {0}")]
    Stop(#[source] LifecycleError),
    /// The process stopped cleanly after a shutdown requested with an error.
    #[error("shut down with error: {0}")]
    Shutdown(#[source] HookError),
}

impl RuntimeError {
    /// Returns the lifecycle error behind a start or stop failure.
    #[must_use]
    pub fn lifecycle_error(&self) -> Option<&LifecycleError> {
        match self {
            Self::Start(err) | Self::Stop(err) => Some(err),
            Self::Shutdown(_) => None,
        }
    }
}
