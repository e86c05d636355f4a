//! Shutdown requests from inside the process.

use std::sync::Arc;

use parking_lot::Mutex;
use stagehand_lifecycle::error::HookError;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Cloneable handle that asks a [`Supervisor`](crate::Supervisor) to stop.
///
/// Hooks and background tasks keep a clone and call
/// [`shutdown()`](Self::shutdown) when the process should exit, or
/// [`shutdown_with_error()`](Self::shutdown_with_error) when it should exit
/// because something broke. Only the first error is kept.
///
/// # Example
///
/// ```
/// use stagehand_runtime::Shutdowner;
///
/// let shutdowner = Shutdowner::new();
/// let handle = shutdowner.clone();
///
/// handle.shutdown_with_error("disk full");
/// handle.shutdown_with_error("ignored");
///
/// assert!(shutdowner.is_shutdown());
/// assert_eq!(shutdowner.take_error().unwrap().to_string(), "disk full");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Shutdowner {
    token: CancellationToken,
    error: Arc<Mutex<Option<HookError>>>,
}

impl Shutdowner {
    /// Creates a handle with no shutdown requested.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a clean shutdown. Idempotent.
    pub fn shutdown(&self) {
        if !self.token.is_cancelled() {
            info!("Shutdown requested");
        }
        self.token.cancel();
    }

    /// Requests a shutdown and records why.
    ///
    /// The first recorded error is returned by the supervisor; later ones
    /// are logged and dropped.
    pub fn shutdown_with_error(&self, error: impl Into<HookError>) {
        let error = error.into();
        {
            let mut slot = self.error.lock();
            if slot.is_none() {
                warn!(error = %error, "Shutdown requested with error");
                *slot = Some(error);
            } else {
                warn!(error = %error, "Shutdown already requested, dropping error");
            }
        }
        self.token.cancel();
    }

    /// Returns true once any shutdown was requested.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once a shutdown was requested.
    pub async fn wait(&self) {
        self.token.cancelled().await;
    }

    /// Removes and returns the recorded error, if any.
    pub fn take_error(&self) -> Option<HookError> {
        self.error.lock().take()
    }

    /// Returns a token cancelled when a shutdown is requested.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}
