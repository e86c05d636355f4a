//! Runs a lifecycle from start to shutdown.
//!
//! [`Supervisor::run`] is the usual body of `main`:
//!
//! 1. start every hook within `start_timeout`, rolling back on failure
//! 2. wait for a [`Shutdowner`] request or Ctrl-C
//! 3. stop every started hook within `stop_timeout`

use std::sync::Arc;

use stagehand_lifecycle::context::Context;
use stagehand_lifecycle::error::LifecycleError;
use stagehand_lifecycle::lifecycle::DefaultLifecycle;
use tracing::{error, info, warn};

use crate::config::LifecycleConfig;
use crate::error::RuntimeError;
use crate::shutdown::Shutdowner;

/// Drives a [`DefaultLifecycle`] through start, wait and stop.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use stagehand_lifecycle::prelude::*;
/// use stagehand_runtime::{LifecycleConfig, Supervisor};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let lifecycle = Arc::new(DefaultLifecycle::new());
/// let supervisor = Supervisor::new(Arc::clone(&lifecycle), LifecycleConfig::default())
///     .with_ctrl_c(false);
///
/// // Exit as soon as everything is up.
/// let shutdowner = supervisor.shutdowner();
/// lifecycle.append(
///     Hook::callbacks("oneshot")
///         .on_start(move |_| {
///             shutdowner.shutdown();
///             async { Ok(()) }
///         })
///         .into(),
/// );
///
/// supervisor.run().await.unwrap();
/// assert_eq!(lifecycle.num_started(), 0);
/// # }
/// ```
#[derive(Debug)]
pub struct Supervisor {
    lifecycle: Arc<DefaultLifecycle>,
    config: LifecycleConfig,
    shutdowner: Shutdowner,
    /// Whether Ctrl-C also triggers a shutdown.
    ctrl_c: bool,
}

impl Supervisor {
    /// Creates a supervisor that also listens for Ctrl-C.
    #[must_use]
    pub fn new(lifecycle: Arc<DefaultLifecycle>, config: LifecycleConfig) -> Self {
        Self {
            lifecycle,
            config,
            shutdowner: Shutdowner::new(),
            ctrl_c: true,
        }
    }

    /// Enables or disables the Ctrl-C listener.
    #[must_use]
    pub fn with_ctrl_c(mut self, enabled: bool) -> Self {
        self.ctrl_c = enabled;
        self
    }

    /// Returns a handle that requests shutdown.
    #[must_use]
    pub fn shutdowner(&self) -> Shutdowner {
        self.shutdowner.clone()
    }

    /// Returns the timeouts in use.
    #[must_use]
    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    /// Runs the start pass with the start budget.
    ///
    /// On failure the hooks that did start are stopped with the stop budget
    /// before returning. A failing rollback is logged; the start error is
    /// what gets returned.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Start`] if a start hook failed.
    pub async fn start(&self) -> Result<(), RuntimeError> {
        info!(
            hooks = self.lifecycle.len(),
            timeout = ?self.config.start_timeout(),
            "Starting"
        );
        let ctx = Context::background().with_timeout(self.config.start_timeout());
        if let Err(err) = self.lifecycle.start(&ctx).await {
            warn!(
                started = self.lifecycle.num_started(),
                "Start failed, rolling back"
            );
            if let Err(rollback) = self.stop_pass().await {
                error!(error = %rollback, "Rollback failed");
            }
            return Err(RuntimeError::Start(err));
        }
        info!("Started");
        Ok(())
    }

    /// Runs the stop pass with the stop budget.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Stop`] if any stop hook failed or the budget
    /// ran out.
    pub async fn stop(&self) -> Result<(), RuntimeError> {
        info!(
            hooks = self.lifecycle.num_started(),
            timeout = ?self.config.stop_timeout(),
            "Stopping"
        );
        self.stop_pass().await.map_err(RuntimeError::Stop)?;
        info!("Stopped");
        Ok(())
    }

    async fn stop_pass(&self) -> Result<(), LifecycleError> {
        let ctx = Context::background().with_timeout(self.config.stop_timeout());
        self.lifecycle.stop(&ctx).await
    }

    /// Resolves once a shutdown is requested through the [`Shutdowner`] or,
    /// if enabled, Ctrl-C is received.
    pub async fn wait(&self) {
        if !self.ctrl_c {
            self.shutdowner.wait().await;
            return;
        }

        tokio::select! {
            () = self.shutdowner.wait() => {}
            signal = tokio::signal::ctrl_c() => match signal {
                Ok(()) => {
                    info!("Received Ctrl-C");
                    self.shutdowner.shutdown();
                }
                Err(err) => {
                    warn!(error = %err, "Unable to listen for Ctrl-C");
                    self.shutdowner.wait().await;
                }
            },
        }
    }

    /// Starts, waits for shutdown, then stops.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::Start`] if start failed (after rolling back).
    /// - [`RuntimeError::Stop`] if stop failed.
    /// - [`RuntimeError::Shutdown`] with the error passed to
    ///   [`Shutdowner::shutdown_with_error`] when stop itself succeeded.
    pub async fn run(&self) -> Result<(), RuntimeError> {
        self.start().await?;
        self.wait().await;
        self.stop().await?;
        match self.shutdowner.take_error() {
            Some(err) => Err(RuntimeError::Shutdown(err)),
            None => Ok(()),
        }
    }
}
