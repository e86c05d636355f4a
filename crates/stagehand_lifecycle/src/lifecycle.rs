//! Start and stop orchestration.
//!
//! [`DefaultLifecycle`] owns the hook registry and the high-water mark of
//! started hooks. It is constructed once at the composition root and shared
//! with every collaborator that needs to register hooks; collaborators only
//! need the [`Lifecycle`] trait.
//!
//! # Lifecycle
//!
//! 1. **Registration** - collaborators call [`Lifecycle::append`]
//! 2. **Start** - [`start()`](DefaultLifecycle::start) runs start procedures
//!    in registration order, aborting on the first error
//! 3. **Stop** - [`stop()`](DefaultLifecycle::stop) runs stop procedures in
//!    reverse order for hooks that started, collecting every failure
//!
//! Start never rolls back by itself. A caller seeing a start error decides
//! what to do and then calls `stop()`, which only touches hooks that started.
//!
//! # Bookkeeping
//!
//! `num_started` counts hooks, from the front, whose start succeeded (hooks
//! with no start procedure count as started). Stop walks `[0, num_started)`
//! downward and decrements the count after every hook whether its stop
//! failed or not, so a second stop resumes where the first left off and a
//! stop with nothing started is a no-op.
//!
//! # Concurrency
//!
//! Hooks run one at a time. The registry mutex is only held to append, to
//! take a snapshot and to update the counter, never while a hook runs, so
//! hooks may call `append`. Hooks appended during a pass are picked up by
//! the next pass. Whole passes are serialized, so hooks must not call
//! `start()` or `stop()` on their own lifecycle.

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::context::{Context, ContextGuard};
use crate::diagnostics::HookListing;
use crate::error::{LifecycleError, StopErrors};
use crate::hook::Hook;
use crate::registry::HookRegistry;

// ─────────────────────────────────────────────────────────────────────────────
// Lifecycle Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Registration capability handed to collaborators.
///
/// # Example
///
/// ```
/// use stagehand_lifecycle::prelude::*;
///
/// fn register_cache(lifecycle: &dyn Lifecycle) {
///     lifecycle.append(
///         Hook::callbacks("cache")
///             .on_stop(|_ctx| async { Ok(()) })
///             .into(),
///     );
/// }
///
/// let lifecycle = DefaultLifecycle::new();
/// register_cache(&lifecycle);
/// assert_eq!(lifecycle.len(), 1);
/// ```
pub trait Lifecycle: Send + Sync {
    /// Appends a hook. Its start procedure runs after every hook appended
    /// before it; its stop procedure runs before theirs.
    fn append(&self, hook: Hook);
}

// ─────────────────────────────────────────────────────────────────────────────
// LifecyclePhase
// ─────────────────────────────────────────────────────────────────────────────

/// Observable phase of a [`DefaultLifecycle`].
///
/// `NotStarted` → `Starting` → `Started` | `StartFailed` → `Stopping` → `Stopped`.
/// A stop pass abandoned because its context expired stays in `Stopping`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecyclePhase {
    /// No start pass has run yet (initial state).
    #[default]
    NotStarted,
    /// A start pass is running.
    Starting,
    /// The last start pass started every hook.
    Started,
    /// The last start pass was aborted by the hook at `index`.
    StartFailed {
        /// Registry index of the failing hook.
        index: usize,
    },
    /// A stop pass is running, or was abandoned on context expiry.
    Stopping,
    /// The last stop pass drained the rollback window.
    Stopped,
}

// ─────────────────────────────────────────────────────────────────────────────
// DefaultLifecycle
// ─────────────────────────────────────────────────────────────────────────────

/// State guarded by the lifecycle mutex.
#[derive(Debug, Default)]
struct State {
    /// Registered hooks, in start order.
    registry: HookRegistry,
    /// Number of hooks, from the front, that are currently started.
    num_started: usize,
    /// Current phase.
    phase: LifecyclePhase,
}

/// Sequential start/stop orchestrator.
///
/// # Example
///
/// ```
/// use stagehand_lifecycle::prelude::*;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let lifecycle = DefaultLifecycle::new();
/// lifecycle.append(Hook::callbacks("a").on_start(|_| async { Ok(()) }).into());
/// lifecycle.append(Hook::callbacks("b").on_start(|_| async { Err("boom".into()) }).into());
///
/// let ctx = Context::background();
/// let err = lifecycle.start(&ctx).await.unwrap_err();
/// assert_eq!(err.failed_hook(), Some("b.on_start"));
/// assert_eq!(lifecycle.num_started(), 1);
///
/// // Roll back whatever did start.
/// lifecycle.stop(&ctx).await.unwrap();
/// assert_eq!(lifecycle.num_started(), 0);
/// # }
/// ```
#[derive(Debug, Default)]
pub struct DefaultLifecycle {
    /// Registry, counter and phase.
    state: Mutex<State>,
    /// Serializes start and stop passes. Never taken by `append`.
    pass: tokio::sync::Mutex<()>,
}

impl Lifecycle for DefaultLifecycle {
    fn append(&self, hook: Hook) {
        self.state.lock().registry.push(hook);
    }
}

impl DefaultLifecycle {
    /// Creates a lifecycle with no hooks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of registered hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().registry.len()
    }

    /// Returns true if no hook is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lock().registry.is_empty()
    }

    /// Returns the number of hooks currently considered started.
    #[must_use]
    pub fn num_started(&self) -> usize {
        self.state.lock().num_started
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> LifecyclePhase {
        self.state.lock().phase
    }

    /// Starts hooks in registration order.
    ///
    /// Every hook receives a child of `ctx` that is cancelled when this call
    /// returns. The context is not checked between hooks; a hook that wants
    /// to honor a start timeout must observe it and return an error.
    ///
    /// The pass begins at the current high-water mark, so on a fresh
    /// lifecycle it covers every hook and after a failed start it resumes at
    /// the hook that failed.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Start`] with the first hook error. Hooks
    /// before the failing one stay started; call [`stop()`](Self::stop) to
    /// roll them back.
    pub async fn start(&self, ctx: &Context) -> Result<(), LifecycleError> {
        let _pass = self.pass.lock().await;
        let guard = ContextGuard::new(ctx);

        let (hooks, first) = {
            let mut state = self.state.lock();
            state.phase = LifecyclePhase::Starting;
            (state.registry.snapshot(), state.num_started)
        };

        for (index, hook) in hooks.iter().enumerate().skip(first) {
            if let Some(name) = hook.start_name() {
                debug!(hook = %name, "Executing start hook");
                let t0 = Instant::now();
                if let Err(err) = hook.start(guard.hook_context()).await {
                    error!(hook = %name, error = %err, "Start hook failed");
                    self.state.lock().phase = LifecyclePhase::StartFailed { index };
                    return Err(LifecycleError::Start {
                        hook: name,
                        source: err,
                    });
                }
                info!(hook = %name, duration = ?t0.elapsed(), "Start hook executed");
            }
            // Hooks without a start procedure still count; they may have a stop.
            self.state.lock().num_started += 1;
        }

        self.state.lock().phase = LifecyclePhase::Started;
        Ok(())
    }

    /// Stops started hooks in reverse registration order.
    ///
    /// Only hooks in `[0, num_started)` are stopped. Each stop failure is
    /// recorded and the remaining hooks are still stopped. Before each hook
    /// the context is checked; once it is cancelled or past its deadline
    /// the remaining hooks are abandoned and stay counted as started.
    ///
    /// Calling `stop()` with nothing started returns `Ok(())` without
    /// running anything. On a lifecycle that never ran a start pass the
    /// phase stays `NotStarted`.
    ///
    /// Waiting for a running start pass counts against `ctx`.
    ///
    /// # Errors
    ///
    /// - [`LifecycleError::Context`] if the context finished before the
    ///   window was drained, including while waiting for a running start
    ///   pass. Failures collected so far are discarded.
    /// - [`LifecycleError::Stop`] with every stop failure, in order.
    pub async fn stop(&self, ctx: &Context) -> Result<(), LifecycleError> {
        // A hung start pass holds the lock; the stop budget covers the wait.
        let _pass = ctx.run_until_done(self.pass.lock()).await.map_err(|err| {
            error!(error = %err, "Stop abandoned while waiting for a running pass");
            LifecycleError::Context(err)
        })?;
        let guard = ContextGuard::new(ctx);

        let hooks = {
            let mut state = self.state.lock();
            if state.phase == LifecyclePhase::NotStarted {
                // Nothing ever started, so there is nothing to stop.
                return Ok(());
            }
            if state.num_started > 0 {
                state.phase = LifecyclePhase::Stopping;
            }
            state.registry.snapshot()
        };

        let mut errors = StopErrors::new();
        loop {
            let Some(index) = self.state.lock().num_started.checked_sub(1) else {
                break;
            };
            if let Some(err) = guard.context().err() {
                error!(error = %err, remaining = index + 1, "Stop abandoned");
                return Err(LifecycleError::Context(err));
            }

            let hook = &hooks[index];
            if let Some(name) = hook.stop_name() {
                debug!(hook = %name, "Executing stop hook");
                let t0 = Instant::now();
                match hook.stop(guard.hook_context()).await {
                    Ok(()) => info!(hook = %name, duration = ?t0.elapsed(), "Stop hook executed"),
                    Err(err) => {
                        error!(hook = %name, error = %err, "Stop hook failed");
                        errors.push(name, err);
                    }
                }
            }
            self.state.lock().num_started = index;
        }

        self.state.lock().phase = LifecyclePhase::Stopped;
        errors.into_result().map_err(LifecycleError::Stop)
    }

    /// Lists the start and stop procedures of every registered hook.
    #[must_use]
    pub fn describe(&self) -> HookListing {
        self.state.lock().registry.listing()
    }

    /// Prints [`describe()`](Self::describe) to stdout.
    #[expect(clippy::print_stdout, reason = "operator-facing hook listing")]
    pub fn print_hooks(&self) {
        print!("{}", self.describe());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn recording(name: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Hook {
        let on_start = Arc::clone(log);
        let on_stop = Arc::clone(log);
        Hook::callbacks(name)
            .on_start(move |_| {
                on_start.lock().push(format!("start {name}"));
                async { Ok(()) }
            })
            .on_stop(move |_| {
                on_stop.lock().push(format!("stop {name}"));
                async { Ok(()) }
            })
            .into()
    }

    #[tokio::test]
    async fn phases_follow_a_full_cycle() {
        let lifecycle = DefaultLifecycle::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        lifecycle.append(recording("a", &log));
        assert_eq!(lifecycle.phase(), LifecyclePhase::NotStarted);

        let ctx = Context::background();
        lifecycle.start(&ctx).await.unwrap();
        assert_eq!(lifecycle.phase(), LifecyclePhase::Started);

        lifecycle.stop(&ctx).await.unwrap();
        assert_eq!(lifecycle.phase(), LifecyclePhase::Stopped);
        assert_eq!(*log.lock(), vec!["start a", "stop a"]);
    }

    #[tokio::test]
    async fn failed_start_records_index() {
        let lifecycle = DefaultLifecycle::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        lifecycle.append(recording("a", &log));
        lifecycle.append(
            Hook::callbacks("b")
                .on_start(|_| async { Err("nope".into()) })
                .into(),
        );

        let err = lifecycle.start(&Context::background()).await.unwrap_err();
        assert_eq!(err.failed_hook(), Some("b.on_start"));
        assert_eq!(lifecycle.phase(), LifecyclePhase::StartFailed { index: 1 });
        assert_eq!(lifecycle.num_started(), 1);
    }

    #[tokio::test]
    async fn start_resumes_from_high_water_mark() {
        let lifecycle = DefaultLifecycle::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        lifecycle.append(recording("a", &log));

        let ctx = Context::background();
        lifecycle.start(&ctx).await.unwrap();
        lifecycle.append(recording("b", &log));
        lifecycle.start(&ctx).await.unwrap();

        assert_eq!(lifecycle.num_started(), 2);
        assert_eq!(*log.lock(), vec!["start a", "start b"]);
    }

    #[tokio::test]
    async fn hook_context_is_cancelled_after_start_returns() {
        let lifecycle = DefaultLifecycle::new();
        let kept = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&kept);
        lifecycle.append(
            Hook::callbacks("keeper")
                .on_start(move |ctx| {
                    assert!(ctx.err().is_none());
                    *slot.lock() = Some(ctx);
                    async { Ok(()) }
                })
                .into(),
        );

        let ctx = Context::background();
        lifecycle.start(&ctx).await.unwrap();

        let kept = kept.lock().take().unwrap();
        assert!(kept.is_cancelled());
        assert!(ctx.err().is_none());
    }

    #[tokio::test]
    async fn hook_context_is_cancelled_after_stop_returns() {
        let lifecycle = DefaultLifecycle::new();
        let kept = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&kept);
        lifecycle.append(
            Hook::callbacks("keeper")
                .on_stop(move |ctx| {
                    assert!(ctx.err().is_none());
                    *slot.lock() = Some(ctx);
                    async { Ok(()) }
                })
                .into(),
        );

        let ctx = Context::background();
        lifecycle.start(&ctx).await.unwrap();
        lifecycle.stop(&ctx).await.unwrap();

        let kept = kept.lock().take().unwrap();
        assert!(kept.is_cancelled());
        assert!(ctx.err().is_none());
    }

    #[tokio::test]
    async fn stop_before_any_start_keeps_the_phase() {
        let lifecycle = DefaultLifecycle::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        lifecycle.append(recording("a", &log));

        lifecycle.stop(&Context::background()).await.unwrap();
        assert_eq!(lifecycle.phase(), LifecyclePhase::NotStarted);
        assert!(log.lock().is_empty());

        let ctx = Context::background();
        lifecycle.start(&ctx).await.unwrap();
        lifecycle.stop(&ctx).await.unwrap();
        lifecycle.stop(&ctx).await.unwrap();
        assert_eq!(lifecycle.phase(), LifecyclePhase::Stopped);
    }

    #[test]
    fn describe_on_empty_lifecycle() {
        let lifecycle = DefaultLifecycle::new();
        assert!(lifecycle.is_empty());
        assert!(lifecycle.describe().is_empty());
    }
}
