//! Execution contexts for lifecycle passes.
//!
//! A [`Context`] bounds a whole start or stop pass. It carries a
//! [`CancellationToken`] and an optional deadline; children inherit both and
//! can only tighten the deadline.
//!
//! The [`ContextGuard`] derives a child context for exactly one pass and
//! cancels it when dropped, so hooks cannot keep using it after the pass
//! returns. Hooks see the guarded child through [`HookContext`], which can
//! observe cancellation but not trigger it.
//!
//! Cancellation is cooperative: a hook that never checks its context is not
//! interrupted.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use stagehand_lifecycle::context::{Context, ContextError, ContextGuard};
//!
//! let parent = Context::background().with_timeout(Duration::from_secs(30));
//! let hook_ctx = {
//!     let guard = ContextGuard::new(&parent);
//!     guard.hook_context()
//! };
//!
//! // The guard was dropped, the hook's view is cancelled.
//! assert_eq!(hook_ctx.err(), Some(ContextError::Cancelled));
//! assert!(parent.err().is_none());
//! ```

use core::future::Future;
use core::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

// ─────────────────────────────────────────────────────────────────────────────
// ContextError
// ─────────────────────────────────────────────────────────────────────────────

/// Reason a context is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    /// The context, or one of its ancestors, was cancelled.
    #[error("context cancelled")]
    Cancelled,

    /// The context's deadline has passed.
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

// ─────────────────────────────────────────────────────────────────────────────
// Context
// ─────────────────────────────────────────────────────────────────────────────

/// A cancellable context with an optional deadline.
///
/// Cloning a `Context` yields a handle to the same context: cancelling any
/// clone cancels all of them. Use [`child()`](Self::child) to derive a
/// context that can be cancelled independently of its parent.
#[derive(Debug, Clone)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

impl Context {
    /// Creates a root context that is never cancelled and has no deadline.
    #[must_use]
    pub fn background() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Creates a root context driven by an existing cancellation token.
    ///
    /// Useful for tying a lifecycle pass to a token owned by the rest of
    /// the application.
    #[must_use]
    pub fn from_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Derives a child context with the same deadline.
    ///
    /// The child is cancelled when `self` is; cancelling the child does not
    /// affect `self`.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Derives a child context that expires after `timeout`.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Derives a child context that expires at `deadline`.
    ///
    /// If `self` already has an earlier deadline, the earlier one is kept.
    #[must_use]
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(existing) if existing <= deadline => existing,
            _ => deadline,
        };
        Self {
            token: self.token.child_token(),
            deadline: Some(deadline),
        }
    }

    /// Cancels this context and all of its children.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns true if this context has been cancelled.
    ///
    /// Deadline expiry is not cancellation; see [`err()`](Self::err).
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the time left until the deadline, if any.
    ///
    /// Returns `Some(Duration::ZERO)` once the deadline has passed.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Returns why the context is done, or `None` if it is still live.
    ///
    /// Cancellation takes precedence over an expired deadline.
    #[must_use]
    pub fn err(&self) -> Option<ContextError> {
        if self.token.is_cancelled() {
            return Some(ContextError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(ContextError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Waits until the context is cancelled or its deadline passes.
    pub async fn done(&self) -> ContextError {
        if let Some(err) = self.err() {
            return err;
        }
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    () = self.token.cancelled() => ContextError::Cancelled,
                    () = tokio::time::sleep_until(deadline) => ContextError::DeadlineExceeded,
                }
            }
            None => {
                self.token.cancelled().await;
                ContextError::Cancelled
            }
        }
    }

    /// Runs `fut` until it completes or the context is done.
    ///
    /// The future is dropped if the context finishes first.
    pub async fn run_until_done<F: Future>(&self, fut: F) -> Result<F::Output, ContextError> {
        if let Some(err) = self.err() {
            return Err(err);
        }
        tokio::select! {
            biased;
            err = self.done() => Err(err),
            out = fut => Ok(out),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ContextGuard
// ─────────────────────────────────────────────────────────────────────────────

/// Scopes a child context to a single lifecycle pass.
///
/// The child is derived on construction and cancelled unconditionally on
/// drop, whether the pass succeeded, failed or panicked.
#[derive(Debug)]
pub struct ContextGuard {
    ctx: Context,
}

impl ContextGuard {
    /// Derives a guarded child of `parent`.
    #[must_use]
    pub fn new(parent: &Context) -> Self {
        Self {
            ctx: parent.child(),
        }
    }

    /// Returns the guarded child context.
    #[must_use]
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Returns a hook-facing view of the guarded child context.
    #[must_use]
    pub fn hook_context(&self) -> HookContext {
        HookContext {
            inner: self.ctx.clone(),
        }
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        self.ctx.cancel();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HookContext
// ─────────────────────────────────────────────────────────────────────────────

/// The context handed to a hook's start or stop procedure.
///
/// Valid only for the duration of the pass that invoked the hook. Hooks that
/// block (connecting to external services, draining queues) should abort
/// when [`done()`](Self::done) resolves.
#[derive(Debug, Clone)]
pub struct HookContext {
    inner: Context,
}

impl HookContext {
    /// Returns true if the pass was cancelled or has already returned.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }

    /// Returns the pass deadline, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline()
    }

    /// Returns the time left until the pass deadline, if any.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.inner.remaining()
    }

    /// Returns why the context is done, or `None` if it is still live.
    #[must_use]
    pub fn err(&self) -> Option<ContextError> {
        self.inner.err()
    }

    /// Waits until the pass is cancelled or its deadline passes.
    pub async fn done(&self) -> ContextError {
        self.inner.done().await
    }

    /// Runs `fut` until it completes or the context is done.
    pub async fn run_until_done<F: Future>(&self, fut: F) -> Result<F::Output, ContextError> {
        self.inner.run_until_done(fut).await
    }

    /// Derives a child context for work spawned by the hook.
    ///
    /// The child is cancelled when the pass returns.
    #[must_use]
    pub fn child(&self) -> Context {
        self.inner.child()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_is_live() {
        let ctx = Context::background();
        assert!(ctx.err().is_none());
        assert!(ctx.deadline().is_none());
        assert!(ctx.remaining().is_none());
    }

    #[test]
    fn cancel_propagates_to_children_only() {
        let parent = Context::background();
        let child = parent.child();
        let grandchild = child.child();

        child.cancel();
        assert_eq!(child.err(), Some(ContextError::Cancelled));
        assert_eq!(grandchild.err(), Some(ContextError::Cancelled));
        assert!(parent.err().is_none());
    }

    #[test]
    fn with_deadline_keeps_earlier_parent_deadline() {
        let now = Instant::now();
        let parent = Context::background().with_deadline(now + Duration::from_secs(5));
        let child = parent.with_deadline(now + Duration::from_secs(60));
        assert_eq!(child.deadline(), Some(now + Duration::from_secs(5)));

        let tighter = parent.with_deadline(now + Duration::from_secs(1));
        assert_eq!(tighter.deadline(), Some(now + Duration::from_secs(1)));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_expires_with_time() {
        let ctx = Context::background().with_timeout(Duration::from_secs(10));
        assert!(ctx.err().is_none());

        tokio::time::advance(Duration::from_secs(11)).await;
        assert_eq!(ctx.err(), Some(ContextError::DeadlineExceeded));
        assert_eq!(ctx.remaining(), Some(Duration::ZERO));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_wins_over_deadline() {
        let ctx = Context::background().with_timeout(Duration::from_millis(1));
        tokio::time::advance(Duration::from_millis(5)).await;
        ctx.cancel();
        assert_eq!(ctx.err(), Some(ContextError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn done_resolves_on_deadline() {
        let ctx = Context::background().with_timeout(Duration::from_secs(3));
        assert_eq!(ctx.done().await, ContextError::DeadlineExceeded);
    }

    #[tokio::test]
    async fn done_resolves_on_cancel() {
        let ctx = Context::background();
        let waiter = ctx.clone();
        let handle = tokio::spawn(async move { waiter.done().await });

        ctx.cancel();
        assert_eq!(handle.await.unwrap(), ContextError::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn run_until_done_returns_output_when_fast() {
        let ctx = Context::background().with_timeout(Duration::from_secs(1));
        let out = ctx.run_until_done(async { 7 }).await;
        assert_eq!(out, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn run_until_done_abandons_slow_future() {
        let ctx = Context::background().with_timeout(Duration::from_secs(1));
        let out = ctx
            .run_until_done(tokio::time::sleep(Duration::from_secs(60)))
            .await;
        assert_eq!(out, Err(ContextError::DeadlineExceeded));
    }

    #[test]
    fn from_token_follows_the_external_token() {
        let token = CancellationToken::new();
        let ctx = Context::from_token(token.clone());
        let child = ctx.child();

        token.cancel();
        assert!(ctx.is_cancelled());
        assert_eq!(child.err(), Some(ContextError::Cancelled));
    }

    #[test]
    fn guard_cancels_child_on_drop() {
        let parent = Context::background();
        let guard = ContextGuard::new(&parent);
        let hook_ctx = guard.hook_context();
        let spawned = hook_ctx.child();

        assert!(hook_ctx.err().is_none());
        drop(guard);

        assert!(hook_ctx.is_cancelled());
        assert_eq!(spawned.err(), Some(ContextError::Cancelled));
        assert!(parent.err().is_none());
    }

    #[test]
    fn guard_child_follows_parent_cancellation() {
        let parent = Context::background();
        let guard = ContextGuard::new(&parent);

        parent.cancel();
        assert_eq!(guard.context().err(), Some(ContextError::Cancelled));
    }
}
