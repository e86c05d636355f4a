//! Error types for lifecycle passes.

use core::fmt;

use crate::context::ContextError;

/// Error returned by a hook's start or stop procedure.
///
/// Any `Error + Send + Sync` converts into it, so hooks can use `?` freely.
pub type HookError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// Result of a hook's start or stop procedure.
pub type HookResult = Result<(), HookError>;

// ─────────────────────────────────────────────────────────────────────────────
// LifecycleError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors returned by [`DefaultLifecycle::start`](crate::lifecycle::DefaultLifecycle::start)
/// and [`DefaultLifecycle::stop`](crate::lifecycle::DefaultLifecycle::stop).
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// A start hook failed. No further hooks were started.
    ///
    /// `source` is the hook's error, unchanged.
    #[error("start hook {hook} failed: {source}")]
    Start {
        /// Diagnostic name of the failing hook.
        hook: String,
        /// The error returned by the hook.
        #[source]
        source: HookError,
    },

    /// One or more stop hooks failed. All hooks in the rollback window were
    /// still attempted.
    #[error(transparent)]
    Stop(#[from] StopErrors),

    /// The stop context was cancelled or expired before every started hook
    /// was stopped. Failures recorded earlier in the same pass are discarded.
    #[error(transparent)]
    Context(#[from] ContextError),
}

impl LifecycleError {
    /// Returns the name of the start hook that failed, if this is a start error.
    #[must_use]
    pub fn failed_hook(&self) -> Option<&str> {
        match self {
            LifecycleError::Start { hook, .. } => Some(hook),
            _ => None,
        }
    }

    /// Returns the hook's own error for a start failure.
    #[must_use]
    pub fn hook_error(&self) -> Option<&(dyn core::error::Error + Send + Sync + 'static)> {
        match self {
            LifecycleError::Start { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }

    /// Unwraps the hook's own error for a start failure.
    ///
    /// Returns `self` unchanged for any other variant.
    pub fn into_hook_error(self) -> Result<HookError, Self> {
        match self {
            LifecycleError::Start { source, .. } => Ok(source),
            other => Err(other),
        }
    }

    /// Returns the collected stop failures, if this is a stop error.
    #[must_use]
    pub fn stop_errors(&self) -> Option<&StopErrors> {
        match self {
            LifecycleError::Stop(errors) => Some(errors),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HookFailure / StopErrors
// ─────────────────────────────────────────────────────────────────────────────

/// A single failed stop hook.
#[derive(Debug, thiserror::Error)]
#[error("stop hook {hook} failed: {error}")]
pub struct HookFailure {
    /// Diagnostic name of the failing hook.
    pub hook: String,
    /// The error returned by the hook.
    #[source]
    pub error: HookError,
}

/// Every stop failure from one stop pass, in the order they occurred.
#[derive(Debug, Default)]
pub struct StopErrors {
    failures: Vec<HookFailure>,
}

impl StopErrors {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            failures: Vec::new(),
        }
    }

    /// Records a failure.
    pub fn push(&mut self, hook: impl Into<String>, error: HookError) {
        self.failures.push(HookFailure {
            hook: hook.into(),
            error,
        });
    }

    /// Returns true if no failure was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns the number of recorded failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Iterates over the failures in the order they occurred.
    pub fn iter(&self) -> core::slice::Iter<'_, HookFailure> {
        self.failures.iter()
    }

    /// Returns the names of the failing hooks, in order.
    #[must_use]
    pub fn hooks(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.hook.as_str()).collect()
    }

    /// Returns `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for StopErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.failures.as_slice() {
            [] => write!(f, "no stop hook failed"),
            [single] => write!(f, "{single}"),
            failures => {
                write!(f, "{} stop hooks failed: ", failures.len())?;
                for (i, failure) in failures.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{failure}")?;
                }
                Ok(())
            }
        }
    }
}

impl core::error::Error for StopErrors {}

impl IntoIterator for StopErrors {
    type Item = HookFailure;
    type IntoIter = std::vec::IntoIter<HookFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.into_iter()
    }
}

impl<'a> IntoIterator for &'a StopErrors {
    type Item = &'a HookFailure;
    type IntoIter = core::slice::Iter<'a, HookFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.iter()
    }
}
