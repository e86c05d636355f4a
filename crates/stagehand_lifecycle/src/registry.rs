//! Ordered hook storage.
//!
//! [`HookRegistry`] is a plain append-only sequence. It does no locking of
//! its own; [`DefaultLifecycle`](crate::lifecycle::DefaultLifecycle) owns one
//! behind the same mutex as its start counter and hands out snapshots.

use crate::diagnostics::HookListing;
use crate::hook::Hook;

/// Append-only, order-preserving collection of hooks.
///
/// Insertion order is start order. There is no removal or reordering.
#[derive(Debug, Clone, Default)]
pub struct HookRegistry {
    hooks: Vec<Hook>,
}

impl HookRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Appends a hook to the end of the sequence.
    pub fn push(&mut self, hook: Hook) {
        self.hooks.push(hook);
    }

    /// Returns the number of registered hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Returns true if no hook is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Returns the hook at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Hook> {
        self.hooks.get(index)
    }

    /// Returns a point-in-time copy of the sequence.
    ///
    /// Hooks appended afterwards are not visible in the copy.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Hook> {
        self.hooks.clone()
    }

    /// Returns the hook names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.hooks.iter().map(Hook::name).collect()
    }

    /// Lists the start and stop procedures a full pass would run.
    #[must_use]
    pub fn listing(&self) -> HookListing {
        HookListing::from_hooks(&self.hooks)
    }
}
