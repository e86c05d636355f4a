//! Read-only introspection of registered hooks.
//!
//! [`HookListing`] mirrors what a full start pass and a full stop pass would
//! run, in order, without running anything. Its `Display` output is meant
//! for operators:
//!
//! ```text
//! Start hooks:
//!
//!   • database.on_start
//!   • listener.start
//!
//! Stop hooks:
//!
//!   • listener.stop
//!   • database.on_stop
//! ```

use core::fmt;

use crate::hook::Hook;

/// Ordered start and stop procedure names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookListing {
    /// Start procedures in registration order.
    pub start: Vec<String>,
    /// Stop procedures in reverse registration order.
    pub stop: Vec<String>,
}

impl HookListing {
    /// Builds the listing for a sequence of hooks in registration order.
    ///
    /// Hooks without the relevant procedure are omitted from that list.
    #[must_use]
    pub fn from_hooks(hooks: &[Hook]) -> Self {
        Self {
            start: hooks.iter().filter_map(Hook::start_name).collect(),
            stop: hooks.iter().rev().filter_map(Hook::stop_name).collect(),
        }
    }

    /// Returns true if neither list has an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start.is_empty() && self.stop.is_empty()
    }
}

impl fmt::Display for HookListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Start hooks:")?;
        writeln!(f)?;
        for name in &self.start {
            writeln!(f, "  • {name}")?;
        }
        writeln!(f)?;
        writeln!(f, "Stop hooks:")?;
        writeln!(f)?;
        for name in &self.stop {
            writeln!(f, "  • {name}")?;
        }
        Ok(())
    }
}
