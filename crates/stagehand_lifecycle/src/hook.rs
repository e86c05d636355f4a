//! Hooks: units of optional start and stop behavior.
//!
//! A [`Hook`] comes in two shapes:
//!
//! - [`Hook::Callbacks`] - a named pair of optional async closures, built
//!   with [`Hook::callbacks`].
//! - [`Hook::Component`] - a shared value implementing [`Component`], which
//!   always provides both procedures.
//!
//! Hook names are supplied explicitly and are only used for logging and
//! diagnostics.
//!
//! # Example
//!
//! ```
//! use stagehand_lifecycle::context::HookContext;
//! use stagehand_lifecycle::error::HookResult;
//! use stagehand_lifecycle::hook::{Component, Hook};
//!
//! struct Listener;
//!
//! #[async_trait::async_trait]
//! impl Component for Listener {
//!     fn name(&self) -> &str {
//!         "listener"
//!     }
//!
//!     async fn start(&self, _ctx: HookContext) -> HookResult {
//!         Ok(())
//!     }
//!
//!     async fn stop(&self, _ctx: HookContext) -> HookResult {
//!         Ok(())
//!     }
//! }
//!
//! let component = Hook::component(Listener);
//! assert_eq!(component.start_name().as_deref(), Some("listener.start"));
//!
//! let stop_only = Hook::from(
//!     Hook::callbacks("metrics").on_stop(|_ctx| async { Ok(()) }),
//! );
//! assert_eq!(stop_only.start_name(), None);
//! assert_eq!(stop_only.stop_name().as_deref(), Some("metrics.on_stop"));
//! ```

use core::fmt;
use core::future::Future;
use core::pin::Pin;
use std::sync::Arc;

use crate::context::HookContext;
use crate::error::HookResult;

/// A boxed future that is Send.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Type-erased start or stop procedure.
type HookFn = Arc<dyn Fn(HookContext) -> BoxFuture<'static, HookResult> + Send + Sync>;

// ─────────────────────────────────────────────────────────────────────────────
// Component Trait
// ─────────────────────────────────────────────────────────────────────────────

/// A value that can be started and stopped.
///
/// # Contract
///
/// - `start` is called once per start pass, in registration order. Returning
///   an error aborts the pass; `stop` is then only called for components
///   registered before this one.
/// - `stop` is called in reverse registration order for every component
///   whose `start` succeeded. Returning an error does not abort stopping.
/// - The context is valid only for the duration of the call.
#[async_trait::async_trait]
pub trait Component: Send + Sync + 'static {
    /// Diagnostic name. Defaults to the implementing type's name.
    fn name(&self) -> &str {
        core::any::type_name::<Self>()
    }

    /// Starts the component.
    async fn start(&self, ctx: HookContext) -> HookResult;

    /// Stops the component.
    async fn stop(&self, ctx: HookContext) -> HookResult;
}

// ─────────────────────────────────────────────────────────────────────────────
// CallbackHook
// ─────────────────────────────────────────────────────────────────────────────

/// A named pair of optional start and stop closures.
///
/// Created with [`Hook::callbacks`]. A hook with neither closure is legal
/// and does nothing.
#[derive(Clone)]
pub struct CallbackHook {
    name: String,
    on_start: Option<HookFn>,
    on_stop: Option<HookFn>,
}

impl CallbackHook {
    /// Sets the start procedure.
    #[must_use]
    pub fn on_start<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(HookContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HookResult> + Send + 'static,
    {
        self.on_start = Some(box_hook_fn(f));
        self
    }

    /// Sets the stop procedure.
    #[must_use]
    pub fn on_stop<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(HookContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HookResult> + Send + 'static,
    {
        self.on_stop = Some(box_hook_fn(f));
        self
    }

    /// Returns the hook's label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for CallbackHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackHook")
            .field("name", &self.name)
            .field("on_start", &self.on_start.is_some())
            .field("on_stop", &self.on_stop.is_some())
            .finish()
    }
}

fn box_hook_fn<F, Fut>(f: F) -> HookFn
where
    F: Fn(HookContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HookResult> + Send + 'static,
{
    Arc::new(move |ctx| Box::pin(f(ctx)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Hook
// ─────────────────────────────────────────────────────────────────────────────

/// A registered unit of start and stop behavior.
///
/// Cloning is cheap; procedures are reference counted.
#[derive(Clone)]
pub enum Hook {
    /// Optional start and stop closures with a caller-supplied label.
    Callbacks(CallbackHook),
    /// A shared value providing both procedures.
    Component(Arc<dyn Component>),
}

impl Hook {
    /// Starts building a callback hook labelled `name`.
    #[must_use]
    pub fn callbacks(name: impl Into<String>) -> CallbackHook {
        CallbackHook {
            name: name.into(),
            on_start: None,
            on_stop: None,
        }
    }

    /// Wraps a component.
    #[must_use]
    pub fn component(component: impl Component) -> Self {
        Hook::Component(Arc::new(component))
    }

    /// Wraps an already shared component.
    #[must_use]
    pub fn shared(component: Arc<dyn Component>) -> Self {
        Hook::Component(component)
    }

    /// Returns the hook's label.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Hook::Callbacks(callbacks) => callbacks.name(),
            Hook::Component(component) => component.name(),
        }
    }

    /// Returns true if the hook does something when started.
    #[must_use]
    pub fn has_start(&self) -> bool {
        match self {
            Hook::Callbacks(callbacks) => callbacks.on_start.is_some(),
            Hook::Component(_) => true,
        }
    }

    /// Returns true if the hook does something when stopped.
    #[must_use]
    pub fn has_stop(&self) -> bool {
        match self {
            Hook::Callbacks(callbacks) => callbacks.on_stop.is_some(),
            Hook::Component(_) => true,
        }
    }

    /// Diagnostic name of the start procedure, or `None` if there is none.
    #[must_use]
    pub fn start_name(&self) -> Option<String> {
        match self {
            Hook::Callbacks(callbacks) => callbacks
                .on_start
                .as_ref()
                .map(|_| format!("{}.on_start", callbacks.name)),
            Hook::Component(component) => Some(format!("{}.start", component.name())),
        }
    }

    /// Diagnostic name of the stop procedure, or `None` if there is none.
    #[must_use]
    pub fn stop_name(&self) -> Option<String> {
        match self {
            Hook::Callbacks(callbacks) => callbacks
                .on_stop
                .as_ref()
                .map(|_| format!("{}.on_stop", callbacks.name)),
            Hook::Component(component) => Some(format!("{}.stop", component.name())),
        }
    }

    /// Runs the start procedure. Succeeds immediately if there is none.
    pub async fn start(&self, ctx: HookContext) -> HookResult {
        match self {
            Hook::Callbacks(callbacks) => match &callbacks.on_start {
                Some(f) => f(ctx).await,
                None => Ok(()),
            },
            Hook::Component(component) => component.start(ctx).await,
        }
    }

    /// Runs the stop procedure. Succeeds immediately if there is none.
    pub async fn stop(&self, ctx: HookContext) -> HookResult {
        match self {
            Hook::Callbacks(callbacks) => match &callbacks.on_stop {
                Some(f) => f(ctx).await,
                None => Ok(()),
            },
            Hook::Component(component) => component.stop(ctx).await,
        }
    }
}

impl From<CallbackHook> for Hook {
    fn from(callbacks: CallbackHook) -> Self {
        Hook::Callbacks(callbacks)
    }
}

impl<C: Component> From<Arc<C>> for Hook {
    fn from(component: Arc<C>) -> Self {
        Hook::Component(component)
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hook::Callbacks(callbacks) => callbacks.fmt(f),
            Hook::Component(component) => f
                .debug_tuple("Component")
                .field(&component.name())
                .finish(),
        }
    }
}
