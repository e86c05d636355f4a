//! Example process built with stagehand.
//!
//! Wires a handful of sample collaborators into one lifecycle:
//!
//! ```text
//! start:  config → database → cache → ticker → [exit-timer]
//! stop:   [exit-timer] → ticker → cache → database → config
//! ```
//!
//! `config` and `cache` are plain callback hooks; `database` and `ticker`
//! implement [`Component`](stagehand_lifecycle::hook::Component).

pub mod components;

use std::future::{Ready, ready};
use std::sync::Arc;
use std::time::Duration;

use stagehand_lifecycle::context::HookContext;
use stagehand_lifecycle::error::HookResult;
use stagehand_lifecycle::hook::Hook;
use stagehand_lifecycle::lifecycle::Lifecycle;
use stagehand_runtime::Shutdowner;
use tracing::info;

pub use components::{Database, Ticker};

/// Knobs for the sample process.
#[derive(Debug, Clone, Default)]
pub struct DemoOptions {
    /// Callback hook (`config` or `cache`) whose start procedure should fail.
    pub fail_start: Option<String>,
    /// Request a clean shutdown this long after start.
    pub exit_after: Option<Duration>,
    /// How long the database takes to connect.
    pub connect_delay: Duration,
}

/// Registers every sample hook with `lifecycle`.
pub fn register(lifecycle: &dyn Lifecycle, shutdowner: &Shutdowner, options: &DemoOptions) {
    let fail = |hook: &str| options.fail_start.as_deref() == Some(hook);

    lifecycle.append(
        Hook::callbacks("config")
            .on_start(failing_or(fail("config"), || {
                info!("Configuration loaded");
            }))
            .on_stop(|_| async {
                info!("Configuration released");
                Ok(())
            })
            .into(),
    );

    lifecycle.append(Hook::shared(Arc::new(Database::new(
        "postgres://localhost/demo",
        options.connect_delay,
    ))));

    lifecycle.append(
        Hook::callbacks("cache")
            .on_start(failing_or(fail("cache"), || info!("Cache warmed")))
            .on_stop(|_| async {
                info!("Cache flushed");
                Ok(())
            })
            .into(),
    );

    lifecycle.append(Hook::component(Ticker::new(Duration::from_secs(1))));

    if let Some(delay) = options.exit_after {
        let shutdowner = shutdowner.clone();
        lifecycle.append(
            Hook::callbacks("exit-timer")
                .on_start(move |_| {
                    let shutdowner = shutdowner.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        shutdowner.shutdown();
                    });
                    async { Ok(()) }
                })
                .into(),
        );
    }
}

/// Start procedure that runs `action`, or fails if `fail` is set.
fn failing_or(
    fail: bool,
    action: impl Fn() + Send + Sync + 'static,
) -> impl Fn(HookContext) -> Ready<HookResult> + Send + Sync + 'static {
    move |_| {
        if fail {
            return ready(Err("injected start failure".into()));
        }
        action();
        ready(Ok(()))
    }
}
