//! Shared test utilities for `stagehand_lifecycle` integration tests.
//!
//! Import via `mod common;` in test files.

#![allow(
    dead_code,
    missing_docs,
    reason = "shared test utilities, not all items used in every test binary"
)]

use std::sync::Arc;

use parking_lot::Mutex;
use stagehand_lifecycle::error::HookResult;
use stagehand_lifecycle::hook::Hook;

/// Ordered record of every hook procedure invoked.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: impl Into<String>) {
        self.events.lock().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Events whose text starts with `prefix` ("start " or "stop ").
    pub fn with_prefix(&self, prefix: &str) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.starts_with(prefix))
            .cloned()
            .collect()
    }
}

/// How a scripted hook behaves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Outcome {
    #[default]
    Succeed,
    Fail,
    Absent,
}

/// Builds a callback hook named `name` that records its invocations.
///
/// A failing procedure still records its invocation and returns
/// `"<name> <start|stop> failed"`.
pub fn scripted(name: &str, recorder: &Recorder, start: Outcome, stop: Outcome) -> Hook {
    let mut hook = Hook::callbacks(name);

    if start != Outcome::Absent {
        let recorder = recorder.clone();
        let name = name.to_string();
        hook = hook.on_start(move |_ctx| {
            recorder.record(format!("start {name}"));
            let result: HookResult = match start {
                Outcome::Fail => Err(format!("{name} start failed").into()),
                _ => Ok(()),
            };
            async move { result }
        });
    }

    if stop != Outcome::Absent {
        let recorder = recorder.clone();
        let name = name.to_string();
        hook = hook.on_stop(move |_ctx| {
            recorder.record(format!("stop {name}"));
            let result: HookResult = match stop {
                Outcome::Fail => Err(format!("{name} stop failed").into()),
                _ => Ok(()),
            };
            async move { result }
        });
    }

    hook.into()
}

/// A hook whose start and stop both succeed.
pub fn ok_hook(name: &str, recorder: &Recorder) -> Hook {
    scripted(name, recorder, Outcome::Succeed, Outcome::Succeed)
}

/// Strings `"start x"` / `"stop x"` for each name, for readable assertions.
pub fn starts(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| format!("start {n}")).collect()
}

pub fn stops(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| format!("stop {n}")).collect()
}
