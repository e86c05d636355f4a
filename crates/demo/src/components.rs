//! Sample components.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use stagehand_lifecycle::context::HookContext;
use stagehand_lifecycle::error::{HookError, HookResult};
use stagehand_lifecycle::hook::Component;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Pretend connection pool that takes a moment to connect.
#[derive(Debug)]
pub struct Database {
    url: String,
    connect_delay: Duration,
    connected: AtomicBool,
}

impl Database {
    /// Creates a disconnected pool for `url`.
    #[must_use]
    pub fn new(url: impl Into<String>, connect_delay: Duration) -> Self {
        Self {
            url: url.into(),
            connect_delay,
            connected: AtomicBool::new(false),
        }
    }

    /// Returns true between a successful start and the matching stop.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Component for Database {
    fn name(&self) -> &str {
        "database"
    }

    async fn start(&self, ctx: HookContext) -> HookResult {
        // Honors the start budget: a slow connect fails the start pass.
        ctx.run_until_done(tokio::time::sleep(self.connect_delay))
            .await
            .map_err(HookError::from)?;
        self.connected.store(true, Ordering::SeqCst);
        info!(url = %self.url, "Connected");
        Ok(())
    }

    async fn stop(&self, _ctx: HookContext) -> HookResult {
        self.connected.store(false, Ordering::SeqCst);
        info!(url = %self.url, "Disconnected");
        Ok(())
    }
}

/// Background task that counts ticks until stopped.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    ticks: Arc<AtomicU64>,
    running: Mutex<Option<(CancellationToken, JoinHandle<()>)>>,
}

impl Ticker {
    /// Creates a stopped ticker.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            ticks: Arc::new(AtomicU64::new(0)),
            running: Mutex::new(None),
        }
    }

    /// Returns the number of ticks so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    /// Returns true while the background task is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.lock().is_some()
    }
}

#[async_trait]
impl Component for Ticker {
    fn name(&self) -> &str {
        "ticker"
    }

    async fn start(&self, _ctx: HookContext) -> HookResult {
        let token = CancellationToken::new();
        let stopped = token.clone();
        let ticks = Arc::clone(&self.ticks);
        let mut interval = tokio::time::interval(self.period);

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = stopped.cancelled() => break,
                    _ = interval.tick() => {
                        let n = ticks.fetch_add(1, Ordering::SeqCst) + 1;
                        tracing::debug!(tick = n, "Tick");
                    }
                }
            }
        });

        *self.running.lock() = Some((token, handle));
        Ok(())
    }

    async fn stop(&self, _ctx: HookContext) -> HookResult {
        let Some((token, handle)) = self.running.lock().take() else {
            return Ok(());
        };
        token.cancel();
        handle.await?;
        info!(ticks = self.ticks(), "Ticker stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagehand_lifecycle::prelude::*;

    #[tokio::test(start_paused = true)]
    async fn database_connects_and_disconnects() {
        let db = Arc::new(Database::new("postgres://local", Duration::from_millis(100)));
        let lifecycle = DefaultLifecycle::new();
        lifecycle.append(Hook::shared(db.clone()));

        let ctx = Context::background();
        lifecycle.start(&ctx).await.unwrap();
        assert!(db.is_connected());

        lifecycle.stop(&ctx).await.unwrap();
        assert!(!db.is_connected());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_database_fails_the_start_budget() {
        let db = Arc::new(Database::new("postgres://slow", Duration::from_secs(30)));
        let lifecycle = DefaultLifecycle::new();
        lifecycle.append(Hook::shared(db.clone()));

        let ctx = Context::background().with_timeout(Duration::from_secs(1));
        let err = lifecycle.start(&ctx).await.unwrap_err();
        assert_eq!(err.failed_hook(), Some("database.start"));
        assert!(!db.is_connected());
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_runs_until_stopped() {
        let ticker = Arc::new(Ticker::new(Duration::from_secs(1)));
        let lifecycle = DefaultLifecycle::new();
        lifecycle.append(Hook::shared(ticker.clone()));

        let ctx = Context::background();
        lifecycle.start(&ctx).await.unwrap();
        assert!(ticker.is_running());

        tokio::time::sleep(Duration::from_millis(3500)).await;
        lifecycle.stop(&ctx).await.unwrap();

        assert!(!ticker.is_running());
        let ticks = ticker.ticks();
        assert!(ticks >= 3, "expected at least 3 ticks, got {ticks}");

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(ticker.ticks(), ticks);
    }
}
