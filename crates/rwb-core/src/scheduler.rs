//! Periodic trigger: runs one scheduler tick at a fixed interval.
//!
//! One logical worker; users are processed sequentially inside a tick. A
//! tick that overruns simply delays the next one; there is no overlap and
//! no catch-up burst.

use std::{sync::Arc, time::Duration};

use tokio::{sync::Mutex, task::JoinHandle, time::MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::checker::RouteChecker;

pub struct TickScheduler {
    checker: Arc<RouteChecker>,
    interval: Duration,
    cancel: CancellationToken,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl TickScheduler {
    pub fn new(checker: Arc<RouteChecker>, interval: Duration) -> Self {
        Self {
            checker,
            interval,
            cancel: CancellationToken::new(),
            handle: Mutex::new(None),
        }
    }

    /// Spawn the tick loop. The first tick fires one full interval after
    /// start, not immediately.
    pub async fn start(&self) {
        let mut handle = self.handle.lock().await;
        if handle.is_some() {
            return;
        }

        let checker = self.checker.clone();
        let cancel = self.cancel.clone();
        let interval = self.interval;

        *handle = Some(tokio::spawn(async move {
            let mut tick = tokio::time::interval(interval);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tick.tick().await; // consume the immediate first fire

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tick.tick() => {
                        checker.scheduler_tick().await;
                    }
                }
            }
        }));

        info!(interval_secs = self.interval.as_secs(), "tick scheduler started");
    }

    pub async fn stop(&self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.lock().await.take() {
            handle.abort(); // best-effort
        }
        info!("tick scheduler stopped");
    }
}
