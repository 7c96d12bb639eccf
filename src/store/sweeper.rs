use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::store::session::SessionStore;

/// Handle to the background task that sweeps expired checkout sessions.
pub struct SweepTask {
    handle: JoinHandle<()>,
    shutdown: CancellationToken,
}

impl SweepTask {
    /// Spawns a task sweeping `store` every `period`, first after one period.
    pub fn spawn(store: SessionStore, period: Duration) -> Self {
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let removed = store.sweep().await;
                        if removed > 0 {
                            tracing::info!("🧹 Swept {} expired checkout sessions", removed);
                        } else {
                            tracing::debug!("🧹 No expired checkout sessions to sweep");
                        }
                    }
                }
            }

            tracing::info!("✅ Session sweeper stopped");
        });

        Self { handle, shutdown }
    }

    /// Stops the task and waits for it to finish.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        if let Err(e) = self.handle.await {
            tracing::error!("❌ Session sweeper task failed: {}", e);
        }
    }
}
