use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

use configs::KeepaliveConfig;

use crate::observability;

/// Spawn the periodic liveness probe, if a URL is configured. The loop
/// shares no state with the counter store; failures are logged and counted,
/// never surfaced to any client.
pub fn spawn(cfg: KeepaliveConfig) -> Option<JoinHandle<()>> {
    let url = cfg.url?;
    let period = Duration::from_secs(cfg.interval_secs.max(1));
    Some(tokio::spawn(async move {
        let client = reqwest::Client::new();
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match common::probe::ping(&client, &url).await {
                Ok(status) => debug!(%url, status, "keepalive ping ok"),
                Err(e) => {
                    observability::KEEPALIVE_FAILURES_TOTAL.inc();
                    warn!(%url, error = %e, "keepalive ping failed");
                }
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn no_task_without_url() {
        let cfg = KeepaliveConfig { url: None, interval_secs: 300 };
        assert!(spawn(cfg).is_none());
    }
}
