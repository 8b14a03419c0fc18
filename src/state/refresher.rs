use crate::state::messages::NetworkRequest;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;

/// Periodic match refresh. Waits `interval` between cycles, or the shorter
/// `live_interval` while the last result had a match in progress.
pub struct PeriodicRefresher {
    network_requests: mpsc::Sender<NetworkRequest>,
    interval: Duration,
    live_interval: Duration,
    live: watch::Receiver<bool>,
}

impl PeriodicRefresher {
    pub fn new(
        network_requests: mpsc::Sender<NetworkRequest>,
        interval: Duration,
        live_interval: Duration,
        live: watch::Receiver<bool>,
    ) -> Self {
        Self { network_requests, interval, live_interval, live }
    }

    pub fn current_interval(&self) -> Duration {
        if *self.live.borrow() { self.live_interval } else { self.interval }
    }

    pub async fn run(mut self) {
        // The startup load is triggered separately, so the first cycle waits a full interval.
        loop {
            tokio::select! {
                _ = sleep(self.current_interval()) => {
                    if self.network_requests.send(NetworkRequest::Refresh).await.is_err() {
                        break;
                    }
                }
                changed = self.live.changed() => {
                    // Restart the wait with the new interval.
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn refreshes_on_the_normal_interval() {
        let (tx, mut rx) = mpsc::channel(4);
        let (_live_tx, live_rx) = watch::channel(false);
        let refresher =
            PeriodicRefresher::new(tx, Duration::from_secs(300), Duration::from_secs(60), live_rx);
        let task = tokio::spawn(refresher.run());

        tokio::time::sleep(Duration::from_secs(299)).await;
        assert!(rx.try_recv().is_err());
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(matches!(rx.try_recv(), Ok(NetworkRequest::Refresh)));
        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn live_matches_shorten_the_interval() {
        let (tx, mut rx) = mpsc::channel(4);
        let (live_tx, live_rx) = watch::channel(false);
        let refresher =
            PeriodicRefresher::new(tx, Duration::from_secs(300), Duration::from_secs(60), live_rx);
        let task = tokio::spawn(refresher.run());

        tokio::time::sleep(Duration::from_secs(1)).await;
        live_tx.send(true).unwrap();
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert!(matches!(rx.try_recv(), Ok(NetworkRequest::Refresh)));
        task.abort();
    }
}
