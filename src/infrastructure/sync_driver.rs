use std::{sync::Arc, time::Duration};

use log::{debug, info};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Instant, Interval, MissedTickBehavior, interval_at},
};

use crate::RepositoryCache;

/// Capacity of the sync event channel.
const SYNC_EVENTS_CAPACITY: usize = 16;

/// An event that may trigger a revalidation of the cached listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEvent {
    /// The network connection came back.
    Reconnect,

    /// A consumer regained focus. Never triggers a revalidation.
    Focus,
}

/// Revalidates the repository cache periodically and on reconnect events.
pub struct SyncDriver {
    cache: Arc<RepositoryCache>,
    refresh_interval: Duration,
    events: mpsc::Receiver<SyncEvent>,
}

impl SyncDriver {
    /// Creates a new `SyncDriver` and the sender used to feed it events.
    pub fn new(
        cache: Arc<RepositoryCache>,
        refresh_interval: Duration,
    ) -> (Self, mpsc::Sender<SyncEvent>) {
        let (sender, events) = mpsc::channel(SYNC_EVENTS_CAPACITY);

        (
            Self {
                cache,
                refresh_interval,
                events,
            },
            sender,
        )
    }

    /// Spawns the driver loop.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Runs until every event sender is dropped. A zero refresh interval disables the periodic revalidation.
    pub async fn run(mut self) {
        let mut ticker = if self.refresh_interval.is_zero() {
            info!("Sync driver started, periodic revalidation disabled");
            None
        } else {
            info!(
                "Sync driver started, revalidating every {:?}",
                self.refresh_interval
            );
            let mut ticker = interval_at(
                Instant::now() + self.refresh_interval,
                self.refresh_interval,
            );
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            Some(ticker)
        };

        loop {
            tokio::select! {
                _ = next_tick(&mut ticker) => {
                    debug!("Refresh interval elapsed");
                    self.cache.revalidate_all(true).await;
                }
                event = self.events.recv() => match event {
                    Some(SyncEvent::Reconnect) => {
                        info!("Reconnected, revalidating cached repositories");
                        self.cache.revalidate_all(false).await;
                    }
                    Some(SyncEvent::Focus) => debug!("Ignoring focus event"),
                    None => {
                        info!("Sync event channel closed, stopping sync driver");
                        break;
                    }
                },
            }
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}
