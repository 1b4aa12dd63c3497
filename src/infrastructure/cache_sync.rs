use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use futures::{
    FutureExt,
    future::{BoxFuture, Shared, join_all},
};
use log::{debug, info, warn};
use tokio::{
    sync::{Mutex, watch},
    time::Instant,
};

use crate::{AccountName, Repository, RepositoryFetcher, SyncSnapshot};

type FetchOutcome = Result<Arc<Vec<Repository>>, Arc<String>>;

/// A fetch that every concurrent requester of a key awaits.
type SharedFetch = Shared<BoxFuture<'static, FetchOutcome>>;

/// The cached state of one account.
#[derive(Default)]
struct EntryState {
    /// Last-known-good repositories.
    repositories: Arc<Vec<Repository>>,
    last_fetch_started: Option<Instant>,
    last_updated: Option<DateTime<Utc>>,
    last_error: Option<String>,
    in_flight: Option<SharedFetch>,
}

impl EntryState {
    fn snapshot(&self) -> SyncSnapshot {
        SyncSnapshot {
            repositories: Arc::clone(&self.repositories),
            is_loading: self.in_flight.is_some(),
            error: self.last_error.clone(),
            last_updated: self.last_updated,
        }
    }

    fn is_fresh(&self, dedup_interval: Duration) -> bool {
        self.last_fetch_started
            .is_some_and(|started| started.elapsed() < dedup_interval)
    }
}

struct CacheEntry {
    account: AccountName,
    state: Mutex<EntryState>,
    snapshots: watch::Sender<SyncSnapshot>,
}

impl CacheEntry {
    fn new(account: AccountName) -> Self {
        let (snapshots, _) = watch::channel(SyncSnapshot::default());

        Self {
            account,
            state: Mutex::new(EntryState::default()),
            snapshots,
        }
    }

    async fn complete(&self, outcome: &FetchOutcome) {
        let mut state = self.state.lock().await;
        state.in_flight = None;
        match outcome {
            Ok(repositories) => {
                if repositories.is_empty() && !state.repositories.is_empty() {
                    warn!(
                        "Empty listing for {} replaces {} cached repositories",
                        self.account,
                        state.repositories.len()
                    );
                }
                info!(
                    "Cached {} repositories for {}",
                    repositories.len(),
                    self.account
                );
                state.repositories = Arc::clone(repositories);
                state.last_updated = Some(Utc::now());
                state.last_error = None;
            }
            Err(error) => {
                warn!(
                    "Keeping {} cached repositories for {} after failed fetch: {error}",
                    state.repositories.len(),
                    self.account
                );
                state.last_error = Some(error.to_string());
            }
        }
        self.snapshots.send_replace(state.snapshot());
    }
}

/// A cache of repository listings keyed by account, with request coalescing and a deduplication window.
pub struct RepositoryCache {
    fetcher: Arc<dyn RepositoryFetcher>,
    dedup_interval: Duration,
    entries: Mutex<HashMap<String, Arc<CacheEntry>>>,
}

impl RepositoryCache {
    /// Creates a new `RepositoryCache` instance over the given fetcher.
    pub fn new(fetcher: Arc<dyn RepositoryFetcher>, dedup_interval: Duration) -> Self {
        Self {
            fetcher,
            dedup_interval,
            entries: Mutex::new(HashMap::new()),
        }
    }

    async fn entry(&self, account: &AccountName) -> Arc<CacheEntry> {
        let mut entries = self.entries.lock().await;
        Arc::clone(entries.entry(account.cache_key()).or_insert_with(|| {
            debug!("Creating cache entry for {account}");
            Arc::new(CacheEntry::new(account.clone()))
        }))
    }

    /// Starts a fetch for the entry unless one is in flight or, when not forced, the last one is still fresh.
    async fn trigger(&self, entry: &Arc<CacheEntry>, force: bool) -> Option<SharedFetch> {
        let mut state = entry.state.lock().await;
        if let Some(in_flight) = &state.in_flight {
            debug!("Joining in-flight fetch for {}", entry.account);
            return Some(in_flight.clone());
        }
        if !force && state.is_fresh(self.dedup_interval) {
            debug!("Reusing last fetch for {} within dedup window", entry.account);
            return None;
        }

        let fetcher = Arc::clone(&self.fetcher);
        let fetch_entry = Arc::clone(entry);
        let fetch = async move {
            let outcome = fetcher
                .fetch(&fetch_entry.account)
                .await
                .map(Arc::new)
                .map_err(|e| Arc::new(format!("{e:#}")));
            fetch_entry.complete(&outcome).await;

            outcome
        }
        .boxed()
        .shared();
        state.in_flight = Some(fetch.clone());
        state.last_fetch_started = Some(Instant::now());
        entry.snapshots.send_replace(state.snapshot());
        tokio::spawn(fetch.clone());

        Some(fetch)
    }

    /// Returns the listing of the account, waiting for a fetch when one is due or in flight.
    pub async fn load(&self, account: Option<&AccountName>) -> SyncSnapshot {
        let Some(account) = active(account) else {
            return SyncSnapshot::default();
        };
        let entry = self.entry(account).await;
        if let Some(fetch) = self.trigger(&entry, false).await {
            let _ = fetch.await;
        }

        entry.state.lock().await.snapshot()
    }

    /// Returns the current listing of the account immediately, starting a background fetch when one is due.
    pub async fn request(&self, account: Option<&AccountName>) -> SyncSnapshot {
        let Some(account) = active(account) else {
            return SyncSnapshot::default();
        };
        let entry = self.entry(account).await;
        self.trigger(&entry, false).await;

        entry.state.lock().await.snapshot()
    }

    /// Fetches the listing of the account regardless of the dedup window, joining any in-flight fetch.
    pub async fn revalidate(&self, account: Option<&AccountName>) -> SyncSnapshot {
        let Some(account) = active(account) else {
            return SyncSnapshot::default();
        };
        let entry = self.entry(account).await;
        if let Some(fetch) = self.trigger(&entry, true).await {
            let _ = fetch.await;
        }

        entry.state.lock().await.snapshot()
    }

    /// Revalidates every cached account.
    pub async fn revalidate_all(&self, force: bool) {
        let entries = self
            .entries
            .lock()
            .await
            .values()
            .cloned()
            .collect::<Vec<_>>();
        debug!("Revalidating {} cache entries (force={force})", entries.len());
        let fetches = join_all(entries.iter().map(|entry| self.trigger(entry, force))).await;
        join_all(fetches.into_iter().flatten()).await;
    }

    /// Returns the cached listing of the account without fetching.
    pub async fn snapshot(&self, account: Option<&AccountName>) -> SyncSnapshot {
        let Some(account) = active(account) else {
            return SyncSnapshot::default();
        };
        let entry = self.entries.lock().await.get(&account.cache_key()).cloned();
        match entry {
            Some(entry) => entry.state.lock().await.snapshot(),
            None => SyncSnapshot::default(),
        }
    }

    /// Binds a consumer to the listing of the account, starting a fetch when one is due.
    pub async fn subscribe(self: &Arc<Self>, account: Option<&AccountName>) -> RepositoryBinding {
        let account = active(account).cloned();
        let snapshots = match &account {
            Some(account) => {
                let entry = self.entry(account).await;
                let snapshots = entry.snapshots.subscribe();
                self.trigger(&entry, false).await;
                snapshots
            }
            None => watch::channel(SyncSnapshot::default()).1,
        };

        RepositoryBinding {
            cache: Arc::clone(self),
            account,
            snapshots,
        }
    }
}

fn active(account: Option<&AccountName>) -> Option<&AccountName> {
    account.filter(|account| !account.is_blank())
}

/// A consumer's view over one cached listing.
///
/// Dropping the binding detaches the consumer: fetches completing afterwards still update the cache,
/// but are not delivered anywhere.
pub struct RepositoryBinding {
    cache: Arc<RepositoryCache>,
    account: Option<AccountName>,
    snapshots: watch::Receiver<SyncSnapshot>,
}

impl RepositoryBinding {
    /// Retrieves the latest snapshot delivered to the binding.
    pub fn current(&self) -> SyncSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Waits for the next snapshot. Returns `None` when no snapshot can ever arrive.
    pub async fn changed(&mut self) -> Option<SyncSnapshot> {
        self.snapshots.changed().await.ok()?;

        Some(self.snapshots.borrow_and_update().clone())
    }

    /// Manually refreshes the listing.
    pub async fn refresh(&self) -> SyncSnapshot {
        self.cache.revalidate(self.account.as_ref()).await
    }
}
