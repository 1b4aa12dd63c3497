use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::Serialize;
use serde_json::{Value, json};

use super::AppState;
use crate::{Repository, RepositoryCatalog, RepositoryFilter, SyncEvent, SyncSnapshot};

/// The response of the repository endpoints.
#[derive(Serialize, Debug)]
pub struct RepositoriesResponse {
    pub total: usize,
    pub is_loading: bool,
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    pub repositories: Vec<Repository>,
    pub catalog: RepositoryCatalog,
}

impl RepositoriesResponse {
    /// Creates a new `RepositoriesResponse` from a cache snapshot.
    pub fn new(snapshot: &SyncSnapshot, filter: &RepositoryFilter) -> Self {
        Self {
            total: snapshot.repositories().len(),
            is_loading: snapshot.is_loading(),
            error: snapshot.error().map(str::to_string),
            last_updated: snapshot.last_updated(),
            repositories: snapshot.repositories().to_vec(),
            catalog: RepositoryCatalog::build(snapshot.repositories(), filter),
        }
    }
}

/// Lists the cached repositories, starting a background revalidation when one is due.
pub async fn list_repositories(State(state): State<AppState>) -> Json<RepositoriesResponse> {
    let snapshot = state.cache.request(state.account.as_ref()).await;

    Json(RepositoriesResponse::new(&snapshot, &state.filter))
}

/// Refreshes the cached repositories and lists them.
pub async fn refresh_repositories(State(state): State<AppState>) -> Json<RepositoriesResponse> {
    debug!("Manual refresh requested");
    let snapshot = state.cache.revalidate(state.account.as_ref()).await;

    Json(RepositoriesResponse::new(&snapshot, &state.filter))
}

/// Notifies the sync driver that the network connection came back.
pub async fn reconnect(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let Some(sync_events) = &state.sync_events else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "accepted": false, "message": "Sync driver is not running" })),
        );
    };
    match sync_events.try_send(SyncEvent::Reconnect) {
        Ok(()) => (StatusCode::ACCEPTED, Json(json!({ "accepted": true }))),
        Err(e) => {
            warn!("Failed to forward reconnect event: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "accepted": false, "message": "Sync driver is busy" })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::mpsc;

    use crate::MockRepositoryFetcher;

    use super::*;

    fn fetcher_returning(names: &'static [&'static str]) -> MockRepositoryFetcher {
        let mut fetcher = MockRepositoryFetcher::new();
        fetcher
            .expect_fetch()
            .returning(move |_| {
                Ok(names
                    .iter()
                    .enumerate()
                    .map(|(index, name)| Repository::dummy(index as u64 + 1, name))
                    .collect())
            })
            .times(1);

        fetcher
    }

    #[tokio::test]
    async fn list_without_account_never_fetches() {
        let state = AppState::dummy(Arc::new(MockRepositoryFetcher::new()), None, None);

        let Json(response) = list_repositories(State(state)).await;

        assert_eq!(0, response.total);
        assert!(!response.is_loading);
        assert_eq!(RepositoryCatalog::default(), response.catalog);
    }

    #[tokio::test]
    async fn refresh_returns_catalog() {
        let state = AppState::dummy(
            Arc::new(fetcher_returning(&["parking-front", "portfolio"])),
            Some("octocat"),
            None,
        );

        let Json(response) = refresh_repositories(State(state)).await;

        assert_eq!(2, response.total);
        assert!(!response.is_loading);
        assert_eq!(None, response.error);
        assert_eq!("parking-front", response.catalog.featured[0].name());
        assert_eq!("portfolio", response.catalog.recent[0].name());
    }

    #[tokio::test]
    async fn list_serves_cached_repositories_after_refresh() {
        let state = AppState::dummy(
            Arc::new(fetcher_returning(&["portfolio"])),
            Some("octocat"),
            None,
        );

        refresh_repositories(State(state.clone())).await;
        let Json(response) = list_repositories(State(state)).await;

        assert_eq!(1, response.total);
        assert!(!response.is_loading);
    }

    #[tokio::test]
    async fn reconnect_forwards_event_to_sync_driver() {
        let (sender, mut receiver) = mpsc::channel(1);
        let mut state = AppState::dummy(Arc::new(MockRepositoryFetcher::new()), None, None);
        state.sync_events = Some(sender);

        let (status, _) = reconnect(State(state)).await;

        assert_eq!(StatusCode::ACCEPTED, status);
        assert_eq!(Some(SyncEvent::Reconnect), receiver.recv().await);
    }

    #[tokio::test]
    async fn reconnect_without_sync_driver_is_unavailable() {
        let state = AppState::dummy(Arc::new(MockRepositoryFetcher::new()), None, None);

        let (status, Json(body)) = reconnect(State(state)).await;

        assert_eq!(StatusCode::SERVICE_UNAVAILABLE, status);
        assert_eq!(false, body["accepted"]);
    }
}
