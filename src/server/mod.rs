mod contact;
mod repositories;
mod visits;

use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{get, post},
};
use log::info;
use serde_json::{Value, json};
use tokio::{net::TcpListener, sync::mpsc};

pub use contact::*;
pub use repositories::*;
pub use visits::*;

use crate::{
    AccountName, ContactMailer, RepositoryCache, RepositoryFilter, StdResult, SyncEvent,
    VisitsReporter,
};

/// State shared by every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    /// The repository cache.
    pub cache: Arc<RepositoryCache>,

    /// The account whose repositories are listed, if configured.
    pub account: Option<AccountName>,

    pub filter: Arc<RepositoryFilter>,

    /// The contact relay, if configured.
    pub mailer: Option<Arc<dyn ContactMailer>>,

    pub visits: Arc<VisitsReporter>,

    /// The event sender of the running sync driver.
    pub sync_events: Option<mpsc::Sender<SyncEvent>>,
}

impl AppState {
    /// Creates a dummy `AppState` for testing purposes.
    #[cfg(test)]
    pub(crate) fn dummy(
        fetcher: Arc<dyn crate::RepositoryFetcher>,
        account: Option<&str>,
        mailer: Option<Arc<dyn ContactMailer>>,
    ) -> Self {
        Self {
            cache: Arc::new(RepositoryCache::new(
                fetcher,
                std::time::Duration::from_secs(60),
            )),
            account: account.map(AccountName::new),
            filter: Arc::new(RepositoryFilter::default()),
            mailer,
            visits: Arc::new(VisitsReporter::new(None, None)),
            sync_events: None,
        }
    }
}

/// Builds the HTTP router of the API.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/repositories", get(list_repositories))
        .route("/api/repositories/refresh", post(refresh_repositories))
        .route("/api/repositories/reconnect", post(reconnect))
        .route("/api/analytics/visits", get(get_visits).post(record_visit))
        .route("/api/contact", post(submit_contact))
        .with_state(state)
}

/// Serves the router until a shutdown signal is received.
pub async fn serve(listener: TcpListener, router: Router) -> StdResult<()> {
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
pub(crate) async fn response_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    serde_json::from_slice(&body).unwrap()
}
