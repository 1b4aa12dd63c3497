use std::time::Duration;

use anyhow::{Context, anyhow};
use log::{error, info, warn};
use reqwest::{Client, RequestBuilder, header::ACCEPT};
use thiserror::Error;

use crate::{AccountName, Repository, RepositoryFetcher, RepositoryFilter, StdResult};

/// The REST production endpoint for GitHub.
pub const GITHUB_REST_ENDPOINT: &str = "https://api.github.com";

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

const USER_AGENT: &str = concat!("portfolio-api/", env!("CARGO_PKG_VERSION"));

/// Maximum number of repositories requested per listing.
const PER_PAGE: &str = "100";

/// Fetcher error
#[derive(Error, Debug)]
pub enum FetcherError {
    /// The API answered with a non-success status
    #[error("GitHub API error: {status}")]
    FetchFailed { status: u16 },
    /// Parse error
    #[error("Parsing error: {0}")]
    Parse(String),
    /// Transport error
    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for FetcherError {
    fn from(error: reqwest::Error) -> Self {
        match error.is_decode() {
            true => FetcherError::Parse(error.to_string()),
            false => FetcherError::Transport(error.to_string()),
        }
    }
}

/// Fetches repository listings from the GitHub REST API.
pub struct GitHubRestFetcher {
    client: Client,
    endpoint: String,
    token: Option<String>,
    filter: RepositoryFilter,
}

impl GitHubRestFetcher {
    /// Creates a new `GitHubRestFetcher` instance for the given endpoint.
    pub fn try_new(
        endpoint: &str,
        token: Option<String>,
        filter: RepositoryFilter,
    ) -> StdResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()
            .with_context(|| "Failed to build GitHub HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token: token.filter(|token| !token.trim().is_empty()),
            filter,
        })
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let request = self
            .client
            .get(format!("{}{path}", self.endpoint))
            .header(ACCEPT, GITHUB_ACCEPT);
        match &self.token {
            Some(token) => request.bearer_auth(token.trim()),
            None => request,
        }
    }

    async fn fetch_listing(&self, account: &AccountName) -> Result<Vec<Repository>, FetcherError> {
        let response = self
            .get(&format!("/users/{account}/repos"))
            .query(&[("sort", "updated"), ("per_page", PER_PAGE)])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetcherError::FetchFailed {
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| FetcherError::Parse(e.to_string()))
    }

    /// Fetches a single repository of the account, unfiltered.
    pub async fn fetch_repository(&self, account: &AccountName, name: &str) -> Option<Repository> {
        let response = match self.get(&format!("/repos/{account}/{name}")).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Failed to fetch repository {account}/{name}: {e}");
                return None;
            }
        };
        if !response.status().is_success() {
            warn!(
                "GitHub API returned {} for repository {account}/{name}",
                response.status()
            );
            return None;
        }

        match response.json::<Repository>().await {
            Ok(repository) => Some(repository),
            Err(e) => {
                error!("Failed to parse repository {account}/{name}: {e}");
                None
            }
        }
    }
}

#[async_trait::async_trait]
impl RepositoryFetcher for GitHubRestFetcher {
    async fn fetch(&self, account: &AccountName) -> StdResult<Vec<Repository>> {
        match self.fetch_listing(account).await {
            Ok(repositories) => {
                let total_fetched = repositories.len();
                let repositories = self.filter.apply(repositories);
                info!(
                    "Fetched {total_fetched} repositories for {account}, {} listed",
                    repositories.len()
                );

                Ok(repositories)
            }
            Err(e @ FetcherError::FetchFailed { .. }) => Err(anyhow!(e)),
            Err(e) => {
                error!("Error fetching GitHub repositories for {account}: {e}");
                Ok(vec![])
            }
        }
    }
}
