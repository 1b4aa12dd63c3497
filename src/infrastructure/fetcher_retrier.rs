use std::{sync::Arc, time::Duration};

use anyhow::anyhow;
use log::{debug, warn};
use tokio::time::sleep;

use crate::{AccountName, Repository, RepositoryFetcher, StdResult};

/// The phases a retried fetch goes through.
#[derive(Debug)]
enum RetryPhase {
    Idle,
    Fetching { attempt: u32 },
    Retrying { attempt: u32 },
    Succeeded(Vec<Repository>),
    Failed { attempts: u32, error: anyhow::Error },
}

/// A struct that retries a RepositoryFetcher a fixed number of times, waiting a fixed delay between attempts.
pub struct FetcherRetrier {
    /// The fetcher to be retried.
    fetcher: Arc<dyn RepositoryFetcher>,

    /// The number of retries after the first failed attempt.
    max_retries: u32,

    /// The delay between two attempts.
    retry_delay: Duration,
}

impl FetcherRetrier {
    /// Creates a new `FetcherRetrier` instance with the given number of retries and delay.
    pub fn new(fetcher: Arc<dyn RepositoryFetcher>, max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            fetcher,
            max_retries,
            retry_delay,
        }
    }

    async fn step(&self, phase: RetryPhase, account: &AccountName) -> RetryPhase {
        match phase {
            RetryPhase::Idle => RetryPhase::Fetching { attempt: 1 },
            RetryPhase::Fetching { attempt } => match self.fetcher.fetch(account).await {
                Ok(repositories) => RetryPhase::Succeeded(repositories),
                Err(error) => {
                    warn!("Fetch attempt #{attempt} for {account} failed: {error}");
                    if attempt > self.max_retries {
                        RetryPhase::Failed {
                            attempts: attempt,
                            error,
                        }
                    } else {
                        RetryPhase::Retrying { attempt }
                    }
                }
            },
            RetryPhase::Retrying { attempt } => {
                debug!("Retrying fetch for {account} in {:?}", self.retry_delay);
                sleep(self.retry_delay).await;
                RetryPhase::Fetching {
                    attempt: attempt.saturating_add(1),
                }
            }
            phase @ (RetryPhase::Succeeded(_) | RetryPhase::Failed { .. }) => phase,
        }
    }
}

#[async_trait::async_trait]
impl RepositoryFetcher for FetcherRetrier {
    /// Retries the fetch if it fails, up to the maximum number of retries.
    async fn fetch(&self, account: &AccountName) -> StdResult<Vec<Repository>> {
        let mut phase = RetryPhase::Idle;

        loop {
            phase = match self.step(phase, account).await {
                RetryPhase::Succeeded(repositories) => return Ok(repositories),
                RetryPhase::Failed { attempts, error } => {
                    return Err(anyhow!("Failed after {attempts} attempts: {error}"));
                }
                phase => phase,
            };
        }
    }
}
