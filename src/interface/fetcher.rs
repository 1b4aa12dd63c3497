use crate::{AccountName, Repository, StdResult};

/// A trait for fetching the repository listing of an account.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RepositoryFetcher: Sync + Send {
    /// Fetches the filtered repositories of the account.
    async fn fetch(&self, account: &AccountName) -> StdResult<Vec<Repository>>;
}
