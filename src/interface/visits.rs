use crate::StdResult;

/// A trait for reading the total visits from an analytics provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait VisitsProvider: Sync + Send {
    /// Retrieves the total number of visits.
    async fn total_visits(&self) -> StdResult<u64>;
}

/// A trait for a persistent visit counter.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait VisitCounter: Sync + Send {
    /// Retrieves the current total.
    async fn total(&self) -> StdResult<u64>;

    /// Records one visit and returns the new total.
    async fn increment(&self) -> StdResult<u64>;
}
