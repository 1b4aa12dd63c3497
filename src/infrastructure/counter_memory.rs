use std::sync::atomic::{AtomicU64, Ordering};

use crate::{StdResult, VisitCounter};

/// A visit counter kept in memory, lost on restart.
#[derive(Debug, Default)]
pub struct MemoryVisitCounter {
    total: AtomicU64,
}

impl MemoryVisitCounter {
    /// Creates a new `MemoryVisitCounter` starting at the given total.
    pub fn new(total: u64) -> Self {
        Self {
            total: AtomicU64::new(total),
        }
    }
}

#[async_trait::async_trait]
impl VisitCounter for MemoryVisitCounter {
    async fn total(&self) -> StdResult<u64> {
        Ok(self.total.load(Ordering::SeqCst))
    }

    async fn increment(&self) -> StdResult<u64> {
        Ok(self.total.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn increment_returns_new_total() {
        let counter = MemoryVisitCounter::new(41);

        assert_eq!(42, counter.increment().await.unwrap());
        assert_eq!(42, counter.total().await.unwrap());
    }

    #[tokio::test]
    async fn concurrent_increments_are_all_counted() {
        let counter = std::sync::Arc::new(MemoryVisitCounter::default());
        let tasks = (0..10)
            .map(|_| {
                let counter = counter.clone();
                tokio::spawn(async move { counter.increment().await.unwrap() })
            })
            .collect::<Vec<_>>();
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(10, counter.total().await.unwrap());
    }
}
