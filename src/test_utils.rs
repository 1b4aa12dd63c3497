#![cfg(test)]

use std::{
    collections::VecDeque,
    sync::{
        Mutex,
        atomic::{AtomicU32, Ordering},
    },
    time::Duration,
};

use anyhow::anyhow;
use tokio::time::sleep;

use crate::{AccountName, Repository, RepositoryFetcher, StdResult};

/// A fetcher answering with scripted outcomes after a delay, counting its calls.
pub struct ScriptedFetcher {
    delay: Duration,
    calls: AtomicU32,
    outcomes: Mutex<VecDeque<Result<Vec<Repository>, String>>>,
}

impl ScriptedFetcher {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: AtomicU32::new(0),
            outcomes: Mutex::new(VecDeque::new()),
        }
    }

    pub fn then_ok(self, repositories: Vec<Repository>) -> Self {
        self.outcomes.lock().unwrap().push_back(Ok(repositories));
        self
    }

    pub fn then_err(self, message: &str) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RepositoryFetcher for ScriptedFetcher {
    async fn fetch(&self, _account: &AccountName) -> StdResult<Vec<Repository>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        sleep(self.delay).await;
        let outcome = self.outcomes.lock().unwrap().pop_front();

        match outcome {
            Some(Ok(repositories)) => Ok(repositories),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Ok(vec![]),
        }
    }
}

pub fn repositories(names: &[&str]) -> Vec<Repository> {
    names
        .iter()
        .enumerate()
        .map(|(index, name)| Repository::dummy(index as u64 + 1, name))
        .collect()
}

pub fn names(repositories: &[Repository]) -> Vec<&str> {
    repositories.iter().map(|r| r.name()).collect()
}
