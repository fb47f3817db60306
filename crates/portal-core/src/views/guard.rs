use std::future::Future;
use std::sync::Mutex;

use tokio::select;
use tokio_util::sync::CancellationToken;

/// Result of a guarded query.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome<T> {
    Completed(T),
    /// A newer query on the same view started first; this result is stale.
    Superseded,
}

impl<T> SearchOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            SearchOutcome::Completed(value) => Some(value),
            SearchOutcome::Superseded => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, SearchOutcome::Superseded)
    }
}

/// Latest-wins guard for one view's queries.
///
/// Starting a query cancels the token of the previous one, so at most one
/// result per view is ever applied.
#[derive(Debug, Default)]
pub struct QueryGuard {
    current: Mutex<CancellationToken>,
}

impl QueryGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the in-flight query, if any, and hand out a fresh token.
    pub fn begin(&self) -> CancellationToken {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        current.cancel();
        *current = CancellationToken::new();
        current.clone()
    }

    /// Drive `query` until it finishes or a newer query supersedes it.
    pub async fn run<F, T>(&self, query: F) -> SearchOutcome<T>
    where
        F: Future<Output = T>,
    {
        let token = self.begin();
        select! {
            biased;
            _ = token.cancelled() => {
                tracing::debug!("Query superseded before completion");
                SearchOutcome::Superseded
            }
            value = query => {
                if token.is_cancelled() {
                    SearchOutcome::Superseded
                } else {
                    SearchOutcome::Completed(value)
                }
            }
        }
    }
}
