//! Async wrapper around [`PriceTracker`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all tracker operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free while
//! the blocking HTTP clients wait on the providers.
//!
//! # Example
//!
//! ```no_run
//! use pokevault::{AsyncPriceTracker, CardIdentity, PriceTracker, SetRef};
//!
//! #[tokio::main]
//! async fn main() {
//!     let tracker = AsyncPriceTracker::build(PriceTracker::builder()).await.unwrap();
//!
//!     let identity = CardIdentity::new("Pikachu", SetRef::pricing("base1"), "58");
//!     let quote = tracker.resolve_price(identity).await.unwrap();
//!
//!     // Run any sync tracker method via closure
//!     let sets = tracker.run(|t| Ok(t.sets().list())).await.unwrap();
//! }
//! ```

use std::sync::Arc;

use crate::error::{Result, TrackerError};
use crate::models::{CardIdentity, CardSuggestion, PriceHistory, PriceQuote, UsageStats};
use crate::{PriceTracker, PriceTrackerBuilder};

/// Async wrapper around [`PriceTracker`].
///
/// The tracker is `Sync`, so concurrent operations share one instance
/// without an outer lock; the limiter and caches serialize themselves.
#[derive(Clone)]
pub struct AsyncPriceTracker {
    inner: Arc<PriceTracker>,
}

impl AsyncPriceTracker {
    /// Wrap an already-built tracker.
    pub fn new(tracker: PriceTracker) -> Self {
        Self {
            inner: Arc::new(tracker),
        }
    }

    /// Build the tracker on the blocking thread pool, since constructing the
    /// blocking HTTP clients must not happen on an async worker.
    pub async fn build(builder: PriceTrackerBuilder) -> Result<Self> {
        let tracker = tokio::task::spawn_blocking(move || builder.build())
            .await
            .map_err(join_error)??;
        Ok(Self::new(tracker))
    }

    /// Run a sync tracker operation on the blocking thread pool.
    ///
    /// The closure receives a `&PriceTracker` and should return a `Result<T>`.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&PriceTracker) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let tracker = self.inner.clone();
        tokio::task::spawn_blocking(move || f(&tracker))
            .await
            .map_err(join_error)?
    }

    pub async fn resolve_price(&self, identity: CardIdentity) -> Result<PriceQuote> {
        self.run(move |t| t.prices().resolve(&identity)).await
    }

    pub async fn resolve_image(
        &self,
        identity: CardIdentity,
        artwork_set: Option<String>,
    ) -> Result<Option<String>> {
        self.run(move |t| Ok(t.images().resolve(&identity, artwork_set.as_deref())))
            .await
    }

    pub async fn price_history(&self, identity: CardIdentity) -> Result<PriceHistory> {
        self.run(move |t| t.history().synthesize(&identity)).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<CardSuggestion>> {
        let query = query.to_string();
        self.run(move |t| Ok(t.search().cards(&query))).await
    }

    pub async fn stats(&self) -> Result<UsageStats> {
        self.run(|t| Ok(t.stats())).await
    }

    /// Borrow the wrapped tracker for cheap, non-blocking calls.
    pub fn tracker(&self) -> &PriceTracker {
        &self.inner
    }
}

fn join_error(e: tokio::task::JoinError) -> TrackerError {
    TrackerError::InvalidArgument(format!("Task join error: {e}"))
}
