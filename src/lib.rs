//! Price and artwork acquisition core for a Pokemon card portfolio tracker.
//!
//! Resolves a card (name, set, number) against a rate-limited pricing API and
//! an artwork API, translating set ids between the vocabularies each side
//! uses. Results are cached for an hour and shared by all users; when the
//! call budget is spent or a provider fails, the last known value is served
//! instead, and a missing price is reported as missing, never as zero.
//!
//! # Quick start
//!
//! ```no_run
//! use pokevault::{CardIdentity, PriceTracker, SetRef};
//!
//! let tracker = PriceTracker::builder().api_key("secret").build().unwrap();
//!
//! let charizard = CardIdentity::new("Charizard", SetRef::pricing("base1"), "4");
//! let quote = tracker.prices().resolve(&charizard).unwrap();
//! let image = tracker.images().resolve(&charizard, None);
//! let history = tracker.history().synthesize(&charizard).unwrap();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod backend;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod numbers;
pub mod portfolio;
pub mod providers;
pub mod queries;
pub mod rate_limit;
pub mod set_mapping;

#[cfg(feature = "async")]
pub use async_client::AsyncPriceTracker;
pub use backend::Backend;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Result, TrackerError};
pub use models::{
    ArtworkCard, Card, CardIdentity, CardSuggestion, NewCard, PriceCategory, PriceHistory,
    PriceObservation, PriceQuote, PriceResponse, QuoteSource, RefreshReport, SetInfo, SetRef,
    SetSelection, SetVocabulary, UsageStats,
};
pub use portfolio::{JsonFilePortfolioStore, MemoryPortfolioStore, PortfolioService, PortfolioStore};
pub use rate_limit::RateLimiter;
pub use set_mapping::SetIdMapper;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use providers::{ArtworkClient, ArtworkSource, PriceSource, PricingClient};

// ---------------------------------------------------------------------------
// PriceTrackerBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`PriceTracker`].
///
/// Use [`PriceTracker::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](PriceTrackerBuilder::build).
pub struct PriceTrackerBuilder {
    api_key: Option<String>,
    pricing_base_url: String,
    artwork_base_url: String,
    timeout: Duration,
    daily_limit: u32,
    minute_limit: u32,
    cache_duration: Duration,
    data_dir: Option<PathBuf>,
    persist_sets: bool,
    clock: Option<Arc<dyn Clock>>,
    price_source: Option<Arc<dyn PriceSource>>,
    artwork_source: Option<Arc<dyn ArtworkSource>>,
}

impl Default for PriceTrackerBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            pricing_base_url: config::PRICING_API_BASE.to_string(),
            artwork_base_url: config::ARTWORK_API_BASE.to_string(),
            timeout: config::DEFAULT_TIMEOUT,
            daily_limit: config::DAILY_LIMIT,
            minute_limit: config::MINUTE_LIMIT,
            cache_duration: config::CACHE_DURATION,
            data_dir: None,
            persist_sets: true,
            clock: None,
            price_source: None,
            artwork_source: None,
        }
    }
}

impl PriceTrackerBuilder {
    /// Set the pricing API key.
    ///
    /// If not set, the key is read from the `POKEMON_API_KEY` environment
    /// variable, then from `api.txt` in the working directory.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn pricing_base_url(mut self, url: impl Into<String>) -> Self {
        self.pricing_base_url = url.into();
        self
    }

    pub fn artwork_base_url(mut self, url: impl Into<String>) -> Self {
        self.artwork_base_url = url.into();
        self
    }

    /// Set the per-request HTTP timeout. Defaults to 10 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the daily and per-minute call budgets (200 and 60 by default).
    pub fn limits(mut self, daily: u32, per_minute: u32) -> Self {
        self.daily_limit = daily;
        self.minute_limit = per_minute;
        self
    }

    /// Set how long resolved prices and images stay fresh. Defaults to 1 hour.
    pub fn cache_duration(mut self, duration: Duration) -> Self {
        self.cache_duration = duration;
        self
    }

    /// Set the directory holding the on-disk set catalog.
    ///
    /// If not set, the platform cache directory is used (e.g.
    /// `~/.cache/pokevault` on Linux).
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self.persist_sets = true;
        self
    }

    /// Keep the set catalog in memory only.
    pub fn in_memory(mut self) -> Self {
        self.data_dir = None;
        self.persist_sets = false;
        self
    }

    /// Replace the wall clock, e.g. with a [`ManualClock`] in tests.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Use a custom pricing source instead of the HTTP client.
    pub fn price_source(mut self, source: Arc<dyn PriceSource>) -> Self {
        self.price_source = Some(source);
        self
    }

    /// Use a custom artwork source instead of the HTTP client.
    pub fn artwork_source(mut self, source: Arc<dyn ArtworkSource>) -> Self {
        self.artwork_source = Some(source);
        self
    }

    /// Build the tracker. No request is made until the first query.
    pub fn build(self) -> Result<PriceTracker> {
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let pricing: Arc<dyn PriceSource> = match self.price_source {
            Some(source) => source,
            None => {
                let key = self.api_key.or_else(config::load_api_key);
                if key.is_none() {
                    log::warn!("No pricing API key configured; price lookups will fail");
                }
                Arc::new(PricingClient::new(&self.pricing_base_url, key, self.timeout)?)
            }
        };
        let artwork: Arc<dyn ArtworkSource> = match self.artwork_source {
            Some(source) => source,
            None => Arc::new(ArtworkClient::new(&self.artwork_base_url, self.timeout)?),
        };

        let data_dir = if self.persist_sets {
            Some(self.data_dir.unwrap_or_else(config::default_data_dir))
        } else {
            None
        };
        let limiter = Arc::new(RateLimiter::with_limits(
            self.daily_limit,
            self.minute_limit,
            clock.clone(),
        ));
        let backend = Backend::with_parts(
            pricing,
            artwork,
            clock,
            limiter,
            self.cache_duration,
            data_dir.clone(),
        );
        Ok(PriceTracker { backend, data_dir })
    }
}

// ---------------------------------------------------------------------------
// PriceTracker
// ---------------------------------------------------------------------------

/// The main entry point.
///
/// Owns the shared [`Backend`] and exposes each concern as a lightweight
/// borrowing wrapper. `PriceTracker` is `Send + Sync`; share it across
/// request handlers behind an `Arc`.
pub struct PriceTracker {
    backend: Backend,
    data_dir: Option<PathBuf>,
}

impl PriceTracker {
    /// Create a new builder for configuring the tracker.
    pub fn builder() -> PriceTrackerBuilder {
        PriceTrackerBuilder::default()
    }

    // -- Query accessors ---------------------------------------------------

    /// Current-price resolution.
    pub fn prices(&self) -> queries::PriceResolver<'_> {
        queries::PriceResolver::new(&self.backend)
    }

    /// Artwork resolution.
    pub fn images(&self) -> queries::ImageResolver<'_> {
        queries::ImageResolver::new(&self.backend)
    }

    /// Synthetic price history. Each call spends one request from the budget.
    pub fn history(&self) -> queries::HistorySynthesizer<'_> {
        queries::HistorySynthesizer::new(&self.backend)
    }

    /// The pricing provider's set catalog.
    pub fn sets(&self) -> queries::SetQuery<'_> {
        queries::SetQuery::new(&self.backend)
    }

    /// Card-name search.
    pub fn search(&self) -> queries::SearchQuery<'_> {
        queries::SearchQuery::new(&self.backend)
    }

    /// Portfolio operations backed by `store`.
    pub fn portfolio<'a>(&'a self, store: &'a dyn PortfolioStore) -> PortfolioService<'a> {
        PortfolioService::new(&self.backend, store)
    }

    // -- Metadata and utility methods --------------------------------------

    /// API budget usage and cache sizes.
    pub fn stats(&self) -> UsageStats {
        self.backend.usage()
    }

    pub fn mapper(&self) -> &SetIdMapper {
        &self.backend.mapper
    }

    /// Drop every cached price and image.
    pub fn clear_caches(&self) {
        self.backend.price_cache.clear();
        self.backend.image_cache.clear();
        log::info!("Price and image caches cleared");
    }

    /// Return a reference to the shared [`Backend`] for advanced usage.
    pub fn backend(&self) -> &Backend {
        &self.backend
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for PriceTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let usage = self.backend.usage();
        let data_dir = self
            .data_dir
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<memory>".to_string());
        write!(
            f,
            "PriceTracker(data_dir={}, calls_today={}/{}, price_cache={}, image_cache={})",
            data_dir,
            usage.rate_limit.calls_today,
            usage.rate_limit.daily_limit,
            usage.price_cache_size,
            usage.image_cache_size
        )
    }
}
