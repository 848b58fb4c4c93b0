//! Shared state behind every query interface.
//!
//! Owns the rate limiter, both caches, the provider clients, the clock and the
//! set catalog. All members are `Send + Sync`, so one backend can be shared by
//! concurrent request handlers; the limiter and caches serialize their own
//! mutations.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::cache::{DiskCache, ImageCache, PriceCache};
use crate::clock::Clock;
use crate::config;
use crate::models::{SetInfo, UsageStats};
use crate::providers::{ArtworkSource, PriceSource};
use crate::rate_limit::RateLimiter;
use crate::set_mapping::SetIdMapper;

pub struct Backend {
    pub clock: Arc<dyn Clock>,
    pub limiter: Arc<RateLimiter>,
    pub price_cache: Arc<PriceCache>,
    pub image_cache: Arc<ImageCache>,
    pub pricing: Arc<dyn PriceSource>,
    pub artwork: Arc<dyn ArtworkSource>,
    pub mapper: SetIdMapper,
    /// Freshness window shared by the caches and the refresh policy.
    pub cache_duration: Duration,
    /// In-memory set catalog and the time it was loaded.
    pub(crate) sets: Mutex<Option<(DateTime<Utc>, Vec<SetInfo>)>>,
    pub(crate) sets_disk: Option<DiskCache>,
}

impl Backend {
    /// Create a backend with default limits and cache duration.
    ///
    /// `data_dir` holds the on-disk set catalog; `None` keeps everything in memory.
    pub fn new(
        pricing: Arc<dyn PriceSource>,
        artwork: Arc<dyn ArtworkSource>,
        clock: Arc<dyn Clock>,
        data_dir: Option<PathBuf>,
    ) -> Self {
        let limiter = Arc::new(RateLimiter::new(clock.clone()));
        Self::with_parts(pricing, artwork, clock, limiter, config::CACHE_DURATION, data_dir)
    }

    pub fn with_parts(
        pricing: Arc<dyn PriceSource>,
        artwork: Arc<dyn ArtworkSource>,
        clock: Arc<dyn Clock>,
        limiter: Arc<RateLimiter>,
        cache_duration: Duration,
        data_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            price_cache: Arc::new(PriceCache::new(cache_duration, clock.clone())),
            image_cache: Arc::new(ImageCache::new(cache_duration, clock.clone())),
            sets_disk: data_dir.map(|dir| {
                DiskCache::new(dir, config::SETS_CACHE_FILE, config::SETS_CACHE_MAX_AGE)
            }),
            sets: Mutex::new(None),
            mapper: SetIdMapper::new(),
            clock,
            limiter,
            pricing,
            artwork,
            cache_duration,
        }
    }

    /// Current API budget usage and cache occupancy.
    pub fn usage(&self) -> UsageStats {
        UsageStats {
            rate_limit: self.limiter.snapshot(),
            price_cache_size: self.price_cache.len(),
            image_cache_size: self.image_cache.len(),
        }
    }
}
