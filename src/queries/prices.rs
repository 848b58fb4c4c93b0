//! Current-price resolution: cache, rate limit, upstream, degrade.

use crate::backend::Backend;
use crate::cache::{price_cache_key, CacheLookup};
use crate::error::{Result, TrackerError};
use crate::models::{Card, CardIdentity, PriceQuote, PriceResponse, QuoteSource};

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Highest strictly-positive price across every group of the first record.
///
/// Graded-sale averages, marketplace snapshot prices and time-windowed
/// averages all compete; the result does not depend on field order. Returns
/// `None` when no field qualifies, so an absent price is never reported as 0.
pub fn extract_highest_price(response: &PriceResponse) -> Option<f64> {
    let record = response.first()?;
    record
        .all_price_fields()
        .into_iter()
        .flatten()
        .filter(|p| p.is_finite() && *p > 0.0)
        .fold(None, |best: Option<f64>, p| match best {
            Some(b) if b >= p => Some(b),
            _ => Some(p),
        })
}

// ---------------------------------------------------------------------------
// PriceResolver
// ---------------------------------------------------------------------------

/// Resolves a card's representative market price.
pub struct PriceResolver<'a> {
    backend: &'a Backend,
}

impl<'a> PriceResolver<'a> {
    pub fn new(backend: &'a Backend) -> Self {
        Self { backend }
    }

    /// Resolve the current price for `identity`.
    ///
    /// Order: map the set into the pricing vocabulary, serve a fresh cache
    /// entry, otherwise spend one call from the shared budget and ask the
    /// provider. When the budget is exhausted or the call fails, the last
    /// known price is served with a note, or `None` if there is none.
    ///
    /// Errors only for a missing API key or an unmappable set.
    pub fn resolve(&self, identity: &CardIdentity) -> Result<PriceQuote> {
        if !self.backend.pricing.is_configured() {
            return Err(TrackerError::NotConfigured(
                "pricing API key is not configured".to_string(),
            ));
        }

        let set_id = self.backend.mapper.to_pricing(&identity.set)?;
        let number = identity.number.trim();
        let key = price_cache_key(&identity.name, &set_id, number);

        if let Some(price) = self.backend.price_cache.get_fresh(&key) {
            log::debug!("Price cache hit for {}", key);
            return Ok(PriceQuote {
                price,
                note: None,
                source: QuoteSource::Cache,
            });
        }

        if !self.backend.limiter.try_acquire() {
            return Ok(self.degrade(&key, "rate limit reached"));
        }

        match self
            .backend
            .pricing
            .search_price(&identity.name, &set_id, number)
        {
            Ok(response) => {
                let price = extract_highest_price(&response);
                if price.is_none() {
                    log::info!("No usable price for {}", key);
                }
                self.backend.price_cache.insert(&key, price);
                Ok(PriceQuote {
                    price,
                    note: None,
                    source: QuoteSource::Upstream,
                })
            }
            Err(e @ TrackerError::NotConfigured(_)) => Err(e),
            Err(e) => {
                log::warn!("Error fetching card price for {}: {}", key, e);
                Ok(self.degrade(&key, "API error"))
            }
        }
    }

    /// Serve the last known price, fresh or not, or report unavailability.
    fn degrade(&self, key: &str, reason: &str) -> PriceQuote {
        match self.backend.price_cache.get(key) {
            Some(hit) => PriceQuote {
                price: hit.value,
                note: Some(format!("Using cached price - {}", reason)),
                source: QuoteSource::StaleCache,
            },
            None => PriceQuote {
                price: None,
                note: Some(format!("Price unavailable - {}", reason)),
                source: QuoteSource::Unavailable,
            },
        }
    }

    /// Cached entry for a portfolio card, fresh or stale.
    pub fn cached(&self, card: &Card) -> Option<CacheLookup<Option<f64>>> {
        self.backend
            .price_cache
            .get(&price_cache_key(&card.name, &card.set, card.number.trim()))
    }

    /// Whether a portfolio card's price should be re-fetched: its cache entry
    /// is missing or stale, or the card itself was last updated more than one
    /// cache duration ago.
    pub fn needs_refresh(&self, card: &Card) -> bool {
        let fresh = self.cached(card).map(|hit| hit.fresh).unwrap_or(false);
        let age = self.backend.clock.now() - card.last_updated;
        let max_age = crate::clock::to_chrono(self.backend.cache_duration);
        !fresh || age > max_age
    }
}
