//! Synthetic price history.
//!
//! The pricing provider only returns a snapshot. Each distinct figure in that
//! snapshot (time-windowed averages, trend, reverse-holo averages, graded
//! sales, marketplace low/market/high) becomes one observation placed at a
//! fixed offset before "now", so a chart can draw a plausible line. The result
//! is always flagged `synthetic`.

use chrono::{DateTime, Duration, Utc};

use crate::backend::Backend;
use crate::error::{Result, TrackerError};
use crate::models::{CardIdentity, PriceCategory, PriceHistory, PriceObservation, PriceRecord, PriceResponse};
use crate::queries::prices::extract_highest_price;

/// Graded-sale tiers A, B and C, in that order.
pub const GRADE_TIERS: [&str; 3] = ["psa10", "psa9", "psa8"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotField {
    MarketAvg30,
    MarketAvg7,
    MarketAvg1,
    Trend,
    ReverseHoloAvg30,
    ReverseHoloAvg7,
    GradedTierA,
    GradedTierB,
    GradedTierC,
    SnapshotLow,
    SnapshotMarket,
    SnapshotHigh,
}

pub const SNAPSHOT_FIELDS: [SnapshotField; 12] = [
    SnapshotField::MarketAvg30,
    SnapshotField::MarketAvg7,
    SnapshotField::MarketAvg1,
    SnapshotField::Trend,
    SnapshotField::ReverseHoloAvg30,
    SnapshotField::ReverseHoloAvg7,
    SnapshotField::GradedTierA,
    SnapshotField::GradedTierB,
    SnapshotField::GradedTierC,
    SnapshotField::SnapshotLow,
    SnapshotField::SnapshotMarket,
    SnapshotField::SnapshotHigh,
];

impl SnapshotField {
    /// Synthetic offset, in days before now.
    pub fn days_ago(self) -> i64 {
        match self {
            SnapshotField::MarketAvg30 => 30,
            SnapshotField::MarketAvg7 => 7,
            SnapshotField::MarketAvg1 => 1,
            SnapshotField::Trend => 14,
            SnapshotField::ReverseHoloAvg30 => 25,
            SnapshotField::ReverseHoloAvg7 => 5,
            SnapshotField::GradedTierA => 2,
            SnapshotField::GradedTierB => 4,
            SnapshotField::GradedTierC => 6,
            SnapshotField::SnapshotLow => 21,
            SnapshotField::SnapshotMarket => 10,
            SnapshotField::SnapshotHigh => 3,
        }
    }

    pub fn category(self) -> PriceCategory {
        match self {
            SnapshotField::MarketAvg30 => PriceCategory::Historical,
            SnapshotField::MarketAvg7 => PriceCategory::Recent,
            SnapshotField::MarketAvg1 => PriceCategory::Current,
            SnapshotField::Trend => PriceCategory::Trend,
            SnapshotField::ReverseHoloAvg30 | SnapshotField::ReverseHoloAvg7 => {
                PriceCategory::ReverseHolo
            }
            SnapshotField::GradedTierA | SnapshotField::GradedTierB | SnapshotField::GradedTierC => {
                PriceCategory::Graded
            }
            SnapshotField::SnapshotLow | SnapshotField::SnapshotMarket | SnapshotField::SnapshotHigh => {
                PriceCategory::Tcgplayer
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SnapshotField::MarketAvg30 => "CardMarket 30-day average",
            SnapshotField::MarketAvg7 => "CardMarket 7-day average",
            SnapshotField::MarketAvg1 => "CardMarket 1-day average",
            SnapshotField::Trend => "CardMarket trend",
            SnapshotField::ReverseHoloAvg30 => "Reverse holo 30-day average",
            SnapshotField::ReverseHoloAvg7 => "Reverse holo 7-day average",
            SnapshotField::GradedTierA => "eBay PSA 10 average",
            SnapshotField::GradedTierB => "eBay PSA 9 average",
            SnapshotField::GradedTierC => "eBay PSA 8 average",
            SnapshotField::SnapshotLow => "TCGPlayer low",
            SnapshotField::SnapshotMarket => "TCGPlayer market",
            SnapshotField::SnapshotHigh => "TCGPlayer high",
        }
    }

    pub fn value(self, record: &PriceRecord) -> Option<f64> {
        let cm = record.cardmarket();
        let tcg = record.tcgplayer();
        match self {
            SnapshotField::MarketAvg30 => cm.and_then(|p| p.avg30),
            SnapshotField::MarketAvg7 => cm.and_then(|p| p.avg7),
            SnapshotField::MarketAvg1 => cm.and_then(|p| p.avg1),
            SnapshotField::Trend => cm.and_then(|p| p.trend_price),
            SnapshotField::ReverseHoloAvg30 => cm.and_then(|p| p.reverse_holo_avg30),
            SnapshotField::ReverseHoloAvg7 => cm.and_then(|p| p.reverse_holo_avg7),
            SnapshotField::GradedTierA => record.graded_average(GRADE_TIERS[0]),
            SnapshotField::GradedTierB => record.graded_average(GRADE_TIERS[1]),
            SnapshotField::GradedTierC => record.graded_average(GRADE_TIERS[2]),
            SnapshotField::SnapshotLow => tcg.and_then(|p| p.low),
            SnapshotField::SnapshotMarket => tcg.and_then(|p| p.market),
            SnapshotField::SnapshotHigh => tcg.and_then(|p| p.high),
        }
    }
}

fn observation(price: f64, date: DateTime<Utc>, source: &str, category: PriceCategory) -> PriceObservation {
    PriceObservation {
        price,
        date,
        source: source.to_string(),
        category,
        color: category.color().to_string(),
    }
}

/// Lay out one snapshot response as a timeline ending at `now`.
///
/// Deterministic: the same response and `now` always give the same list,
/// sorted ascending by date. Falls back to a single "current" point holding
/// the highest price when no timeline field is positive, and to an empty list
/// when the response has no price at all.
pub fn synthesize_observations(response: &PriceResponse, now: DateTime<Utc>) -> Vec<PriceObservation> {
    let Some(record) = response.first() else {
        return Vec::new();
    };

    let mut observations: Vec<PriceObservation> = SNAPSHOT_FIELDS
        .iter()
        .filter_map(|field| {
            let price = field.value(record).filter(|p| p.is_finite() && *p > 0.0)?;
            Some(observation(
                price,
                now - Duration::days(field.days_ago()),
                field.label(),
                field.category(),
            ))
        })
        .collect();

    if observations.is_empty() {
        if let Some(price) = extract_highest_price(response) {
            observations.push(observation(price, now, "Highest current price", PriceCategory::Current));
        }
    }

    observations.sort_by_key(|o| o.date);
    observations
}

// ---------------------------------------------------------------------------
// HistorySynthesizer
// ---------------------------------------------------------------------------

/// On-demand history lookups. Each call spends one request from the shared
/// budget and bypasses the current-price cache.
pub struct HistorySynthesizer<'a> {
    backend: &'a Backend,
}

impl<'a> HistorySynthesizer<'a> {
    pub fn new(backend: &'a Backend) -> Self {
        Self { backend }
    }

    /// Synthesize a history for a card identified by name, set and number.
    pub fn synthesize(&self, identity: &CardIdentity) -> Result<PriceHistory> {
        self.ensure_configured()?;
        let set_id = self.backend.mapper.to_pricing(&identity.set)?;
        let number = identity.number.trim().to_string();
        let name = identity.name.clone();
        self.fetch_and_synthesize(move |source| source.search_price(&name, &set_id, &number))
    }

    /// Synthesize a history for a card by its pricing-provider id.
    pub fn synthesize_by_id(&self, provider_card_id: &str) -> Result<PriceHistory> {
        self.ensure_configured()?;
        self.fetch_and_synthesize(|source| source.price_by_id(provider_card_id))
    }

    fn ensure_configured(&self) -> Result<()> {
        if self.backend.pricing.is_configured() {
            Ok(())
        } else {
            Err(TrackerError::NotConfigured(
                "pricing API key is not configured".to_string(),
            ))
        }
    }

    fn fetch_and_synthesize<F>(&self, fetch: F) -> Result<PriceHistory>
    where
        F: FnOnce(&dyn crate::providers::PriceSource) -> Result<PriceResponse>,
    {
        if !self.backend.limiter.try_acquire() {
            return Ok(PriceHistory::unavailable(
                "Price history unavailable - rate limit reached",
            ));
        }

        match fetch(self.backend.pricing.as_ref()) {
            Ok(response) => {
                let observations = synthesize_observations(&response, self.backend.clock.now());
                if observations.is_empty() {
                    Ok(PriceHistory::unavailable("No price data available for this card"))
                } else {
                    Ok(PriceHistory::new(observations))
                }
            }
            Err(e @ TrackerError::NotConfigured(_)) => Err(e),
            Err(e) => {
                log::warn!("Error fetching price history: {}", e);
                Ok(PriceHistory::unavailable("Price history unavailable - API error"))
            }
        }
    }
}
