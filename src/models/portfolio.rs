use serde::Serialize;

use crate::models::Card;
use crate::rate_limit::RateLimitSnapshot;

// ---------------------------------------------------------------------------
// UsageStats — API budget and cache occupancy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStats {
    #[serde(flatten)]
    pub rate_limit: RateLimitSnapshot,
    pub price_cache_size: usize,
    pub image_cache_size: usize,
}

// ---------------------------------------------------------------------------
// RefreshReport — Outcome of a portfolio-wide price refresh
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshReport {
    /// Cards whose price was fetched from the provider.
    pub updated: usize,
    /// Cards that kept their cached price.
    pub skipped: usize,
    pub portfolio: Vec<Card>,
    pub usage: UsageStats,
}

impl RefreshReport {
    pub fn message(&self) -> String {
        format!(
            "Updated {} cards, {} used cached prices",
            self.updated, self.skipped
        )
    }
}
