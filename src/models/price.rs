use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PriceResponse — Pricing provider payload (`GET /prices`)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceResponse {
    #[serde(default)]
    pub data: Vec<PriceRecord>,
}

impl PriceResponse {
    /// The single card record the provider returned, if any.
    pub fn first(&self) -> Option<&PriceRecord> {
        self.data.first()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub set_id: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub tcg_player: Option<TcgPlayerGroup>,
    #[serde(default)]
    pub cardmarket: Option<CardmarketGroup>,
    #[serde(default)]
    pub ebay: Option<EbayGroup>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TcgPlayerGroup {
    #[serde(default)]
    pub prices: TcgPlayerPrices,
}

/// Marketplace snapshot prices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TcgPlayerPrices {
    pub market: Option<f64>,
    pub mid: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardmarketGroup {
    #[serde(default)]
    pub prices: CardmarketPrices,
}

/// Marketplace time-windowed averages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardmarketPrices {
    pub average_price: Option<f64>,
    pub trend_price: Option<f64>,
    pub low_price: Option<f64>,
    pub avg1: Option<f64>,
    pub avg7: Option<f64>,
    pub avg30: Option<f64>,
    pub reverse_holo_avg1: Option<f64>,
    pub reverse_holo_avg7: Option<f64>,
    pub reverse_holo_avg30: Option<f64>,
    pub reverse_holo_trend: Option<f64>,
}

/// Graded-sale aggregates keyed by grade ("psa10", "psa9", ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EbayGroup {
    #[serde(default)]
    pub prices: BTreeMap<String, GradeData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GradeData {
    #[serde(default)]
    pub stats: Option<GradeStats>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GradeStats {
    pub average: Option<f64>,
    #[serde(default)]
    pub count: Option<u32>,
}

impl PriceRecord {
    pub fn tcgplayer(&self) -> Option<&TcgPlayerPrices> {
        self.tcg_player.as_ref().map(|g| &g.prices)
    }

    pub fn cardmarket(&self) -> Option<&CardmarketPrices> {
        self.cardmarket.as_ref().map(|g| &g.prices)
    }

    /// Average sale price for one grade, if reported.
    pub fn graded_average(&self, grade: &str) -> Option<f64> {
        self.ebay
            .as_ref()
            .and_then(|e| e.prices.get(grade))
            .and_then(|g| g.stats.as_ref())
            .and_then(|s| s.average)
    }

    /// Every numeric price field in the record, present or not.
    pub fn all_price_fields(&self) -> Vec<Option<f64>> {
        let mut fields = Vec::new();
        if let Some(ebay) = &self.ebay {
            fields.extend(
                ebay.prices
                    .values()
                    .map(|g| g.stats.as_ref().and_then(|s| s.average)),
            );
        }
        if let Some(tcg) = self.tcgplayer() {
            fields.extend([tcg.market, tcg.mid, tcg.high, tcg.low]);
        }
        if let Some(cm) = self.cardmarket() {
            fields.extend([
                cm.average_price,
                cm.trend_price,
                cm.low_price,
                cm.avg1,
                cm.avg7,
                cm.avg30,
                cm.reverse_holo_avg1,
                cm.reverse_holo_avg7,
                cm.reverse_holo_avg30,
                cm.reverse_holo_trend,
            ]);
        }
        fields
    }
}

// ---------------------------------------------------------------------------
// PriceQuote — Result of resolving a card's current price
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuoteSource {
    /// Fresh cache entry; no upstream call was made.
    Cache,
    /// Fetched from the pricing provider during this request.
    Upstream,
    /// Last known value served while the provider was unavailable.
    StaleCache,
    /// Nothing to serve.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// `None` means "not available"; it is never replaced by zero or a guess.
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub source: QuoteSource,
}

impl PriceQuote {
    pub fn is_cached(&self) -> bool {
        matches!(self.source, QuoteSource::Cache | QuoteSource::StaleCache)
    }
}

// ---------------------------------------------------------------------------
// PriceObservation / PriceHistory — Synthetic timeline
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriceCategory {
    Historical,
    Recent,
    Current,
    Trend,
    ReverseHolo,
    Graded,
    Tcgplayer,
}

impl PriceCategory {
    /// Chart color hint for this category.
    pub fn color(self) -> &'static str {
        match self {
            PriceCategory::Historical => "#6c757d",
            PriceCategory::Recent => "#0d6efd",
            PriceCategory::Current => "#198754",
            PriceCategory::Trend => "#fd7e14",
            PriceCategory::ReverseHolo => "#6f42c1",
            PriceCategory::Graded => "#dc3545",
            PriceCategory::Tcgplayer => "#20c997",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub price: f64,
    pub date: DateTime<Utc>,
    pub source: String,
    pub category: PriceCategory,
    pub color: String,
}

/// A cross-sectional snapshot laid out as a timeline.
///
/// The dates are assigned offsets, not observation times; `synthetic` is
/// always `true` so consumers never mistake this for tracked history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub synthetic: bool,
    pub observations: Vec<PriceObservation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl PriceHistory {
    pub fn new(observations: Vec<PriceObservation>) -> Self {
        Self {
            synthetic: true,
            observations,
            note: None,
        }
    }

    pub fn unavailable(note: impl Into<String>) -> Self {
        Self {
            synthetic: true,
            observations: Vec::new(),
            note: Some(note.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}
