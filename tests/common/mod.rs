//! Shared test fixtures for the pokevault integration tests.
//!
//! Provides in-process fake providers that count calls and record which card
//! ids were tried, a fixed-start [`ManualClock`], and `tracker()` which wires
//! them into a [`PriceTracker`] with no on-disk state.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use pokevault::providers::{ArtworkSource, PriceSource};
use pokevault::{ArtworkCard, ManualClock, PriceResponse, PriceTracker, Result, SetInfo, TrackerError};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 2024-03-15 12:00:00 UTC.
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
}

pub fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(start_time()))
}

/// Parse a pricing-provider body into a response.
pub fn price_response(body: serde_json::Value) -> PriceResponse {
    serde_json::from_value(body).unwrap()
}

/// A response carrying only a marketplace market price.
pub fn market_only(price: f64) -> PriceResponse {
    price_response(serde_json::json!({
        "data": [{ "tcgPlayer": { "prices": { "market": price } } }]
    }))
}

fn price_key(name: &str, set_id: &str, number: &str) -> String {
    format!("{}|{}|{}", name, set_id, number).to_lowercase()
}

// ---------------------------------------------------------------------------
// FakePriceSource
// ---------------------------------------------------------------------------

pub struct FakePriceSource {
    configured: bool,
    failing: AtomicBool,
    calls: AtomicUsize,
    prices: Mutex<HashMap<String, PriceResponse>>,
    by_id: Mutex<HashMap<String, PriceResponse>>,
    sets: Mutex<Vec<SetInfo>>,
}

impl FakePriceSource {
    pub fn new() -> Self {
        Self {
            configured: true,
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            prices: Mutex::new(HashMap::new()),
            by_id: Mutex::new(HashMap::new()),
            sets: Mutex::new(Vec::new()),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    pub fn with_price(self, name: &str, set_id: &str, number: &str, response: PriceResponse) -> Self {
        self.set_price(name, set_id, number, response);
        self
    }

    pub fn set_price(&self, name: &str, set_id: &str, number: &str, response: PriceResponse) {
        self.prices
            .lock()
            .unwrap()
            .insert(price_key(name, set_id, number), response);
    }

    pub fn with_id(self, id: &str, response: PriceResponse) -> Self {
        self.by_id.lock().unwrap().insert(id.to_string(), response);
        self
    }

    pub fn with_sets(self, sets: Vec<SetInfo>) -> Self {
        *self.sets.lock().unwrap() = sets;
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn begin(&self, url: &str) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(TrackerError::UpstreamStatus {
                status: 503,
                url: url.to_string(),
            });
        }
        Ok(())
    }
}

impl PriceSource for FakePriceSource {
    fn is_configured(&self) -> bool {
        self.configured
    }

    fn search_price(&self, name: &str, set_id: &str, number: &str) -> Result<PriceResponse> {
        self.begin("/prices")?;
        Ok(self
            .prices
            .lock()
            .unwrap()
            .get(&price_key(name, set_id, number))
            .cloned()
            .unwrap_or_default())
    }

    fn price_by_id(&self, provider_card_id: &str) -> Result<PriceResponse> {
        self.begin("/prices")?;
        Ok(self
            .by_id
            .lock()
            .unwrap()
            .get(provider_card_id)
            .cloned()
            .unwrap_or_default())
    }

    fn list_sets(&self) -> Result<Vec<SetInfo>> {
        self.begin("/sets")?;
        Ok(self.sets.lock().unwrap().clone())
    }
}

// ---------------------------------------------------------------------------
// FakeArtworkSource
// ---------------------------------------------------------------------------

pub struct FakeArtworkSource {
    cards: Mutex<HashMap<String, ArtworkCard>>,
    search_results: Mutex<Vec<ArtworkCard>>,
    failing: AtomicBool,
    tried: Mutex<Vec<String>>,
}

impl FakeArtworkSource {
    pub fn new() -> Self {
        Self {
            cards: Mutex::new(HashMap::new()),
            search_results: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
            tried: Mutex::new(Vec::new()),
        }
    }

    /// Register a card whose image base is `https://assets.example/{set}/{number}`.
    pub fn with_card(self, card_id: &str) -> Self {
        let (set, number) = card_id.rsplit_once('-').unwrap();
        let card = ArtworkCard {
            id: card_id.to_string(),
            local_id: Some(number.to_string()),
            name: "Test Card".to_string(),
            image: Some(format!("https://assets.example/{}/{}", set, number)),
        };
        self.cards.lock().unwrap().insert(card_id.to_string(), card);
        self
    }

    pub fn with_search_results(self, results: Vec<ArtworkCard>) -> Self {
        *self.search_results.lock().unwrap() = results;
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Card ids looked up so far, in order.
    pub fn tried(&self) -> Vec<String> {
        self.tried.lock().unwrap().clone()
    }
}

impl ArtworkSource for FakeArtworkSource {
    fn card(&self, card_id: &str) -> Result<Option<ArtworkCard>> {
        self.tried.lock().unwrap().push(card_id.to_string());
        if self.failing.load(Ordering::SeqCst) {
            return Err(TrackerError::UpstreamStatus {
                status: 500,
                url: format!("/cards/{}", card_id),
            });
        }
        Ok(self.cards.lock().unwrap().get(card_id).cloned())
    }

    fn search(&self, _query: &str, _page: u32, _per_page: u32) -> Result<Vec<ArtworkCard>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TrackerError::UpstreamStatus {
                status: 500,
                url: "/cards".to_string(),
            });
        }
        Ok(self.search_results.lock().unwrap().clone())
    }
}

// ---------------------------------------------------------------------------
// Tracker wiring
// ---------------------------------------------------------------------------

pub struct Fixture {
    pub tracker: PriceTracker,
    pub pricing: Arc<FakePriceSource>,
    pub artwork: Arc<FakeArtworkSource>,
    pub clock: Arc<ManualClock>,
}

pub fn tracker(pricing: FakePriceSource, artwork: FakeArtworkSource) -> Fixture {
    tracker_with_limits(pricing, artwork, 200, 60)
}

pub fn tracker_with_limits(
    pricing: FakePriceSource,
    artwork: FakeArtworkSource,
    daily: u32,
    per_minute: u32,
) -> Fixture {
    init_logging();
    let pricing = Arc::new(pricing);
    let artwork = Arc::new(artwork);
    let clock = manual_clock();
    let tracker = PriceTracker::builder()
        .in_memory()
        .limits(daily, per_minute)
        .clock(clock.clone())
        .price_source(pricing.clone())
        .artwork_source(artwork.clone())
        .build()
        .unwrap();
    Fixture {
        tracker,
        pricing,
        artwork,
        clock,
    }
}
