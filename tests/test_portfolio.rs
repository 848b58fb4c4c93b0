//! Portfolio service and store tests.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Duration;
use pokevault::portfolio::{generate_card_id, VersionedPortfolio};
use pokevault::{
    Card, JsonFilePortfolioStore, MemoryPortfolioStore, NewCard, PortfolioStore, PriceResponse,
    Result, TrackerError,
};

use common::{market_only, FakeArtworkSource, FakePriceSource};

fn new_card(name: &str, set: &str, number: &str) -> NewCard {
    NewCard {
        name: name.to_string(),
        set: set.to_string(),
        number: number.to_string(),
        quantity: 1,
        display_number: None,
        original_set_id: None,
    }
}

fn charizard_fixture() -> common::Fixture {
    let pricing = FakePriceSource::new().with_price("Charizard", "base1", "4", market_only(350.0));
    let artwork = FakeArtworkSource::new().with_card("base1-004");
    common::tracker(pricing, artwork)
}

// ---------------------------------------------------------------------------
// add_card
// ---------------------------------------------------------------------------

#[test]
fn add_card_resolves_price_and_image() {
    let fx = charizard_fixture();
    let store = MemoryPortfolioStore::new();
    let portfolio = fx.tracker.portfolio(&store);

    let card = portfolio.add_card("ash", new_card("Charizard", "base1", "4/102")).unwrap();
    assert_eq!(card.number, "4");
    assert_eq!(card.display_number, "4/102");
    assert_eq!(card.current_price, Some(350.0));
    assert_eq!(
        card.image_url.as_deref(),
        Some("https://assets.example/base1/004/high.png")
    );
    assert_eq!(card.date_added, common::start_time());
    assert_eq!(portfolio.list("ash").unwrap(), vec![card]);
}

#[test]
fn add_card_uses_original_artwork_set() {
    let pricing = FakePriceSource::new().with_price("Pikachu", "sv1", "63", market_only(0.5));
    let artwork = FakeArtworkSource::new().with_card("custom-063");
    let fx = common::tracker(pricing, artwork);
    let store = MemoryPortfolioStore::new();

    let mut input = new_card("Pikachu", "sv1", "63");
    input.original_set_id = Some("custom".to_string());
    let card = fx.tracker.portfolio(&store).add_card("ash", input).unwrap();

    assert!(card.image_url.is_some());
    assert_eq!(fx.artwork.tried(), vec!["custom-063"]);
}

#[test]
fn duplicate_add_is_rejected_with_existing_id() {
    let fx = charizard_fixture();
    let store = MemoryPortfolioStore::new();
    let portfolio = fx.tracker.portfolio(&store);

    let first = portfolio.add_card("ash", new_card("Charizard", "base1", "4/102")).unwrap();
    let calls = fx.pricing.calls();

    // Same printing entered with a different name case and number form.
    let err = portfolio
        .add_card("ash", new_card("  charizard ", "base1", "4"))
        .unwrap_err();
    match err {
        TrackerError::DuplicateCard { existing_id } => assert_eq!(existing_id, first.id),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(fx.pricing.calls(), calls);
    assert_eq!(portfolio.list("ash").unwrap().len(), 1);
}

#[test]
fn same_card_in_another_portfolio_is_allowed() {
    let fx = charizard_fixture();
    let store = MemoryPortfolioStore::new();
    let portfolio = fx.tracker.portfolio(&store);

    portfolio.add_card("ash", new_card("Charizard", "base1", "4")).unwrap();
    portfolio.add_card("misty", new_card("Charizard", "base1", "4")).unwrap();
    assert_eq!(portfolio.list("misty").unwrap().len(), 1);
}

#[test]
fn add_card_validates_input() {
    let fx = charizard_fixture();
    let store = MemoryPortfolioStore::new();
    let portfolio = fx.tracker.portfolio(&store);

    let bad_number = portfolio.add_card("ash", new_card("Charizard", "base1", "4 / 1 0 2"));
    assert!(matches!(bad_number, Err(TrackerError::InvalidArgument(_))));

    let mut zero = new_card("Charizard", "base1", "4");
    zero.quantity = 0;
    assert!(matches!(
        portfolio.add_card("ash", zero),
        Err(TrackerError::InvalidArgument(_))
    ));
    assert_eq!(fx.pricing.calls(), 0);
}

#[test]
fn add_card_keeps_null_price_when_rate_limited() {
    let pricing = FakePriceSource::new().with_price("Charizard", "base1", "4", market_only(350.0));
    let fx = common::tracker_with_limits(pricing, FakeArtworkSource::new(), 0, 60);
    let store = MemoryPortfolioStore::new();

    let card = fx
        .tracker
        .portfolio(&store)
        .add_card("ash", new_card("Charizard", "base1", "4"))
        .unwrap();
    assert_eq!(card.current_price, None);
    assert_eq!(card.image_url, None);
}

// ---------------------------------------------------------------------------
// remove / update quantity
// ---------------------------------------------------------------------------

#[test]
fn remove_and_update_quantity() {
    let fx = charizard_fixture();
    let store = MemoryPortfolioStore::new();
    let portfolio = fx.tracker.portfolio(&store);
    let card = portfolio.add_card("ash", new_card("Charizard", "base1", "4")).unwrap();

    let updated = portfolio.update_quantity("ash", &card.id, 3).unwrap();
    assert_eq!(updated.quantity, 3);
    assert!(matches!(
        portfolio.update_quantity("ash", &card.id, 0),
        Err(TrackerError::InvalidArgument(_))
    ));
    assert!(matches!(
        portfolio.update_quantity("ash", "nope", 2),
        Err(TrackerError::CardNotFound(_))
    ));

    portfolio.remove_card("ash", &card.id).unwrap();
    assert!(portfolio.list("ash").unwrap().is_empty());
    assert!(matches!(
        portfolio.remove_card("ash", &card.id),
        Err(TrackerError::CardNotFound(_))
    ));
}

// ---------------------------------------------------------------------------
// refresh_prices
// ---------------------------------------------------------------------------

#[test]
fn refresh_skips_fresh_cards_and_updates_stale_ones() {
    let fx = charizard_fixture();
    let store = MemoryPortfolioStore::new();
    let portfolio = fx.tracker.portfolio(&store);
    portfolio.add_card("ash", new_card("Charizard", "base1", "4")).unwrap();

    let report = portfolio.refresh_prices("ash").unwrap();
    assert_eq!((report.updated, report.skipped), (0, 1));
    assert_eq!(fx.pricing.calls(), 1);

    fx.pricing.set_price("Charizard", "base1", "4", market_only(375.0));
    fx.clock.advance(Duration::hours(2));
    let report = portfolio.refresh_prices("ash").unwrap();
    assert_eq!((report.updated, report.skipped), (1, 0));
    assert_eq!(report.portfolio[0].current_price, Some(375.0));
    assert_eq!(report.portfolio[0].last_updated, common::start_time() + Duration::hours(2));
    assert_eq!(report.usage.rate_limit.calls_today, 2);
    assert_eq!(report.message(), "Updated 1 cards, 0 used cached prices");
}

#[test]
fn refresh_keeps_previous_price_on_failure() {
    let fx = charizard_fixture();
    let store = MemoryPortfolioStore::new();
    let portfolio = fx.tracker.portfolio(&store);
    portfolio.add_card("ash", new_card("Charizard", "base1", "4")).unwrap();

    fx.clock.advance(Duration::hours(2));
    fx.tracker.clear_caches();
    fx.pricing.set_failing(true);

    let report = portfolio.refresh_prices("ash").unwrap();
    assert_eq!((report.updated, report.skipped), (0, 1));
    assert_eq!(report.portfolio[0].current_price, Some(350.0));
}

#[test]
fn refresh_keeps_previous_price_when_response_has_no_price() {
    let fx = charizard_fixture();
    let store = MemoryPortfolioStore::new();
    let portfolio = fx.tracker.portfolio(&store);
    portfolio.add_card("ash", new_card("Charizard", "base1", "4")).unwrap();

    fx.pricing
        .set_price("Charizard", "base1", "4", PriceResponse::default());
    fx.clock.advance(Duration::hours(2));

    let report = portfolio.refresh_prices("ash").unwrap();
    assert_eq!((report.updated, report.skipped), (0, 1));
    assert_eq!(report.portfolio[0].current_price, Some(350.0));
    assert_eq!(report.portfolio[0].last_updated, common::start_time());

    // The empty answer is now cached; serving it must not erase the price.
    let report = portfolio.refresh_prices("ash").unwrap();
    assert_eq!((report.updated, report.skipped), (0, 1));
    assert_eq!(report.portfolio[0].current_price, Some(350.0));
}

// ---------------------------------------------------------------------------
// Optimistic concurrency
// ---------------------------------------------------------------------------

/// Store that reports a conflict on the first `conflicts` saves.
struct ConflictingStore {
    inner: MemoryPortfolioStore,
    conflicts: AtomicUsize,
    saves: AtomicUsize,
}

impl ConflictingStore {
    fn new(conflicts: usize) -> Self {
        Self {
            inner: MemoryPortfolioStore::new(),
            conflicts: AtomicUsize::new(conflicts),
            saves: AtomicUsize::new(0),
        }
    }
}

impl PortfolioStore for ConflictingStore {
    fn load(&self, user_id: &str) -> Result<VersionedPortfolio> {
        self.inner.load(user_id)
    }

    fn save(&self, user_id: &str, cards: &[Card], expected_version: u64) -> Result<u64> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.conflicts.load(Ordering::SeqCst) > 0 {
            self.conflicts.fetch_sub(1, Ordering::SeqCst);
            return Err(TrackerError::VersionConflict {
                user_id: user_id.to_string(),
                expected: expected_version,
            });
        }
        self.inner.save(user_id, cards, expected_version)
    }
}

#[test]
fn conflicts_are_retried() {
    let fx = charizard_fixture();
    let store = ConflictingStore::new(2);

    fx.tracker
        .portfolio(&store)
        .add_card("ash", new_card("Charizard", "base1", "4"))
        .unwrap();
    assert_eq!(store.saves.load(Ordering::SeqCst), 3);
    assert_eq!(store.inner.load("ash").unwrap().cards.len(), 1);
}

#[test]
fn persistent_conflict_is_returned() {
    let fx = charizard_fixture();
    let store = ConflictingStore::new(10);

    let err = fx
        .tracker
        .portfolio(&store)
        .add_card("ash", new_card("Charizard", "base1", "4"))
        .unwrap_err();
    assert!(matches!(err, TrackerError::VersionConflict { .. }));
    assert_eq!(store.saves.load(Ordering::SeqCst), 3);
}

#[test]
fn stale_version_is_rejected_by_stores() {
    let tmp = tempfile::tempdir().unwrap();
    let stores: Vec<Box<dyn PortfolioStore>> = vec![
        Box::new(MemoryPortfolioStore::new()),
        Box::new(JsonFilePortfolioStore::new(tmp.path().join("portfolios.json"))),
    ];

    for store in stores {
        assert_eq!(store.load("ash").unwrap(), VersionedPortfolio::default());
        assert_eq!(store.save("ash", &[], 0).unwrap(), 1);
        assert!(matches!(
            store.save("ash", &[], 0),
            Err(TrackerError::VersionConflict { expected: 0, .. })
        ));
        assert_eq!(store.save("ash", &[], 1).unwrap(), 2);
    }
}

#[test]
fn json_store_survives_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("nested").join("portfolios.json");
    let fx = charizard_fixture();

    {
        let store = JsonFilePortfolioStore::new(&path);
        fx.tracker
            .portfolio(&store)
            .add_card("ash", new_card("Charizard", "base1", "4"))
            .unwrap();
    }

    let reopened = JsonFilePortfolioStore::new(&path);
    let loaded = reopened.load("ash").unwrap();
    assert_eq!(loaded.version, 1);
    assert_eq!(loaded.cards[0].name, "Charizard");
}

#[test]
fn json_store_in_dir_uses_default_file_name() {
    let tmp = tempfile::tempdir().unwrap();
    let store = JsonFilePortfolioStore::in_dir(tmp.path());
    assert_eq!(store.path(), tmp.path().join("portfolios.json"));

    assert_eq!(store.load("misty").unwrap(), VersionedPortfolio::default());
    store.save("misty", &[], 0).unwrap();
    assert!(store.path().exists());
}

// ---------------------------------------------------------------------------
// Card ids
// ---------------------------------------------------------------------------

#[test]
fn card_ids_are_millis_and_random_suffix() {
    let now = common::start_time();
    let a = generate_card_id(now);
    let b = generate_card_id(now);

    let (millis, suffix) = a.split_once('-').unwrap();
    assert_eq!(millis, now.timestamp_millis().to_string());
    assert_eq!(suffix.len(), 9);
    assert!(suffix.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    assert_ne!(a, b);
}
