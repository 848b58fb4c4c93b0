//! Per-user card portfolios.
//!
//! [`PortfolioService`] wires the price and image resolvers into the
//! add/refresh flows and persists through a [`PortfolioStore`]. Every
//! mutation is a load-modify-save cycle retried on version conflicts.

pub mod store;

pub use store::{JsonFilePortfolioStore, MemoryPortfolioStore, PortfolioStore, VersionedPortfolio};

use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::backend::Backend;
use crate::error::{Result, TrackerError};
use crate::models::{Card, CardIdentity, NewCard, PriceQuote, RefreshReport, SetRef};
use crate::numbers::validate_card_number;
use crate::queries::{ImageResolver, PriceResolver};

/// Attempts per mutation before a version conflict is returned to the caller.
pub const MAX_SAVE_ATTEMPTS: usize = 3;

/// Generate a card id of the form `{unix millis}-{9 lowercase alphanumerics}`.
pub fn generate_card_id(now: DateTime<Utc>) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("{}-{}", now.timestamp_millis(), suffix)
}

pub struct PortfolioService<'a> {
    backend: &'a Backend,
    store: &'a dyn PortfolioStore,
}

impl<'a> PortfolioService<'a> {
    pub fn new(backend: &'a Backend, store: &'a dyn PortfolioStore) -> Self {
        Self { backend, store }
    }

    pub fn list(&self, user_id: &str) -> Result<Vec<Card>> {
        Ok(self.store.load(user_id)?.cards)
    }

    /// Add a card, resolving its current price and artwork.
    ///
    /// The number is validated and stored in parsed form; the typed form is
    /// kept as `display_number`. Fails with [`TrackerError::DuplicateCard`]
    /// when the same printing is already present.
    pub fn add_card(&self, user_id: &str, new_card: NewCard) -> Result<Card> {
        let name = new_card.name.trim().to_string();
        let set = new_card.set.trim().to_string();
        if name.is_empty() || set.is_empty() {
            return Err(TrackerError::InvalidArgument(
                "Missing required fields".to_string(),
            ));
        }
        if new_card.quantity < 1 {
            return Err(TrackerError::InvalidArgument(
                "Quantity must be at least 1".to_string(),
            ));
        }
        let number = validate_card_number(&new_card.number)?;
        let display_number = new_card
            .display_number
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(new_card.number.trim())
            .to_string();

        let now = self.backend.clock.now();
        let mut card = Card {
            id: generate_card_id(now),
            name,
            set,
            number,
            display_number,
            quantity: new_card.quantity,
            current_price: None,
            image_url: None,
            date_added: now,
            last_updated: now,
        };

        // Skip provider calls for a card that is certainly a duplicate.
        let existing = self.store.load(user_id)?;
        if let Some(dup) = existing.cards.iter().find(|c| c.is_same_printing(&card)) {
            return Err(TrackerError::DuplicateCard {
                existing_id: dup.id.clone(),
            });
        }

        let identity = CardIdentity::new(&card.name, SetRef::pricing(&card.set), &card.number);
        let quote = PriceResolver::new(self.backend).resolve(&identity)?;
        if let Some(note) = &quote.note {
            log::info!("Adding {} without fresh price: {}", card.name, note);
        }
        card.current_price = quote.price;
        card.image_url =
            ImageResolver::new(self.backend).resolve(&identity, new_card.original_set_id.as_deref());

        self.mutate(user_id, |cards| {
            if let Some(dup) = cards.iter().find(|c| c.is_same_printing(&card)) {
                return Err(TrackerError::DuplicateCard {
                    existing_id: dup.id.clone(),
                });
            }
            cards.push(card.clone());
            Ok(())
        })?;

        log::info!("Added {} ({} #{}) for {}", card.name, card.set, card.number, user_id);
        Ok(card)
    }

    pub fn remove_card(&self, user_id: &str, card_id: &str) -> Result<()> {
        self.mutate(user_id, |cards| {
            let before = cards.len();
            cards.retain(|c| c.id != card_id);
            if cards.len() == before {
                Err(TrackerError::CardNotFound(card_id.to_string()))
            } else {
                Ok(())
            }
        })
    }

    pub fn update_quantity(&self, user_id: &str, card_id: &str, quantity: u32) -> Result<Card> {
        if quantity < 1 {
            return Err(TrackerError::InvalidArgument(
                "Quantity must be at least 1".to_string(),
            ));
        }
        self.mutate(user_id, |cards| {
            let card = cards
                .iter_mut()
                .find(|c| c.id == card_id)
                .ok_or_else(|| TrackerError::CardNotFound(card_id.to_string()))?;
            card.quantity = quantity;
            Ok(card.clone())
        })
    }

    /// Refresh prices for every card in the portfolio.
    ///
    /// Only cards whose cached price is missing or stale, or whose own
    /// `last_updated` is older than the cache duration, are fetched, and only
    /// while the budget allows. The rest take the cached price if there is
    /// one. A known price is never replaced by a missing one: a failed,
    /// unavailable or empty fetch keeps the card's previous price.
    pub fn refresh_prices(&self, user_id: &str) -> Result<RefreshReport> {
        let prices = PriceResolver::new(self.backend);

        let (updated, skipped, portfolio) = self.mutate(user_id, |cards| {
            let now = self.backend.clock.now();
            let mut updated = 0;
            let mut skipped = 0;

            for card in cards.iter_mut() {
                if prices.needs_refresh(card) && self.backend.limiter.can_proceed() {
                    match prices.resolve(&card.identity()) {
                        Ok(PriceQuote {
                            price: Some(price), ..
                        }) => {
                            card.current_price = Some(price);
                            card.last_updated = now;
                            updated += 1;
                            continue;
                        }
                        Ok(quote) => {
                            log::warn!(
                                "Keeping previous price for {}: {}",
                                card.name,
                                quote.note.as_deref().unwrap_or("no price in response")
                            );
                        }
                        Err(e) => {
                            log::warn!("Error updating price for {}: {}", card.name, e);
                        }
                    }
                } else if let Some(price) = prices.cached(card).and_then(|hit| hit.value) {
                    card.current_price = Some(price);
                    card.last_updated = now;
                }
                skipped += 1;
            }

            Ok((updated, skipped, cards.clone()))
        })?;

        log::info!("Updated {} cards, skipped {} cards", updated, skipped);
        Ok(RefreshReport {
            updated,
            skipped,
            portfolio,
            usage: self.backend.usage(),
        })
    }

    /// Load, apply `f`, save; retried from a fresh load on version conflict.
    fn mutate<T, F>(&self, user_id: &str, mut f: F) -> Result<T>
    where
        F: FnMut(&mut Vec<Card>) -> Result<T>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let VersionedPortfolio { version, mut cards } = self.store.load(user_id)?;
            let out = f(&mut cards)?;
            match self.store.save(user_id, &cards, version) {
                Ok(_) => return Ok(out),
                Err(TrackerError::VersionConflict { .. }) if attempt < MAX_SAVE_ATTEMPTS => {
                    log::warn!(
                        "Portfolio for {} changed during update, retrying ({}/{})",
                        user_id,
                        attempt,
                        MAX_SAVE_ATTEMPTS
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }
}
