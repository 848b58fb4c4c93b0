//! Artwork resolution with fallback card-id formats.

use lazy_static::lazy_static;
use regex::Regex;

use crate::backend::Backend;
use crate::cache::image_cache_key;
use crate::error::Result;
use crate::models::{CardIdentity, ImageFormat, ImageQuality};
use crate::numbers::{is_numeric, zero_pad};
use crate::providers::construct_image_url;

lazy_static! {
    static ref PREFIXED_ALPHA: Regex = Regex::new(r"^[A-Z]+\d+$").unwrap();
}

/// Primary artwork card id: numeric numbers are padded to three digits,
/// letter-prefixed ones ("TG20") are lowercased.
pub fn primary_card_id(set_id: &str, number: &str) -> String {
    let number = number.trim();
    if number.starts_with("TG") || PREFIXED_ALPHA.is_match(number) {
        format!("{}-{}", set_id, number.to_lowercase())
    } else if is_numeric(number) {
        format!("{}-{}", set_id, zero_pad(number, 3))
    } else {
        format!("{}-{}", set_id, number)
    }
}

/// Fallback ids in the order they are tried: unpadded, lowercased, padded to
/// two digits, padded to three. Duplicates and the primary id are removed.
pub fn alternative_card_ids(set_id: &str, number: &str) -> Vec<String> {
    let number = number.trim();
    let primary = primary_card_id(set_id, number);
    let formats = [
        number.to_string(),
        number.to_lowercase(),
        zero_pad(number, 2),
        zero_pad(number, 3),
    ];

    let mut ids: Vec<String> = Vec::with_capacity(formats.len());
    for format in formats {
        let id = format!("{}-{}", set_id, format);
        if id != primary && !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

/// Resolves high-resolution artwork URLs for cards.
pub struct ImageResolver<'a> {
    backend: &'a Backend,
}

impl<'a> ImageResolver<'a> {
    pub fn new(backend: &'a Backend) -> Self {
        Self { backend }
    }

    /// Resolve artwork for `identity`.
    ///
    /// `artwork_set` is the artwork-vocabulary set id when the caller already
    /// knows it (e.g. carried over from search); otherwise it is derived from
    /// the identity's set. An exhausted budget or a provider error serves the
    /// last cached URL, fresh or not. An unmappable set or a card the
    /// provider does not know yields `None`.
    pub fn resolve(&self, identity: &CardIdentity, artwork_set: Option<&str>) -> Option<String> {
        let set_id = match artwork_set.map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) => id.to_string(),
            None => match self.backend.mapper.to_artwork(&identity.set) {
                Ok(id) => id,
                Err(e) => {
                    log::info!("No artwork set for {}: {}", identity.name, e);
                    return None;
                }
            },
        };
        let number = identity.number.trim();
        let key = image_cache_key(&identity.name, &set_id, number);

        if let Some(url) = self.backend.image_cache.get_fresh(&key) {
            log::debug!("Image cache hit for {}", key);
            return Some(url);
        }

        // Artwork lookups are not metered but still back off when the
        // shared budget is spent.
        if !self.backend.limiter.can_proceed() {
            log::warn!("Rate limit reached, skipping image lookup for {}", key);
            return self.stale(&key);
        }

        let primary = primary_card_id(&set_id, number);
        let candidates =
            std::iter::once(primary).chain(alternative_card_ids(&set_id, number));
        let mut failed = false;
        for card_id in candidates {
            match self.lookup(&card_id) {
                Ok(Some(url)) => {
                    self.backend.image_cache.insert(&key, url.clone());
                    return Some(url);
                }
                Ok(None) => {}
                Err(e) => {
                    log::debug!("Artwork lookup failed for {}: {}", card_id, e);
                    failed = true;
                }
            }
        }

        if failed {
            log::warn!("Artwork provider error for {}", key);
            return self.stale(&key);
        }
        log::info!("No artwork found for {} ({})", identity.name, key);
        None
    }

    fn stale(&self, key: &str) -> Option<String> {
        let hit = self.backend.image_cache.get(key)?;
        log::info!("Using cached image for {}", key);
        Some(hit.value)
    }

    fn lookup(&self, card_id: &str) -> Result<Option<String>> {
        let card = self.backend.artwork.card(card_id)?;
        Ok(card
            .and_then(|c| c.image)
            .and_then(|base| construct_image_url(&base, ImageQuality::High, ImageFormat::Png)))
    }
}
