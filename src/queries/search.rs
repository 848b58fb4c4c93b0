//! Card-name search against the artwork provider.

use crate::backend::Backend;
use crate::models::{ArtworkCard, CardSuggestion, ImageFormat, ImageQuality, SetVocabulary};
use crate::providers::construct_image_url;

/// Shortest query that reaches the provider.
pub const MIN_QUERY_LEN: usize = 2;
/// Suggestions returned per search.
pub const SEARCH_PAGE_SIZE: u32 = 20;

pub struct SearchQuery<'a> {
    backend: &'a Backend,
}

impl<'a> SearchQuery<'a> {
    pub fn new(backend: &'a Backend) -> Self {
        Self { backend }
    }

    /// Suggestions for cards whose name contains `query`, sorted by name.
    ///
    /// Short queries and provider failures both yield an empty list.
    pub fn cards(&self, query: &str) -> Vec<CardSuggestion> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }

        let results = match self.backend.artwork.search(query, 1, SEARCH_PAGE_SIZE) {
            Ok(results) => results,
            Err(e) => {
                log::warn!("Error searching cards for '{}': {}", query, e);
                return Vec::new();
            }
        };

        results.iter().map(|card| self.suggestion(card)).collect()
    }

    fn suggestion(&self, card: &ArtworkCard) -> CardSuggestion {
        let set_id = card.set_id().to_string();
        let number = card.local_id.clone().unwrap_or_else(|| {
            card.id
                .rsplit_once('-')
                .map(|(_, n)| n.to_string())
                .unwrap_or_default()
        });
        let set_name = self
            .backend
            .mapper
            .map_set_id(&set_id, SetVocabulary::Artwork, SetVocabulary::Display)
            .unwrap_or_else(|| set_id.clone());

        CardSuggestion {
            display_text: format!("{} - {} #{}", card.name, set_id, number),
            image_url: self.thumbnail(card),
            id: card.id.clone(),
            name: card.name.clone(),
            set: set_id,
            set_name,
            number,
        }
    }

    /// Low-quality webp thumbnail. List results may omit the image, in which
    /// case the full card is fetched.
    fn thumbnail(&self, card: &ArtworkCard) -> Option<String> {
        let image = match &card.image {
            Some(image) => Some(image.clone()),
            None => match self.backend.artwork.card(&card.id) {
                Ok(full) => full.and_then(|c| c.image),
                Err(e) => {
                    log::debug!("Error getting card details for {}: {}", card.id, e);
                    None
                }
            },
        };
        image.and_then(|base| construct_image_url(&base, ImageQuality::Low, ImageFormat::Webp))
    }
}
