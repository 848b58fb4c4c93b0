//! Upstream data providers.
//!
//! Resolvers talk to the outside world only through [`PriceSource`] and
//! [`ArtworkSource`]; the HTTP implementations live in [`pricing`] and
//! [`artwork`].

pub mod artwork;
pub mod pricing;

pub use artwork::{construct_image_url, ArtworkClient};
pub use pricing::PricingClient;

use crate::error::Result;
use crate::models::{ArtworkCard, PriceResponse, SetInfo};

/// Market price lookups against the pricing provider.
pub trait PriceSource: Send + Sync {
    /// Whether credentials are present. Unconfigured sources are never called.
    fn is_configured(&self) -> bool {
        true
    }

    /// `GET /prices?name&setId&number&limit=1`
    fn search_price(&self, name: &str, set_id: &str, number: &str) -> Result<PriceResponse>;

    /// `GET /prices?id=<providerCardId>`
    fn price_by_id(&self, provider_card_id: &str) -> Result<PriceResponse>;

    /// `GET /sets`
    fn list_sets(&self) -> Result<Vec<SetInfo>>;
}

/// Card artwork lookups against the artwork provider.
pub trait ArtworkSource: Send + Sync {
    /// Look up one card by composite `setId-number` id. `Ok(None)` means the
    /// provider has no such card.
    fn card(&self, card_id: &str) -> Result<Option<ArtworkCard>>;

    /// Cards whose name contains `query`, sorted by name.
    fn search(&self, query: &str, page: u32, per_page: u32) -> Result<Vec<ArtworkCard>>;
}
