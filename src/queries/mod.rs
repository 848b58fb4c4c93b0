//! Query modules.
//!
//! Each module provides a query struct that borrows the shared
//! [`Backend`](crate::backend::Backend) and exposes one concern: current
//! prices, synthetic history, artwork, the set catalog, or card search.

pub mod history;
pub mod images;
pub mod prices;
pub mod search;
pub mod sets;

pub use history::{synthesize_observations, HistorySynthesizer, SnapshotField};
pub use images::{alternative_card_ids, primary_card_id, ImageResolver};
pub use prices::{extract_highest_price, PriceResolver};
pub use search::SearchQuery;
pub use sets::SetQuery;
