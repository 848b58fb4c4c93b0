use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const PRICING_API_BASE: &str = "https://www.pokemonpricetracker.com/api/v1";
pub const ARTWORK_API_BASE: &str = "https://api.tcgdex.net/v2/en";

/// Environment variable checked first for the pricing API key.
pub const API_KEY_ENV: &str = "POKEMON_API_KEY";
/// Fallback file (relative to the working directory) holding the API key.
pub const API_KEY_FILE: &str = "api.txt";

/// Freshness window for price and image cache entries.
pub const CACHE_DURATION: Duration = Duration::from_secs(60 * 60);
/// Maximum age of the on-disk set catalog before it is re-fetched.
pub const SETS_CACHE_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);
pub const SETS_CACHE_FILE: &str = "sets-cache.json";
pub const PORTFOLIO_FILE: &str = "portfolios.json";

pub const DAILY_LIMIT: u32 = 200;
pub const MINUTE_LIMIT: u32 = 60;
pub const MINUTE_WINDOW: Duration = Duration::from_secs(60);

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Entries older than this many cache durations are swept.
pub const CACHE_RETENTION_FACTOR: u32 = 24;
/// Cache size above which an insert triggers a sweep.
pub const CACHE_SWEEP_THRESHOLD: usize = 10_000;

pub const USER_AGENT: &str = "PokeVault/0.1";

pub fn default_data_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("pokevault")
    } else {
        PathBuf::from(".pokevault-cache")
    }
}

/// Load the pricing API key.
///
/// Checks the `POKEMON_API_KEY` environment variable first (deployments), then
/// falls back to `api.txt` in the working directory (local development).
/// Returns `None` when neither yields a non-empty key.
pub fn load_api_key() -> Option<String> {
    if let Ok(key) = std::env::var(API_KEY_ENV) {
        let key = key.trim().to_string();
        if !key.is_empty() {
            log::info!("API key loaded from environment variable");
            return Some(key);
        }
    }
    load_api_key_from(Path::new(API_KEY_FILE))
}

/// Read and trim an API key from `path`; missing or blank files yield `None`.
pub fn load_api_key_from(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            let key = contents.trim().to_string();
            if key.is_empty() {
                log::warn!("API key file {} is empty", path.display());
                None
            } else {
                log::info!("API key loaded from file");
                Some(key)
            }
        }
        Err(e) => {
            log::warn!(
                "Error loading API key from {}: {} (set {} for deployments)",
                path.display(),
                e,
                API_KEY_ENV
            );
            None
        }
    }
}
