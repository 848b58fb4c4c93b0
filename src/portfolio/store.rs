//! Portfolio persistence.
//!
//! A store keeps one card list per user with a monotonically increasing
//! version. `save` only succeeds when the caller's expected version still
//! matches, which turns lost updates into explicit [`TrackerError::VersionConflict`]s.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::{Result, TrackerError};
use crate::models::Card;

/// A user's cards plus the version they were read at. Version 0 means the
/// user has no stored portfolio yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionedPortfolio {
    pub version: u64,
    pub cards: Vec<Card>,
}

pub trait PortfolioStore: Send + Sync {
    fn load(&self, user_id: &str) -> Result<VersionedPortfolio>;

    /// Replace the user's cards if the stored version equals
    /// `expected_version`. Returns the new version.
    fn save(&self, user_id: &str, cards: &[Card], expected_version: u64) -> Result<u64>;
}

fn conflict(user_id: &str, expected: u64) -> TrackerError {
    TrackerError::VersionConflict {
        user_id: user_id.to_string(),
        expected,
    }
}

// ---------------------------------------------------------------------------
// MemoryPortfolioStore
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryPortfolioStore {
    portfolios: Mutex<HashMap<String, VersionedPortfolio>>,
}

impl MemoryPortfolioStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, VersionedPortfolio>> {
        self.portfolios.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PortfolioStore for MemoryPortfolioStore {
    fn load(&self, user_id: &str) -> Result<VersionedPortfolio> {
        Ok(self.lock().get(user_id).cloned().unwrap_or_default())
    }

    fn save(&self, user_id: &str, cards: &[Card], expected_version: u64) -> Result<u64> {
        let mut portfolios = self.lock();
        let current = portfolios.get(user_id).map(|p| p.version).unwrap_or(0);
        if current != expected_version {
            return Err(conflict(user_id, expected_version));
        }
        let version = current + 1;
        portfolios.insert(
            user_id.to_string(),
            VersionedPortfolio {
                version,
                cards: cards.to_vec(),
            },
        );
        Ok(version)
    }
}

// ---------------------------------------------------------------------------
// JsonFilePortfolioStore
// ---------------------------------------------------------------------------

/// All portfolios in one JSON document keyed by user id.
///
/// The whole document is rewritten on every save through a temp file that is
/// renamed into place. Saves within one process are serialized; the version
/// check catches writers in other processes that raced between load and save.
pub struct JsonFilePortfolioStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFilePortfolioStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// A store at `portfolios.json` inside `dir`.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self::new(dir.as_ref().join(config::PORTFOLIO_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, VersionedPortfolio>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, all: &BTreeMap<String, VersionedPortfolio>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(serde_json::to_string_pretty(all)?.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl PortfolioStore for JsonFilePortfolioStore {
    fn load(&self, user_id: &str) -> Result<VersionedPortfolio> {
        Ok(self.read_all()?.remove(user_id).unwrap_or_default())
    }

    fn save(&self, user_id: &str, cards: &[Card], expected_version: u64) -> Result<u64> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut all = self.read_all()?;
        let current = all.get(user_id).map(|p| p.version).unwrap_or(0);
        if current != expected_version {
            return Err(conflict(user_id, expected_version));
        }
        let version = current + 1;
        all.insert(
            user_id.to_string(),
            VersionedPortfolio {
                version,
                cards: cards.to_vec(),
            },
        );
        self.write_all(&all)?;
        log::debug!("Saved portfolio for {} (version {})", user_id, version);
        Ok(version)
    }
}
