//! Set catalog queries.

use crate::backend::Backend;
use crate::clock::to_chrono;
use crate::config;
use crate::error::Result;
use crate::models::{SetInfo, SetSelection};
use crate::set_mapping::fallback_sets;

// ---------------------------------------------------------------------------
// SetQuery
// ---------------------------------------------------------------------------

/// Query interface for the pricing provider's set catalog.
///
/// Lookups go memory, then the on-disk copy, then the provider, and finally
/// the built-in fallback list, so a catalog is always available.
pub struct SetQuery<'a> {
    backend: &'a Backend,
}

impl<'a> SetQuery<'a> {
    pub fn new(backend: &'a Backend) -> Self {
        Self { backend }
    }

    /// List every known set in the pricing vocabulary.
    pub fn list(&self) -> Vec<SetInfo> {
        let now = self.backend.clock.now();
        let max_age = to_chrono(config::SETS_CACHE_MAX_AGE);

        {
            let memory = self.backend.sets.lock().unwrap_or_else(|e| e.into_inner());
            if let Some((loaded_at, sets)) = memory.as_ref() {
                if now - *loaded_at < max_age {
                    return sets.clone();
                }
            }
        }

        if let Some(disk) = &self.backend.sets_disk {
            if let Some(sets) = disk.load::<Vec<SetInfo>>(now) {
                log::debug!("Loaded {} sets from {}", sets.len(), disk.path().display());
                self.remember(sets.clone());
                return sets;
            }
        }

        match self.fetch() {
            Ok(Some(sets)) => {
                log::info!("Fetched {} sets from pricing provider", sets.len());
                self.persist(&sets);
                self.remember(sets.clone());
                sets
            }
            Ok(None) => fallback_sets(),
            Err(e) => {
                log::warn!("Error fetching sets, using fallback list: {}", e);
                fallback_sets()
            }
        }
    }

    /// Drop the in-memory and on-disk catalog so the next `list` refetches.
    pub fn invalidate(&self) {
        *self.backend.sets.lock().unwrap_or_else(|e| e.into_inner()) = None;
        if let Some(disk) = &self.backend.sets_disk {
            let _ = std::fs::remove_file(disk.path());
        }
    }

    /// Display name for a pricing set id, if the catalog has it.
    pub fn name_of(&self, set_id: &str) -> Option<String> {
        self.list()
            .into_iter()
            .find(|s| s.id == set_id)
            .map(|s| s.name)
    }

    /// Pick the catalog entry matching an artwork-vocabulary set.
    ///
    /// See [`SetIdMapper::select_set`](crate::set_mapping::SetIdMapper::select_set)
    /// for the tier order.
    pub fn select(&self, source_id: &str, source_name: Option<&str>) -> SetSelection {
        let sets = self.list();
        let selection = self.backend.mapper.select_set(source_id, source_name, &sets);
        if !selection.is_resolved() {
            log::info!("Could not match set {} ({:?})", source_id, source_name);
        }
        selection
    }

    /// `Ok(None)` when the provider cannot be asked: no key, or no budget.
    fn fetch(&self) -> Result<Option<Vec<SetInfo>>> {
        if !self.backend.pricing.is_configured() {
            log::info!("Pricing API key not configured, using fallback sets");
            return Ok(None);
        }
        if !self.backend.limiter.try_acquire() {
            log::warn!("Rate limit reached, using fallback sets");
            return Ok(None);
        }
        let sets = self.backend.pricing.list_sets()?;
        Ok(if sets.is_empty() { None } else { Some(sets) })
    }

    fn remember(&self, sets: Vec<SetInfo>) {
        let now = self.backend.clock.now();
        *self.backend.sets.lock().unwrap_or_else(|e| e.into_inner()) = Some((now, sets));
    }

    fn persist(&self, sets: &[SetInfo]) {
        if let Some(disk) = &self.backend.sets_disk {
            if let Err(e) = disk.store(&sets, self.backend.clock.now()) {
                log::warn!("Failed to write sets cache {}: {}", disk.path().display(), e);
            }
        }
    }
}
