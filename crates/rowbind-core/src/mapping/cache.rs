use super::MappingSourceId;
use crate::schema::{EntryType, MetaModel};
use crate::Result;

use arc_swap::ArcSwapOption;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Models built by one mapping source, keyed by entry type.
///
/// The first model built is published to a lock-free primary slot; models
/// for other entry types go to a secondary map behind a reader/writer lock.
/// Whichever path publishes first wins: once a model for an entry type is
/// visible, every caller receives that same instance.
pub struct ModelCache {
    id: MappingSourceId,

    primary: ArcSwapOption<MetaModel>,

    /// Held by the one caller building the model for the primary slot;
    /// stays set once that model is published
    claiming_primary: AtomicBool,

    secondary: RwLock<IndexMap<EntryType, Arc<MetaModel>>>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self {
            id: MappingSourceId::next(),
            primary: ArcSwapOption::empty(),
            claiming_primary: AtomicBool::new(false),
            secondary: RwLock::new(IndexMap::new()),
        }
    }

    pub fn source_id(&self) -> MappingSourceId {
        self.id
    }

    /// Returns the cached model for `entry`, building it with `build` if
    /// there is none.
    ///
    /// `build` runs at most twice per entry type across all threads: once
    /// for the primary slot and once under the write lock. Errors are
    /// returned to the caller and leave the cache unchanged.
    pub fn get_or_build(
        &self,
        entry: &EntryType,
        build: impl Fn(&EntryType) -> Result<MetaModel>,
    ) -> Result<Arc<MetaModel>> {
        if self.primary.load().is_none()
            && self
                .claiming_primary
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
        {
            let mut claim = PrimaryClaim {
                gate: &self.claiming_primary,
                published: false,
            };

            let model = Arc::new(build(entry)?);
            claim.published = true;
            return Ok(self.publish_primary(model));
        }

        if let Some(model) = self.primary_for(entry) {
            trace!(entry = entry.name(), "Model cache hit (primary)");
            return Ok(model);
        }

        if let Some(model) = self.secondary.read().get(entry) {
            trace!(entry = entry.name(), "Model cache hit (secondary)");
            return Ok(model.clone());
        }

        let mut secondary = self.secondary.write();

        if let Some(model) = self.primary_for(entry) {
            return Ok(model);
        }

        if let Some(model) = secondary.get(entry) {
            return Ok(model.clone());
        }

        let model = Arc::new(build(entry)?);

        debug!(entry = entry.name(), "Publishing model to secondary map");
        secondary.insert(*entry, model.clone());
        Ok(model)
    }

    /// Publishes `model` to the primary slot. Only the holder of the claim
    /// calls this, so the slot is still empty. If another caller already
    /// published a model for the same entry type to the secondary map, that
    /// model is published instead so only one instance is ever visible.
    fn publish_primary(&self, model: Arc<MetaModel>) -> Arc<MetaModel> {
        let secondary = self.secondary.write();

        let model = match secondary.get(model.entry_type()) {
            Some(existing) => {
                debug!(
                    entry = model.entry_type().name(),
                    "Adopting published model; discarding speculative build"
                );
                existing.clone()
            }
            None => model,
        };

        self.primary.store(Some(model.clone()));

        debug!(
            entry = model.entry_type().name(),
            "Published model to primary slot"
        );
        model
    }

    fn primary_for(&self, entry: &EntryType) -> Option<Arc<MetaModel>> {
        match &*self.primary.load() {
            Some(model) if model.entry_type() == entry => Some(model.clone()),
            _ => None,
        }
    }

    /// The number of models cached.
    pub fn len(&self) -> usize {
        let secondary = self.secondary.read();
        let primary = self.primary.load();

        match &*primary {
            Some(model) if !secondary.contains_key(model.entry_type()) => secondary.len() + 1,
            _ => secondary.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Releases the primary gate on drop unless the model was built, so a build
/// that fails or panics lets the next caller claim the slot.
struct PrimaryClaim<'a> {
    gate: &'a AtomicBool,
    published: bool,
}

impl Drop for PrimaryClaim<'_> {
    fn drop(&mut self) {
        if !self.published {
            self.gate.store(false, Ordering::Release);
        }
    }
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::new()
    }
}
