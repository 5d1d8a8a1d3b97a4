// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The resource cache: entry table, watermark state machine, sweep.
//!
//! The cache is an explicitly constructed object owned by whichever loop
//! drives it — there is no global table. All operations are synchronous and
//! take `&mut self`; [`ResourceCache::check`] is expected to run once per
//! tick on the same thread as every other cache call.

use std::collections::HashMap;
use std::path::Path;

use calliope_core::asset::{
    CacheConfig, CacheError, Resource, ResourceKind, ResourcePayload,
};
use calliope_core::event::CacheEvent;
use calliope_lanes::AcquireLane;
use crossbeam_channel::Sender;

use super::LaneRegistry;

/// Running counters describing cache activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Payloads acquired through a lane.
    pub loads: u64,
    /// Externally acquired payloads admitted via registration.
    pub registered: u64,
    /// Payloads handed back to a release primitive, for any reason.
    pub unloads: u64,
    /// Unloads performed by the watermark eviction scan specifically.
    pub evictions: u64,
    /// Released entries removed from the table by sweeps.
    pub swept: u64,
}

/// A string-keyed table of loaded resources with watermark-driven eviction.
///
/// The cache exclusively owns every [`Resource`] it tracks. Callers get
/// shared references through [`get`](Self::get) (or a mutable payload borrow
/// through [`payload_mut`](Self::payload_mut) for streaming handles) and
/// never direct access to the table.
///
/// # Eviction
///
/// [`check`](Self::check) enforces a soft capacity limit: crossing the high
/// watermark switches the cache into eviction mode, which releases every
/// loaded image entry — images are cheaply reconstructible from their source,
/// audio and render-target payloads are never touched. Eviction mode persists
/// across ticks until the entry count falls to the low watermark.
pub struct ResourceCache {
    entries: HashMap<String, Resource>,
    lanes: LaneRegistry,
    config: CacheConfig,
    evicting: bool,
    stats: CacheStats,
    event_sender: Option<Sender<CacheEvent>>,
}

impl ResourceCache {
    /// Creates an empty cache with the given watermark configuration.
    pub fn new(config: CacheConfig) -> Self {
        let config = config.sanitized();
        log::info!(
            "Resource cache initialized (high watermark {}, low watermark {})",
            config.high_watermark,
            config.low_watermark
        );
        Self {
            entries: HashMap::new(),
            lanes: LaneRegistry::new(),
            config,
            evicting: false,
            stats: CacheStats::default(),
            event_sender: None,
        }
    }

    /// Attaches a channel sender for [`CacheEvent`] notifications.
    pub fn with_event_sender(mut self, sender: Sender<CacheEvent>) -> Self {
        self.event_sender = Some(sender);
        self
    }

    /// Registers the acquisition lane used for `kind`, replacing any
    /// previous one.
    pub fn register_lane(&mut self, kind: ResourceKind, lane: impl AcquireLane + 'static) {
        self.lanes.register(kind, lane);
    }

    /// Acquires a payload for `id` through the lane registered for `kind`.
    ///
    /// # Errors
    ///
    /// - [`CacheError::DuplicateId`] if `id` is already tracked.
    /// - [`CacheError::LoadFailure`] if no lane is registered for `kind` or
    ///   the lane reports a failure. A load failure for a required asset is
    ///   fatal to the calling operation; the cache does not retry.
    pub fn load(
        &mut self,
        id: impl Into<String>,
        kind: ResourceKind,
        locator: impl AsRef<Path>,
    ) -> Result<&Resource, CacheError> {
        let id = id.into();
        let locator = locator.as_ref();

        if self.entries.contains_key(&id) {
            return Err(CacheError::DuplicateId { id });
        }

        log::info!(
            "Loading resource '{id}' ({kind:?}) from '{}'",
            locator.display()
        );

        let payload = self
            .lanes
            .acquire(kind, locator)
            .map_err(|e| CacheError::LoadFailure {
                id: id.clone(),
                details: e.to_string(),
            })?;

        self.stats.loads += 1;
        self.emit(CacheEvent::Loaded {
            id: id.clone(),
            kind,
        });
        log::debug!("Current resources count: {}", self.entries.len() + 1);

        let resource = Resource::new(id.clone(), payload);
        Ok(self.entries.entry(id).or_insert(resource))
    }

    /// Admits an externally acquired payload under `id`.
    ///
    /// This is how collaborators hand over assets the cache cannot acquire
    /// itself — render targets, text renderings produced by the renderer.
    /// The kind is derived from the payload variant; registered image
    /// payloads participate in eviction exactly like loaded ones.
    ///
    /// # Errors
    ///
    /// [`CacheError::DuplicateId`] if `id` is already tracked.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        payload: ResourcePayload,
    ) -> Result<&Resource, CacheError> {
        let id = id.into();

        if self.entries.contains_key(&id) {
            return Err(CacheError::DuplicateId { id });
        }

        let kind = payload.kind();
        log::debug!("Registering external resource '{id}' ({kind:?})");

        self.stats.registered += 1;
        self.emit(CacheEvent::Registered {
            id: id.clone(),
            kind,
        });

        let resource = Resource::new(id.clone(), payload);
        Ok(self.entries.entry(id).or_insert(resource))
    }

    /// Looks up a loaded resource.
    ///
    /// # Errors
    ///
    /// - [`CacheError::NotFound`] if `id` is not tracked.
    /// - [`CacheError::InvalidState`] if the resource has been released; a
    ///   released payload must never be consumed.
    pub fn get(&self, id: &str) -> Result<&Resource, CacheError> {
        let resource = self.entries.get(id).ok_or_else(|| CacheError::NotFound {
            id: id.to_string(),
        })?;

        if !resource.is_loaded() {
            return Err(CacheError::InvalidState {
                id: id.to_string(),
                state: resource.state(),
            });
        }

        Ok(resource)
    }

    /// Mutably borrows the payload of a loaded resource.
    ///
    /// Needed by collaborators that advance state on the payload itself,
    /// e.g. pumping an audio [`TrackStream`](calliope_core::asset::TrackStream).
    /// Same contract as [`get`](Self::get).
    pub fn payload_mut(&mut self, id: &str) -> Result<&mut ResourcePayload, CacheError> {
        let resource = self
            .entries
            .get_mut(id)
            .ok_or_else(|| CacheError::NotFound {
                id: id.to_string(),
            })?;

        let state = resource.state();
        resource
            .payload_mut()
            .ok_or_else(|| CacheError::InvalidState {
                id: id.to_string(),
                state,
            })
    }

    /// Releases the payload of `id` through its kind-specific primitive and
    /// marks the entry `Released`. The entry stays in the table until the
    /// next sweep removes it.
    ///
    /// # Errors
    ///
    /// - [`CacheError::NotFound`] if `id` is not tracked.
    /// - [`CacheError::AlreadyReleased`] if the payload was released before.
    pub fn unload(&mut self, id: &str) -> Result<(), CacheError> {
        let resource = self
            .entries
            .get_mut(id)
            .ok_or_else(|| CacheError::NotFound {
                id: id.to_string(),
            })?;

        if !resource.is_loaded() {
            return Err(CacheError::AlreadyReleased {
                id: id.to_string(),
            });
        }

        let kind = resource.kind();
        let payload = resource.release().ok_or_else(|| CacheError::AlreadyReleased {
            id: id.to_string(),
        })?;
        self.lanes.release(kind, payload);

        self.stats.unloads += 1;
        self.emit(CacheEvent::Unloaded {
            id: id.to_string(),
            kind,
        });
        log::debug!("Unloaded resource '{id}' ({kind:?})");

        Ok(())
    }

    /// Deletes the entry for `id` from the table.
    ///
    /// # Errors
    ///
    /// - [`CacheError::NotFound`] if `id` is not tracked.
    /// - [`CacheError::NotReleased`] if the payload is still loaded — the
    ///   entry must be unloaded first, so a native handle can never leak
    ///   silently through removal.
    pub fn remove(&mut self, id: &str) -> Result<(), CacheError> {
        let resource = self.entries.get(id).ok_or_else(|| CacheError::NotFound {
            id: id.to_string(),
        })?;

        if resource.is_loaded() {
            return Err(CacheError::NotReleased {
                id: id.to_string(),
            });
        }

        self.entries.remove(id);
        Ok(())
    }

    /// Once-per-tick maintenance: watermark bookkeeping, eviction, sweep.
    ///
    /// Crossing the high watermark arms eviction mode; while armed, every
    /// loaded image entry is released (a full-table scan — crossings are
    /// rare relative to the tick rate). All released entries are then swept
    /// out, and only after the sweep is the entry count compared against the
    /// low watermark to decide whether eviction mode disarms. Calling this
    /// again with no intervening loads is a no-op.
    pub fn check(&mut self) {
        if self.entries.len() > self.config.high_watermark {
            if !self.evicting {
                log::debug!(
                    "Resource count {} above high watermark {}, eviction armed",
                    self.entries.len(),
                    self.config.high_watermark
                );
                self.emit(CacheEvent::EvictionStarted {
                    len: self.entries.len(),
                });
            }
            self.evicting = true;
        }

        if self.evicting {
            let targets: Vec<String> = self
                .entries
                .values()
                .filter(|r| r.kind().is_evictable() && r.is_loaded())
                .map(|r| r.id().to_string())
                .collect();

            for id in targets {
                match self.unload(&id) {
                    Ok(()) => self.stats.evictions += 1,
                    Err(err) => log::error!("Eviction failed to unload '{id}': {err}"),
                }
            }
        }

        // Two-phase sweep: collect first, then mutate the table.
        let released: Vec<String> = self
            .entries
            .values()
            .filter(|r| !r.is_loaded())
            .map(|r| r.id().to_string())
            .collect();

        for id in &released {
            if let Err(err) = self.remove(id) {
                log::error!("Sweep failed to remove '{id}': {err}");
            }
        }

        if !released.is_empty() {
            self.stats.swept += released.len() as u64;
            log::debug!("Successfully removed {} resources", released.len());
            self.emit(CacheEvent::Swept {
                removed: released.len(),
            });
        }

        if self.evicting && self.entries.len() <= self.config.low_watermark {
            log::debug!(
                "Resource count {} at low watermark {}, eviction disarmed",
                self.entries.len(),
                self.config.low_watermark
            );
            self.emit(CacheEvent::EvictionStopped {
                len: self.entries.len(),
            });
            self.evicting = false;
        }
    }

    /// Shutdown path: releases every still-loaded entry through its lane,
    /// then drops the whole table and disarms eviction.
    pub fn clear(&mut self) {
        log::info!("Resource cache clearing {} entries", self.entries.len());

        let loaded: Vec<String> = self
            .entries
            .values()
            .filter(|r| r.is_loaded())
            .map(|r| r.id().to_string())
            .collect();

        for id in loaded {
            if let Err(err) = self.unload(&id) {
                log::error!("Clear failed to unload '{id}': {err}");
            }
        }

        self.entries.clear();
        self.evicting = false;
    }

    /// Number of tracked entries, released ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `id` is tracked, in either lifecycle state.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Whether the watermark state machine is currently in eviction mode.
    pub fn is_evicting(&self) -> bool {
        self.evicting
    }

    /// The watermark configuration in effect.
    pub fn config(&self) -> CacheConfig {
        self.config
    }

    /// Activity counters since construction.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    fn emit(&self, event: CacheEvent) {
        if let Some(sender) = &self.event_sender {
            let _ = sender.send(event);
        }
    }
}

impl Default for ResourceCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calliope_core::asset::ImageData;

    #[test]
    fn starts_idle_and_empty() {
        let cache = ResourceCache::new(CacheConfig::default());
        assert!(cache.is_empty());
        assert!(!cache.is_evicting());
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn sanitizes_inverted_watermarks_at_construction() {
        let cache = ResourceCache::new(CacheConfig {
            high_watermark: 4,
            low_watermark: 9,
        });
        assert_eq!(cache.config().low_watermark, 2);
    }

    #[test]
    fn register_rejects_duplicate_ids() {
        let mut cache = ResourceCache::new(CacheConfig::default());
        cache
            .register(
                "hud.frame",
                ResourcePayload::Image(ImageData::new(vec![0; 4], 1, 1)),
            )
            .unwrap();

        let err = cache
            .register(
                "hud.frame",
                ResourcePayload::Image(ImageData::new(vec![0; 4], 1, 1)),
            )
            .unwrap_err();
        assert!(matches!(err, CacheError::DuplicateId { .. }));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn load_without_lane_is_a_load_failure() {
        let mut cache = ResourceCache::new(CacheConfig::default());
        let err = cache
            .load("tex.missing", ResourceKind::Image, "nowhere.png")
            .unwrap_err();
        assert!(matches!(err, CacheError::LoadFailure { .. }));
        assert!(cache.is_empty());
    }
}
