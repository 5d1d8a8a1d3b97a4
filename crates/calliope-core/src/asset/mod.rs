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

//! Provides the foundational types for Calliope's resource system.
//!
//! This module defines the "common language" for all resource-related
//! operations. It contains the core contracts that other crates implement or
//! consume, but it has no knowledge of how resources are acquired or stored.
//!
//! The key components are:
//! - [`ResourceKind`] and [`ResourceState`]: the classification and lifecycle
//!   vocabulary shared by every layer.
//! - [`Resource`]: one tracked asset, owning its payload exclusively.
//! - [`CacheError`]: the contract-violation taxonomy surfaced by the cache.
//! - [`CacheConfig`]: the watermark pair driving eviction.
//!
//! The cache engine itself lives in `calliope-assets`; the acquisition
//! primitives live in `calliope-lanes`.

mod config;
mod error;
mod payload;

pub use config::*;
pub use error::*;
pub use payload::*;

use serde::{Deserialize, Serialize};

/// Classifies a tracked resource and selects which release primitive applies.
///
/// The kind also decides eviction eligibility: only [`ResourceKind::Image`]
/// entries are reclaimed by the watermark sweep, because decoded images can be
/// re-acquired from their source at any time. Audio payloads and render
/// targets either have no cheap reload path or represent required live state,
/// so the cache never touches them on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// A decoded still image (textures, sprites, text renderings).
    Image,
    /// An open streaming audio handle, decoded incrementally during playback.
    AudioTrack,
    /// A fully decoded, sampled audio clip (sound effects).
    AudioClip,
    /// An offscreen render surface registered by the rendering collaborator.
    RenderTarget,
}

impl ResourceKind {
    /// Whether entries of this kind may be reclaimed by automatic eviction.
    pub fn is_evictable(self) -> bool {
        matches!(self, ResourceKind::Image)
    }
}

/// Lifecycle flag of a tracked resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceState {
    /// The payload is present and valid.
    Loaded,
    /// The payload has been handed back to its release primitive. The entry
    /// remains in the table until the next sweep removes it.
    Released,
}

/// One tracked asset: identifier, classification, lifecycle flag, payload.
///
/// The payload is owned exclusively by the `Resource` and is present if and
/// only if the state is [`ResourceState::Loaded`]; releasing transfers it out,
/// so a released payload can never be observed through the entry again.
#[derive(Debug)]
pub struct Resource {
    id: String,
    kind: ResourceKind,
    state: ResourceState,
    payload: Option<ResourcePayload>,
}

impl Resource {
    /// Creates a `Loaded` resource taking exclusive ownership of `payload`.
    ///
    /// The kind is derived from the payload variant, so an entry can never
    /// disagree with the data it tracks.
    pub fn new(id: impl Into<String>, payload: ResourcePayload) -> Self {
        let kind = payload.kind();
        Self {
            id: id.into(),
            kind,
            state: ResourceState::Loaded,
            payload: Some(payload),
        }
    }

    /// The unique string key this resource is tracked under.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The resource classification.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// The current lifecycle flag.
    pub fn state(&self) -> ResourceState {
        self.state
    }

    /// Whether the payload is still present.
    pub fn is_loaded(&self) -> bool {
        self.state == ResourceState::Loaded
    }

    /// Borrows the payload, or `None` once the resource has been released.
    pub fn payload(&self) -> Option<&ResourcePayload> {
        self.payload.as_ref()
    }

    /// Mutably borrows the payload, or `None` once released.
    pub fn payload_mut(&mut self) -> Option<&mut ResourcePayload> {
        self.payload.as_mut()
    }

    /// Transitions to `Released` and transfers the payload out.
    ///
    /// Returns `None` if the resource was already released. The caller (the
    /// cache engine) is responsible for handing the payload to the matching
    /// release primitive.
    pub fn release(&mut self) -> Option<ResourcePayload> {
        self.state = ResourceState::Released;
        self.payload.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_eviction_eligibility() {
        assert!(ResourceKind::Image.is_evictable());
        assert!(!ResourceKind::AudioTrack.is_evictable());
        assert!(!ResourceKind::AudioClip.is_evictable());
        assert!(!ResourceKind::RenderTarget.is_evictable());
    }

    #[test]
    fn resource_kind_follows_payload() {
        let res = Resource::new("ui.cursor", ResourcePayload::Image(ImageData::new(vec![0; 4], 1, 1)));
        assert_eq!(res.kind(), ResourceKind::Image);
        assert_eq!(res.state(), ResourceState::Loaded);
        assert!(res.payload().is_some());
    }

    #[test]
    fn release_empties_payload_exactly_once() {
        let mut res = Resource::new("fx.hit", ResourcePayload::AudioClip(SoundData {
            samples: vec![0.0; 8],
            channels: 1,
            sample_rate: 44_100,
        }));

        let payload = res.release();
        assert!(payload.is_some());
        assert_eq!(res.state(), ResourceState::Released);
        assert!(res.payload().is_none());

        // A second release must not conjure a payload back.
        assert!(res.release().is_none());
    }
}
