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

//! A registry mapping resource kinds to their acquisition lanes.

use std::collections::HashMap;
use std::error::Error;
use std::path::Path;

use anyhow::anyhow;
use calliope_core::asset::{ResourceKind, ResourcePayload};
use calliope_lanes::AcquireLane;

/// The registry that keeps kind dispatch out of the cache's way.
///
/// One lane per [`ResourceKind`]; kinds without a lane (render targets) can
/// only enter the cache through registration, and their payloads are simply
/// dropped on release.
pub(crate) struct LaneRegistry {
    lanes: HashMap<ResourceKind, Box<dyn AcquireLane>>,
}

impl LaneRegistry {
    /// Creates an empty `LaneRegistry`.
    pub(crate) fn new() -> Self {
        Self {
            lanes: HashMap::new(),
        }
    }

    /// Registers the acquisition lane for a resource kind, replacing any
    /// previous one.
    pub(crate) fn register(&mut self, kind: ResourceKind, lane: impl AcquireLane + 'static) {
        self.lanes.insert(kind, Box::new(lane));
    }

    /// Acquires a payload of the requested kind from `locator`.
    pub(crate) fn acquire(
        &self,
        kind: ResourceKind,
        locator: &Path,
    ) -> Result<ResourcePayload, Box<dyn Error + Send + Sync>> {
        let lane = self
            .lanes
            .get(&kind)
            .ok_or_else(|| anyhow!("No acquisition lane registered for resource kind {kind:?}"))?;

        let payload = lane.acquire(locator)?;

        if payload.kind() != kind {
            return Err(anyhow!(
                "Lane for kind {:?} produced a {:?} payload",
                kind,
                payload.kind()
            )
            .into());
        }

        Ok(payload)
    }

    /// Hands a payload back to the lane that produced it.
    pub(crate) fn release(&self, kind: ResourceKind, payload: ResourcePayload) {
        match self.lanes.get(&kind) {
            Some(lane) => lane.release(payload),
            None => {
                log::trace!("No lane for kind {kind:?}, dropping payload");
                drop(payload);
            }
        }
    }
}
