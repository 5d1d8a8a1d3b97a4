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

//! Notification events emitted by the resource cache.

use crate::asset::ResourceKind;

/// A lifecycle notification published by the cache.
///
/// Events are best-effort observability: the cache emits them through an
/// optional channel sender and never blocks or fails on a disconnected
/// receiver. Consumers (telemetry, debug overlays, tests) subscribe by
/// attaching a sender at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    /// A payload was acquired through a lane and inserted.
    Loaded {
        /// Id of the new entry.
        id: String,
        /// Kind of the new entry.
        kind: ResourceKind,
    },
    /// An externally acquired payload was admitted.
    Registered {
        /// Id of the new entry.
        id: String,
        /// Kind of the new entry.
        kind: ResourceKind,
    },
    /// A payload was handed back to its release primitive. Emitted for both
    /// explicit unloads and watermark evictions.
    Unloaded {
        /// Id of the released entry.
        id: String,
        /// Kind of the released entry.
        kind: ResourceKind,
    },
    /// The entry count crossed the high watermark; eviction is now active.
    EvictionStarted {
        /// Entry count at the crossing.
        len: usize,
    },
    /// The entry count fell to the low watermark; eviction is now idle.
    EvictionStopped {
        /// Entry count after the sweep that cleared the flag.
        len: usize,
    },
    /// A maintenance sweep removed released entries from the table.
    Swept {
        /// Number of entries removed.
        removed: usize,
    },
}
