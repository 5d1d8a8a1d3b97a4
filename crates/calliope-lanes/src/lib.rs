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

//! # Calliope Lanes
//!
//! Concrete acquisition primitives for the resource cache: each lane knows
//! how to turn a source locator into a decoded, cache-ready payload for one
//! resource kind.

pub mod asset_lane;

pub use asset_lane::{AcquireLane, ClipLane, ImageLane, LaneError, TrackLane};
