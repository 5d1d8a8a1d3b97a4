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

//! Watermark configuration for the resource cache.

use serde::{Deserialize, Serialize};

/// The hysteresis pair driving automatic eviction.
///
/// Crossing `high_watermark` (entry count, strictly above) starts eviction;
/// falling to or below `low_watermark` stops it. Two independent thresholds
/// prevent the cache from oscillating between evict and reload every tick
/// when usage hovers near a single limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entry count above which eviction starts.
    pub high_watermark: usize,
    /// Entry count at or below which eviction stops.
    pub low_watermark: usize,
}

impl CacheConfig {
    /// Builds a config from the accumulation threshold alone, deriving the
    /// low watermark as half of it.
    pub fn with_high_watermark(high_watermark: usize) -> Self {
        Self {
            high_watermark,
            low_watermark: high_watermark / 2,
        }
    }

    /// Returns a copy with an inverted pair repaired.
    ///
    /// A low watermark above the high watermark would latch eviction on
    /// permanently, so it is pulled back down to the halving rule with a
    /// warning instead of being trusted.
    pub fn sanitized(self) -> Self {
        if self.low_watermark > self.high_watermark {
            log::warn!(
                "CacheConfig: low watermark {} exceeds high watermark {}, falling back to {}",
                self.low_watermark,
                self.high_watermark,
                self.high_watermark / 2
            );
            return Self::with_high_watermark(self.high_watermark);
        }
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::with_high_watermark(64)
    }
}
