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

//! The acquisition seam between the resource cache and its collaborators.

mod clip_lane;
mod image_lane;
mod track_lane;

pub use clip_lane::ClipLane;
pub use image_lane::ImageLane;
pub use track_lane::TrackLane;

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use calliope_core::asset::ResourcePayload;
use thiserror::Error;

/// An error raised while reading or decoding a source asset.
#[derive(Debug, Error)]
pub enum LaneError {
    /// The locator could not be read from disk.
    #[error("Failed to read source '{}': {source}", .path.display())]
    Io {
        /// The locator that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
    /// The source bytes could not be decoded into a payload.
    #[error("Failed to decode source '{}': {details}", .path.display())]
    Decode {
        /// The locator that failed.
        path: PathBuf,
        /// Decoder diagnostics.
        details: String,
    },
}

/// A type that can acquire a payload for one resource kind.
///
/// This is the "Data Plane" of resource management: implementors do the
/// potentially CPU-intensive work of reading and decoding a source locator
/// into a usable payload. The matching release primitive takes the payload
/// back when the cache lets go of it; for most lanes releasing is simply
/// dropping the decoded data, but lanes holding open handles can override it.
pub trait AcquireLane: Send + Sync {
    /// Reads and decodes `locator` into a payload.
    ///
    /// The error must be thread-safe; the cache records it verbatim in the
    /// failure it surfaces to the caller.
    fn acquire(&self, locator: &Path) -> Result<ResourcePayload, Box<dyn Error + Send + Sync>>;

    /// Consumes a payload this lane produced.
    fn release(&self, payload: ResourcePayload) {
        drop(payload);
    }
}

/// Reads the full contents of a source locator.
pub(crate) fn read_source(path: &Path) -> Result<Vec<u8>, LaneError> {
    fs::read(path).map_err(|source| LaneError::Io {
        path: path.to_path_buf(),
        source,
    })
}
