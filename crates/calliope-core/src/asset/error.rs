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

//! Defines the error types for the resource cache.

use std::fmt;

use super::ResourceState;

/// An error raised by a cache operation.
///
/// Every variant is a local contract violation: either a programmer error
/// (wrong lifecycle order, reused id) or an unavailable asset. None of them
/// are recovered internally — the cache surfaces them immediately and the
/// caller decides. A [`CacheError::LoadFailure`] for a required asset is
/// expected to be fatal to the calling operation; there is no retry policy
/// and no asset substitution.
#[derive(Debug)]
pub enum CacheError {
    /// A load or registration reused an id that is already tracked.
    DuplicateId {
        /// The offending id.
        id: String,
    },
    /// The requested id is not present in the table.
    NotFound {
        /// The requested id.
        id: String,
    },
    /// The entry exists but is not in the state the operation requires.
    InvalidState {
        /// The requested id.
        id: String,
        /// The state the entry was actually in.
        state: ResourceState,
    },
    /// An unload was attempted on an entry that was already released.
    AlreadyReleased {
        /// The requested id.
        id: String,
    },
    /// A removal was attempted while the entry still holds its payload.
    NotReleased {
        /// The requested id.
        id: String,
    },
    /// The acquisition primitive failed to produce a payload.
    LoadFailure {
        /// The id the payload was being acquired for.
        id: String,
        /// The underlying lane or decoder error.
        details: String,
    },
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::DuplicateId { id } => {
                write!(f, "Resource '{id}' already exists")
            }
            CacheError::NotFound { id } => {
                write!(f, "Resource '{id}' not found")
            }
            CacheError::InvalidState { id, state } => {
                write!(f, "Resource '{id}' is in state {state:?} and cannot be consumed")
            }
            CacheError::AlreadyReleased { id } => {
                write!(f, "Resource '{id}' was already released")
            }
            CacheError::NotReleased { id } => {
                write!(f, "Resource '{id}' must be released before removal")
            }
            CacheError::LoadFailure { id, details } => {
                write!(f, "Failed to acquire payload for '{id}': {details}")
            }
        }
    }
}

impl std::error::Error for CacheError {}
