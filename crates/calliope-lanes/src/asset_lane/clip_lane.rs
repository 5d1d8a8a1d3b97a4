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

//! Implements sampled-clip acquisition for `.wav` sources.

use std::error::Error;
use std::io::Cursor;
use std::path::Path;

use anyhow::anyhow;
use calliope_core::asset::{ResourcePayload, SoundData};

use super::{read_source, AcquireLane};

/// An `AcquireLane` that decodes short sound effects from the WAV format.
#[derive(Debug, Default, Clone)]
pub struct ClipLane;

impl ClipLane {
    /// Creates a new instance of `ClipLane`.
    pub fn new() -> Self {
        Self
    }
}

impl AcquireLane for ClipLane {
    /// Parses a `.wav` source into a fully decoded [`SoundData`] payload.
    fn acquire(&self, locator: &Path) -> Result<ResourcePayload, Box<dyn Error + Send + Sync>> {
        let bytes = read_source(locator)?;

        let cursor = Cursor::new(bytes);
        let mut reader = hound::WavReader::new(cursor)?;

        let spec = reader.spec();

        let samples: Result<Vec<f32>, _> = match spec.sample_format {
            hound::SampleFormat::Float => reader.samples::<f32>().collect(),
            hound::SampleFormat::Int => {
                let max_value = (1 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|sample| sample.map(|s| s as f32 / max_value))
                    .collect()
            }
        };

        let samples = samples.map_err(|e| anyhow!("Failed to parse WAV samples: {}", e))?;

        log::debug!(
            "ClipLane: decoded '{}' ({} samples, {} ch, {} Hz)",
            locator.display(),
            samples.len(),
            spec.channels,
            spec.sample_rate
        );

        Ok(ResourcePayload::AudioClip(SoundData {
            samples,
            channels: spec.channels,
            sample_rate: spec.sample_rate,
        }))
    }
}
