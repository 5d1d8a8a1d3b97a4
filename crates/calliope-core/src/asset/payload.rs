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

//! Payload data owned by tracked resources.
//!
//! The payload is a tagged variant rather than an opaque pointer: each kind of
//! asset carries its own decoded representation, and the variant tag is the
//! single source of truth for which release primitive applies.

use std::error::Error;
use std::fmt;

use super::ResourceKind;

/// A decoded still image in RGBA8 layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Raw pixel data, tightly packed rows of RGBA8.
    pub pixels: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageData {
    /// Creates an image payload from raw RGBA8 pixels.
    pub fn new(pixels: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            pixels,
            width,
            height,
        }
    }

    /// Memory held by the pixel buffer, in bytes.
    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }
}

/// A sampled sound, decoded and ready for playback.
///
/// Samples are normalized, interleaved `f32` values. For stereo the ordering
/// is `[L, R, L, R, ...]` and values are expected to be in `[-1.0, 1.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundData {
    /// The raw, interleaved audio samples.
    pub samples: Vec<f32>,
    /// Number of channels (1 for mono, 2 for stereo).
    pub channels: u16,
    /// Samples per second per channel (e.g. 44100 Hz).
    pub sample_rate: u32,
}

impl SoundData {
    /// Playback duration in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.channels == 0 || self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.channels as f32 / self.sample_rate as f32
    }
}

/// A CPU-side offscreen render surface.
///
/// Render targets are produced by the rendering collaborator and admitted to
/// the cache via registration; the cache never acquires or evicts them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTargetData {
    /// Surface pixels, RGBA8, zero-initialized at creation.
    pub pixels: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl RenderTargetData {
    /// Allocates a zeroed surface of the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; width as usize * height as usize * 4],
            width,
            height,
        }
    }
}

/// Sample format of an open [`TrackStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackSpec {
    /// Number of channels in the decoded output.
    pub channels: u16,
    /// Samples per second per channel.
    pub sample_rate: u32,
}

/// An open, incrementally decoded audio stream.
///
/// This is the streaming counterpart of [`SoundData`]: instead of holding the
/// whole waveform, the handle keeps the demuxer/decoder state open and yields
/// interleaved sample blocks on demand. Implementations live in
/// `calliope-lanes`; this crate only defines the contract.
pub trait TrackStream: Send {
    /// The sample format this stream decodes into.
    fn spec(&self) -> TrackSpec;

    /// Decodes the next block of interleaved samples.
    ///
    /// Returns `Ok(None)` at end of stream. Decode errors on individual
    /// packets are implementation-defined (a lane may skip damaged packets);
    /// a returned error means the stream is unusable.
    fn next_block(&mut self) -> Result<Option<Vec<f32>>, Box<dyn Error + Send + Sync>>;
}

/// The decoded data owned by a [`Resource`](super::Resource), tagged by kind.
///
/// Ownership is exclusive: payloads are moved into the cache on load or
/// registration and moved back out exactly once on release. The enum is
/// deliberately not `Clone` — duplicating a payload would alias the underlying
/// asset and break the release contract.
pub enum ResourcePayload {
    /// A decoded still image.
    Image(ImageData),
    /// An open streaming audio handle.
    AudioTrack(Box<dyn TrackStream>),
    /// A fully decoded audio clip.
    AudioClip(SoundData),
    /// An offscreen render surface.
    RenderTarget(RenderTargetData),
}

impl ResourcePayload {
    /// The [`ResourceKind`] matching this payload variant.
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourcePayload::Image(_) => ResourceKind::Image,
            ResourcePayload::AudioTrack(_) => ResourceKind::AudioTrack,
            ResourcePayload::AudioClip(_) => ResourceKind::AudioClip,
            ResourcePayload::RenderTarget(_) => ResourceKind::RenderTarget,
        }
    }
}

impl fmt::Debug for ResourcePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourcePayload::Image(data) => f
                .debug_struct("Image")
                .field("width", &data.width)
                .field("height", &data.height)
                .finish(),
            ResourcePayload::AudioTrack(stream) => f
                .debug_struct("AudioTrack")
                .field("spec", &stream.spec())
                .finish(),
            ResourcePayload::AudioClip(data) => f
                .debug_struct("AudioClip")
                .field("samples", &data.samples.len())
                .field("channels", &data.channels)
                .field("sample_rate", &data.sample_rate)
                .finish(),
            ResourcePayload::RenderTarget(data) => f
                .debug_struct("RenderTarget")
                .field("width", &data.width)
                .field("height", &data.height)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_kind_mapping() {
        let image = ResourcePayload::Image(ImageData::new(vec![0; 16], 2, 2));
        assert_eq!(image.kind(), ResourceKind::Image);

        let clip = ResourcePayload::AudioClip(SoundData {
            samples: vec![],
            channels: 2,
            sample_rate: 48_000,
        });
        assert_eq!(clip.kind(), ResourceKind::AudioClip);

        let target = ResourcePayload::RenderTarget(RenderTargetData::new(4, 4));
        assert_eq!(target.kind(), ResourceKind::RenderTarget);
    }

    #[test]
    fn render_target_allocates_rgba8() {
        let target = RenderTargetData::new(8, 2);
        assert_eq!(target.pixels.len(), 8 * 2 * 4);
        assert!(target.pixels.iter().all(|&b| b == 0));
    }

    #[test]
    fn sound_duration() {
        let clip = SoundData {
            samples: vec![0.0; 44_100 * 2],
            channels: 2,
            sample_rate: 44_100,
        };
        assert!((clip.duration_secs() - 1.0).abs() < f32::EPSILON);
    }
}
