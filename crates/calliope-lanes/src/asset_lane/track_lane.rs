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

//! Implements streaming-track acquisition using the `symphonia` library.
//!
//! Unlike clips, tracks stay open: acquiring one probes the container, sets
//! up a decoder, and hands the cache a live [`TrackStream`] that the audio
//! collaborator pumps block by block during playback.

use std::error::Error;
use std::fs::File;
use std::path::Path;

use anyhow::anyhow;
use calliope_core::asset::{ResourcePayload, TrackSpec, TrackStream};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions};
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::{AcquireLane, LaneError};

/// An `AcquireLane` that opens audio containers as incrementally decoded
/// streams.
#[derive(Debug, Default, Clone)]
pub struct TrackLane;

impl TrackLane {
    /// Creates a new instance of `TrackLane`.
    pub fn new() -> Self {
        Self
    }
}

impl AcquireLane for TrackLane {
    fn acquire(&self, locator: &Path) -> Result<ResourcePayload, Box<dyn Error + Send + Sync>> {
        // 1. Open the source as a media stream. Tracks are not slurped into
        //    memory: the reader keeps the file handle for incremental decode.
        let file = File::open(locator).map_err(|source| LaneError::Io {
            path: locator.to_path_buf(),
            source,
        })?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        // 2. Probe for the format, hinting with the file extension if present.
        let mut hint = Hint::new();
        if let Some(ext) = locator.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }
        let meta_opts: MetadataOptions = Default::default();
        let fmt_opts: FormatOptions = Default::default();
        let probed = symphonia::default::get_probe().format(&hint, mss, &fmt_opts, &meta_opts)?;
        let format_reader = probed.format;

        // 3. Find the default audio track.
        let track = format_reader
            .default_track()
            .ok_or_else(|| anyhow!("No default audio track found"))?;

        let track_id = track.id;
        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| anyhow!("Unknown sample rate"))?;
        let channels = track
            .codec_params
            .channels
            .ok_or_else(|| anyhow!("Unknown channel count"))?;

        // 4. Create a decoder for the track.
        let dec_opts: DecoderOptions = Default::default();
        let decoder = symphonia::default::get_codecs().make(&track.codec_params, &dec_opts)?;

        log::debug!(
            "TrackLane: opened '{}' ({} ch, {} Hz)",
            locator.display(),
            channels.count(),
            sample_rate
        );

        Ok(ResourcePayload::AudioTrack(Box::new(SymphoniaStream {
            format_reader,
            decoder,
            track_id,
            spec: TrackSpec {
                channels: channels.count() as u16,
                sample_rate,
            },
        })))
    }

    fn release(&self, payload: ResourcePayload) {
        if let ResourcePayload::AudioTrack(stream) = payload {
            log::debug!("TrackLane: closing stream ({:?})", stream.spec());
            drop(stream);
        }
    }
}

/// A live demuxer + decoder pair over an open media source.
struct SymphoniaStream {
    format_reader: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    spec: TrackSpec,
}

impl TrackStream for SymphoniaStream {
    fn spec(&self) -> TrackSpec {
        self.spec
    }

    fn next_block(&mut self) -> Result<Option<Vec<f32>>, Box<dyn Error + Send + Sync>> {
        loop {
            match self.format_reader.next_packet() {
                Ok(packet) => {
                    if packet.track_id() != self.track_id {
                        continue;
                    }

                    match self.decoder.decode(&packet) {
                        Ok(decoded) => {
                            // Symphonia yields samples in planes (LLL..., RRR...);
                            // interleave them into the LRLR... contract.
                            let mut sample_buf =
                                SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec());
                            sample_buf.copy_interleaved_ref(decoded);
                            return Ok(Some(sample_buf.samples().to_vec()));
                        }
                        Err(e) => {
                            // A decode error on one packet is not fatal.
                            log::warn!("TrackStream: skipping damaged packet: {e}");
                        }
                    }
                }
                // End of stream
                Err(symphonia::core::errors::Error::IoError(_)) => {
                    return Ok(None);
                }
                Err(e) => {
                    return Err(Box::new(e));
                }
            }
        }
    }
}
