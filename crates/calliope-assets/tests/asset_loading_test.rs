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

//! Full-stack test: the cache driving the real decode lanes over files on
//! disk.

use std::path::{Path, PathBuf};

use anyhow::Result;
use calliope_assets::ResourceCache;
use calliope_core::asset::{CacheConfig, ResourceKind, ResourcePayload};
use calliope_lanes::{ClipLane, ImageLane, TrackLane};
use tempfile::tempdir;

fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
    img.save_with_format(&path, image::ImageFormat::Png).unwrap();
    path
}

fn write_wav(dir: &Path, name: &str, frames: u32) -> PathBuf {
    let path = dir.join(name);
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: 44_100,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for i in 0..frames {
        let s = ((i % 100) as i16 - 50) * 300;
        writer.write_sample(s).unwrap();
        writer.write_sample(-s).unwrap();
    }
    writer.finalize().unwrap();
    path
}

fn real_cache() -> ResourceCache {
    let mut cache = ResourceCache::new(CacheConfig::with_high_watermark(10));
    cache.register_lane(ResourceKind::Image, ImageLane::new());
    cache.register_lane(ResourceKind::AudioClip, ClipLane::new());
    cache.register_lane(ResourceKind::AudioTrack, TrackLane::new());
    cache
}

#[test]
fn test_load_assets_from_disk() -> Result<()> {
    // --- 1. Setup: create REAL temporary asset files on disk ---
    let dir = tempdir()?;
    let png = write_png(dir.path(), "hero.png", 8, 4);
    let wav = write_wav(dir.path(), "hit.wav", 256);

    // --- 2. Load them through the cache with the real lanes ---
    let mut cache = real_cache();

    cache.load("tex.hero", ResourceKind::Image, &png)?;
    cache.load("sfx.hit", ResourceKind::AudioClip, &wav)?;

    // --- 3. Assert: payloads decoded to the expected shapes ---
    match cache.get("tex.hero")?.payload().unwrap() {
        ResourcePayload::Image(data) => {
            assert_eq!((data.width, data.height), (8, 4));
            assert_eq!(data.byte_len(), 8 * 4 * 4);
        }
        other => panic!("Expected image payload, got {other:?}"),
    }

    match cache.get("sfx.hit")?.payload().unwrap() {
        ResourcePayload::AudioClip(clip) => {
            assert_eq!(clip.channels, 2);
            assert_eq!(clip.sample_rate, 44_100);
            assert_eq!(clip.samples.len(), 256 * 2);
        }
        other => panic!("Expected clip payload, got {other:?}"),
    }

    Ok(())
}

#[test]
fn test_stream_a_track_through_the_cache() -> Result<()> {
    let dir = tempdir()?;
    let wav = write_wav(dir.path(), "theme.wav", 1024);

    let mut cache = real_cache();
    cache.load("bgm.theme", ResourceKind::AudioTrack, &wav)?;

    // Pump the open stream the way the audio collaborator would.
    let mut total = 0usize;
    {
        let payload = cache.payload_mut("bgm.theme")?;
        let stream = match payload {
            ResourcePayload::AudioTrack(stream) => stream,
            other => panic!("Expected track payload, got {other:?}"),
        };
        while let Some(block) = stream.next_block().unwrap() {
            total += block.len();
        }
    }
    assert_eq!(total, 1024 * 2);

    // The open handle is released through the lane like any other payload.
    cache.unload("bgm.theme")?;
    cache.remove("bgm.theme")?;
    assert!(cache.is_empty());

    Ok(())
}

#[test]
fn test_eviction_cycle_over_real_images() -> Result<()> {
    let dir = tempdir()?;
    let png = write_png(dir.path(), "tile.png", 4, 4);
    let wav = write_wav(dir.path(), "loop.wav", 64);

    let mut cache = real_cache();
    for i in 0..11 {
        cache.load(format!("tex.tile{i}"), ResourceKind::Image, &png)?;
    }
    cache.load("sfx.loop", ResourceKind::AudioClip, &wav)?;

    cache.check();

    // All decoded images reclaimed; the clip survives.
    assert_eq!(cache.len(), 1);
    assert!(cache.get("sfx.loop").is_ok());
    assert_eq!(cache.stats().evictions, 11);
    assert!(!cache.is_evicting());

    // The source is still on disk, so an evicted image can simply be
    // re-acquired.
    cache.load("tex.tile0", ResourceKind::Image, &png)?;
    assert!(cache.get("tex.tile0").is_ok());

    Ok(())
}
