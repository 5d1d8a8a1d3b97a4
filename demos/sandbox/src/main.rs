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

// Calliope Sandbox
// Demo binary: drive the resource cache through a full lifecycle with the
// real decode lanes, the way an engine tick loop would.

use std::path::{Path, PathBuf};

use anyhow::Result;
use calliope_assets::ResourceCache;
use calliope_core::asset::{
    CacheConfig, RenderTargetData, ResourceKind, ResourcePayload,
};
use calliope_lanes::{ClipLane, ImageLane, TrackLane};

fn write_demo_png(dir: &Path, name: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    let img = image::RgbaImage::from_fn(32, 32, |x, y| {
        image::Rgba([(x * 8) as u8, (y * 8) as u8, 128, 255])
    });
    img.save_with_format(&path, image::ImageFormat::Png)?;
    Ok(path)
}

fn write_demo_wav(dir: &Path, name: &str, frames: u32) -> Result<PathBuf> {
    let path = dir.join(name);
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: 44_100,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec)?;
    for i in 0..frames {
        // A quiet sawtooth, enough to give the decoder real work.
        let s = ((i % 441) as i16 - 220) * 64;
        writer.write_sample(s)?;
        writer.write_sample(-s)?;
    }
    writer.finalize()?;
    Ok(path)
}

fn main() -> Result<()> {
    env_logger::init();

    log::info!("Sandbox: generating demo assets...");
    let dir = tempfile::tempdir()?;
    let png = write_demo_png(dir.path(), "tile.png")?;
    let wav = write_demo_wav(dir.path(), "theme.wav", 44_100)?;

    // --- Step 1: Build the cache and wire up the lanes ---
    let (sender, receiver) = crossbeam_channel::unbounded();
    let mut cache =
        ResourceCache::new(CacheConfig::with_high_watermark(10)).with_event_sender(sender);
    cache.register_lane(ResourceKind::Image, ImageLane::new());
    cache.register_lane(ResourceKind::AudioClip, ClipLane::new());
    cache.register_lane(ResourceKind::AudioTrack, TrackLane::new());

    // --- Step 2: Load assets the way a scene setup would ---
    cache.load("bgm.theme", ResourceKind::AudioTrack, &wav)?;
    cache.load("sfx.click", ResourceKind::AudioClip, &wav)?;
    for i in 0..12 {
        cache.load(format!("tex.tile{i}"), ResourceKind::Image, &png)?;
    }
    cache.register(
        "rt.minimap",
        ResourcePayload::RenderTarget(RenderTargetData::new(128, 128)),
    )?;
    log::info!("Sandbox: {} resources loaded", cache.len());

    // --- Step 3: Pump a few blocks of the streaming track ---
    if let ResourcePayload::AudioTrack(stream) = cache.payload_mut("bgm.theme")? {
        let spec = stream.spec();
        let mut decoded = 0usize;
        for _ in 0..4 {
            match stream.next_block().map_err(anyhow::Error::from_boxed)? {
                Some(block) => decoded += block.len(),
                None => break,
            }
        }
        log::info!(
            "Sandbox: decoded {decoded} samples at {} Hz x{}",
            spec.sample_rate,
            spec.channels
        );
    }

    // --- Step 4: Tick maintenance; the tile flood crosses the watermark ---
    for tick in 0..3 {
        cache.check();
        log::info!(
            "Sandbox: tick {tick}: {} resources, evicting={}",
            cache.len(),
            cache.is_evicting()
        );
    }

    let stats = cache.stats();
    log::info!(
        "Sandbox: stats: loads={} registered={} unloads={} evictions={} swept={}",
        stats.loads,
        stats.registered,
        stats.unloads,
        stats.evictions,
        stats.swept
    );

    // --- Step 5: Shut down and replay the event narration ---
    cache.clear();

    for event in receiver.try_iter() {
        log::debug!("Sandbox: event: {event:?}");
    }

    log::info!("Sandbox: done");
    Ok(())
}
