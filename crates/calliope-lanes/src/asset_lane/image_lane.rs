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

//! Image acquisition.

use std::error::Error;
use std::path::Path;

use anyhow::Context;
use calliope_core::asset::{ImageData, ResourcePayload};

use super::{read_source, AcquireLane};

/// A lane dedicated to reading and decoding image files on the CPU.
#[derive(Debug, Default, Clone)]
pub struct ImageLane;

impl ImageLane {
    /// Creates a new instance of `ImageLane`.
    pub fn new() -> Self {
        Self
    }
}

impl AcquireLane for ImageLane {
    fn acquire(&self, locator: &Path) -> Result<ResourcePayload, Box<dyn Error + Send + Sync>> {
        let bytes = read_source(locator)?;

        // Decode the image using the `image` crate
        let img = image::load_from_memory(&bytes).context("Failed to decode image from memory")?;

        // Convert to RGBA8 (keep in sRGB space)
        let rgba_img = img.to_rgba8();
        let (width, height) = rgba_img.dimensions();

        log::debug!(
            "ImageLane: decoded '{}' ({}x{}, {} bytes)",
            locator.display(),
            width,
            height,
            rgba_img.len()
        );

        Ok(ResourcePayload::Image(ImageData::new(
            rgba_img.into_raw(),
            width,
            height,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbaImage};

    fn write_test_png(dir: &Path, name: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let img = RgbaImage::from_fn(4, 2, |x, _| image::Rgba([x as u8 * 10, 0, 0, 255]));
        img.save_with_format(&path, ImageFormat::Png).unwrap();
        path
    }

    #[test]
    fn decodes_png_to_rgba8() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_png(dir.path(), "strip.png");

        let payload = ImageLane::new().acquire(&path).unwrap();
        match payload {
            ResourcePayload::Image(data) => {
                assert_eq!(data.width, 4);
                assert_eq!(data.height, 2);
                assert_eq!(data.byte_len(), 4 * 2 * 4);
            }
            other => panic!("Expected image payload, got {other:?}"),
        }
    }

    #[test]
    fn rejects_non_image_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.png");
        std::fs::write(&path, b"not an image at all").unwrap();

        assert!(ImageLane::new().acquire(&path).is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.png");

        let err = ImageLane::new().acquire(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to read source"));
    }
}
