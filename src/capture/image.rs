//! Loading captured images at reduced resolution

use std::path::Path;

use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, Limits};

/// Each output pixel covers a `SAMPLE_SIZE`x`SAMPLE_SIZE` block of the source.
/// 1 would mean full size. Values below 4 need much more memory for large photos.
pub const SAMPLE_SIZE: u32 = 4;

/// Largest allocation the decoder may make for one photo
pub const MAX_DECODE_BYTES: u64 = 256 * 1024 * 1024;

/// Dimensions of a `width`x`height` image after sampling
pub fn sampled_dimensions(width: u32, height: u32) -> (u32, u32) {
    (
        width.div_ceil(SAMPLE_SIZE).max(1),
        height.div_ceil(SAMPLE_SIZE).max(1),
    )
}

/// Decode the image at `path` downsampled by [`SAMPLE_SIZE`].
///
/// The `image` decoders cannot subsample while decoding, so the photo is
/// decoded at full size first and only the sampled copy is kept. Peak memory
/// is bounded by [`MAX_DECODE_BYTES`]; larger photos fail to decode.
pub fn decode_sampled(path: &Path) -> Result<DynamicImage> {
    decode_sampled_within(path, MAX_DECODE_BYTES)
}

fn decode_sampled_within(path: &Path, max_alloc: u64) -> Result<DynamicImage> {
    let mut reader = ImageReader::open(path)
        .with_context(|| format!("Failed to open image {}", path.display()))?
        .with_guessed_format()
        .with_context(|| format!("Failed to read image {}", path.display()))?;
    let mut limits = Limits::default();
    limits.max_alloc = Some(max_alloc);
    reader.limits(limits);

    let full = reader
        .decode()
        .with_context(|| format!("Failed to decode image {}", path.display()))?;
    let (width, height) = sampled_dimensions(full.width(), full.height());
    log::debug!(
        "Sampling {}x{} image down to {}x{}",
        full.width(),
        full.height(),
        width,
        height
    );
    Ok(full.resize_exact(width, height, FilterType::Triangle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampled_dimensions_bounded_by_ceil() {
        for (w, h) in [(640, 480), (1, 1), (7, 3), (4001, 2999)] {
            let (sw, sh) = sampled_dimensions(w, h);
            assert!(sw <= w.div_ceil(4));
            assert!(sh <= h.div_ceil(4));
        }
        assert_eq!(sampled_dimensions(640, 480), (160, 120));
    }

    #[test]
    fn test_decode_sampled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        image::RgbImage::new(101, 50).save(&path).unwrap();

        let img = decode_sampled(&path).unwrap();
        assert_eq!((img.width(), img.height()), (26, 13));
    }

    #[test]
    fn test_decode_over_allocation_limit_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.png");
        image::RgbImage::new(256, 256).save(&path).unwrap();

        assert!(decode_sampled_within(&path, 1024).is_err());
        assert!(decode_sampled_within(&path, MAX_DECODE_BYTES).is_ok());
    }

    #[test]
    fn test_decode_sampled_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();
        assert!(decode_sampled(&path).is_err());
    }
}
