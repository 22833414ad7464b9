//! Capture hosts: whatever shows the camera frame and writes the cropped image

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::GenericImageView;

use super::request::{CaptureOutcome, CaptureRequest, CaptureResult};
use crate::domain::{Rect, center_picture_rect};

/// Displays a capture UI for a request and reports what happened
pub trait CaptureHost {
    fn capture(&mut self, request: &CaptureRequest) -> CaptureOutcome;
}

/// Host that treats an existing photo as the captured frame.
///
/// The photo is cropped to the largest centered region with the requested
/// ratio, inset by the request margins, and written as PNG to the destination.
#[derive(Debug, Clone)]
pub struct CropHost {
    source: PathBuf,
}

impl CropHost {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }

    fn crop_to(&self, request: &CaptureRequest) -> Result<CaptureResult> {
        let photo = image::open(&self.source)
            .with_context(|| format!("Failed to open photo {}", self.source.display()))?;
        let (width, height) = photo.dimensions();
        let frame = crop_frame(request, width, height)?;
        log::debug!("Cropping {}x{} photo to {:?}", width, height, frame);

        let cropped = photo.crop_imm(
            frame.left as u32,
            frame.top as u32,
            frame.width() as u32,
            frame.height() as u32,
        );
        write_png(&cropped, request.destination())?;

        Ok(CaptureResult {
            output: request.destination().to_path_buf(),
            width: cropped.width(),
            height: cropped.height(),
        })
    }
}

impl CaptureHost for CropHost {
    fn capture(&mut self, request: &CaptureRequest) -> CaptureOutcome {
        match self.crop_to(request) {
            Ok(result) => CaptureOutcome::Success(result),
            Err(e) => {
                log::error!("Capture failed: {:#}", e);
                CaptureOutcome::Other
            }
        }
    }
}

/// Region of a `width`x`height` picture covered by the request's frame
pub fn crop_frame(request: &CaptureRequest, width: u32, height: u32) -> Result<Rect> {
    let ratio = request.view_ratio();
    if !(ratio.is_finite() && ratio > 0.0) {
        anyhow::bail!("Invalid view ratio {}", ratio);
    }
    if width == 0 || height == 0 {
        anyhow::bail!("Photo has no pixels");
    }

    let (pic_x, pic_y) = (width as i32, height as i32);
    let camera_ratio = pic_y as f32 / pic_x as f32;
    let size = center_picture_rect(ratio, camera_ratio, pic_x, pic_y);
    let (frame_w, frame_h) = (size.width.clamp(1, pic_x), size.height.clamp(1, pic_y));
    let left = (pic_x - frame_w) / 2;
    let top = (pic_y - frame_h) / 2;

    let margins = request.margins();
    let frame = Rect::new(left, top, left + frame_w, top + frame_h);
    Ok(frame.inset(margins.by_width, margins.by_height))
}

fn write_png(img: &image::DynamicImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    img.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", path.display()))
}
