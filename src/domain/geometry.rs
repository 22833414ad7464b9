//! Geometric types and display unit helpers for capture framing

use serde::{Deserialize, Serialize};

/// Pixel rectangle, right/bottom exclusive
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// Create a new rectangle from coordinates
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Get the width of the rectangle
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Get the height of the rectangle
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Shrink the rectangle by `dx` on the left/right and `dy` on the top/bottom.
    ///
    /// Insets are clamped so at least one pixel remains on each axis.
    pub fn inset(&self, dx: i32, dy: i32) -> Rect {
        let dx = dx.clamp(0, ((self.width() - 1) / 2).max(0));
        let dy = dy.clamp(0, ((self.height() - 1) / 2).max(0));
        Rect {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right - dx,
            bottom: self.bottom - dy,
        }
    }
}

/// Width and height in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

/// Rectangle of size `w`x`h` centered in a `view_width`x`view_height` box
pub fn center_screen_rect(view_width: i32, view_height: i32, w: i32, h: i32) -> Rect {
    let left = view_width / 2 - w / 2;
    let top = view_height / 2 - h / 2;
    Rect::new(left, top, left + w, top + h)
}

/// Largest frame with height/width `ratio` that fits a `pic_x`x`pic_y` picture.
///
/// `camera_ratio` is the preview's own height/width. When the requested frame
/// is taller than the preview the picture height is the limit, otherwise the width.
pub fn center_picture_rect(ratio: f32, camera_ratio: f32, pic_x: i32, pic_y: i32) -> Size {
    if ratio > camera_ratio {
        Size {
            width: (pic_y as f32 / ratio) as i32,
            height: pic_y,
        }
    } else {
        Size {
            width: pic_x,
            height: (pic_x as f32 * ratio) as i32,
        }
    }
}

/// Host display dimensions and density scale
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayMetrics {
    pub width_pixels: i32,
    pub height_pixels: i32,
    /// Pixels per density-independent unit
    pub density: f32,
}

impl Default for DisplayMetrics {
    fn default() -> Self {
        Self {
            width_pixels: 1080,
            height_pixels: 1920,
            density: 1.0,
        }
    }
}

impl DisplayMetrics {
    pub fn screen_width(&self) -> f32 {
        self.width_pixels as f32
    }

    pub fn screen_height(&self) -> f32 {
        self.height_pixels as f32
    }

    /// Convert pixels to density-independent units, rounding half up
    pub fn px_to_dp(&self, px: f32) -> i32 {
        (px / self.density + 0.5) as i32
    }

    /// Convert density-independent units to pixels, rounding half up
    pub fn dp_to_px(&self, dp: f32) -> i32 {
        (dp * self.density + 0.5) as i32
    }

    /// Size of the on-screen preview frame: full screen width by `width * ratio`
    pub fn preview_size(&self, ratio: f32) -> Size {
        let width = self.screen_width() as i32;
        Size {
            width,
            height: (width as f32 * ratio) as i32,
        }
    }
}
