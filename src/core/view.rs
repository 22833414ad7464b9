//! What the user sees after a scan

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::Size;

/// Captured image and recognized text, as last displayed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultView {
    pub image: Option<PathBuf>,
    pub text: String,
    /// Size the image is shown at (screen width by width * ratio)
    #[serde(skip)]
    pub frame: Size,
}

impl ResultView {
    pub fn new(frame: Size) -> Self {
        Self {
            frame,
            ..Self::default()
        }
    }

    pub fn set_image(&mut self, path: &Path) {
        self.image = Some(path.to_path_buf());
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Render for the terminal
    pub fn render(&self, json: bool) -> String {
        if json {
            return serde_json::to_string_pretty(self).unwrap_or_default();
        }
        let mut out = String::new();
        if let Some(image) = &self.image {
            out.push_str(&format!(
                "Image: {} ({}x{})\n",
                image.display(),
                self.frame.width,
                self.frame.height
            ));
        }
        out.push_str(self.text.trim_end());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_plain() {
        let mut view = ResultView::new(Size { width: 100, height: 50 });
        view.set_image(Path::new("/c/cropImage_1.png"));
        view.set_text("Hello\n\n");
        assert_eq!(view.render(false), "Image: /c/cropImage_1.png (100x50)\nHello");
    }

    #[test]
    fn test_render_json() {
        let mut view = ResultView::default();
        view.set_text("abc");
        let value: serde_json::Value = serde_json::from_str(&view.render(true)).unwrap();
        assert_eq!(value["text"], "abc");
        assert!(value["image"].is_null());
    }
}
