//! OCR engine seam and the Tesseract backend

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use image::DynamicImage;

/// Directory under the data path that holds installed language data
pub const TESSDATA: &str = "tessdata";

/// Creates recognition sessions
pub trait OcrEngine {
    type Session: RecognitionSession;

    /// Construct a fresh, uninitialized session
    fn create(&self) -> Result<Self::Session>;
}

/// One engine handle, used for exactly one image
pub trait RecognitionSession {
    /// Configure with the data path (parent of `tessdata/`) and a language code
    fn init(&mut self, data_path: &Path, lang: &str) -> Result<()>;

    fn set_image(&mut self, image: &DynamicImage) -> Result<()>;

    /// Recognized text of the current image
    fn utf8_text(&mut self) -> Result<String>;

    /// Release engine resources. Called once per session.
    fn end(&mut self);
}

/// Tesseract page segmentation and engine mode overrides
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TesseractOptions {
    pub psm: Option<i32>,
    pub oem: Option<i32>,
}

/// Engine backed by the system `tesseract` binary
#[derive(Debug, Clone, Default)]
pub struct TesseractEngine {
    options: TesseractOptions,
}

impl TesseractEngine {
    pub fn new(options: TesseractOptions) -> Self {
        Self { options }
    }
}

impl OcrEngine for TesseractEngine {
    type Session = TesseractSession;

    fn create(&self) -> Result<TesseractSession> {
        let version = rusty_tesseract::get_tesseract_version()
            .map_err(|e| anyhow::anyhow!("Tesseract is not available: {}", e))?;
        log::debug!("Using {}", version.lines().next().unwrap_or("tesseract"));
        Ok(TesseractSession {
            options: self.options,
            tessdata_dir: None,
            lang: String::new(),
            image: None,
        })
    }
}

pub struct TesseractSession {
    options: TesseractOptions,
    tessdata_dir: Option<PathBuf>,
    lang: String,
    image: Option<tempfile::NamedTempFile>,
}

impl RecognitionSession for TesseractSession {
    fn init(&mut self, data_path: &Path, lang: &str) -> Result<()> {
        let tessdata_dir = data_path.join(TESSDATA);
        let traineddata = tessdata_dir.join(format!("{lang}.traineddata"));
        if !traineddata.is_file() {
            anyhow::bail!("Language data {} is not installed", traineddata.display());
        }
        self.tessdata_dir = Some(tessdata_dir);
        self.lang = lang.to_string();
        Ok(())
    }

    fn set_image(&mut self, image: &DynamicImage) -> Result<()> {
        let mut file = tempfile::Builder::new()
            .prefix("snapocr-")
            .suffix(".png")
            .tempfile()
            .context("Failed to create temporary image")?;
        image
            .write_to(file.as_file_mut(), image::ImageFormat::Png)
            .context("Failed to encode image for tesseract")?;
        self.image = Some(file);
        Ok(())
    }

    fn utf8_text(&mut self) -> Result<String> {
        let image = self.image.as_ref().context("No image set")?;
        let tessdata_dir = self.tessdata_dir.as_ref().context("Session not initialized")?;

        let mut command = Command::new("tesseract");
        command
            .arg(image.path())
            .arg("stdout")
            .arg("--tessdata-dir")
            .arg(tessdata_dir)
            .arg("-l")
            .arg(&self.lang);
        if let Some(psm) = self.options.psm {
            command.arg("--psm").arg(psm.to_string());
        }
        if let Some(oem) = self.options.oem {
            command.arg("--oem").arg(oem.to_string());
        }

        let output = command.output().context("Failed to run tesseract")?;
        if !output.status.success() {
            anyhow::bail!(
                "tesseract exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        String::from_utf8(output.stdout).context("Tesseract output is not UTF-8")
    }

    fn end(&mut self) {
        // Dropping the temp file removes it
        self.image = None;
        self.tessdata_dir = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> TesseractSession {
        TesseractSession {
            options: TesseractOptions::default(),
            tessdata_dir: None,
            lang: String::new(),
            image: None,
        }
    }

    #[test]
    fn test_init_requires_traineddata() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session();
        assert!(session.init(dir.path(), "eng").is_err());

        std::fs::create_dir_all(dir.path().join(TESSDATA)).unwrap();
        std::fs::write(dir.path().join(TESSDATA).join("eng.traineddata"), b"data").unwrap();
        assert!(session.init(dir.path(), "eng").is_ok());
    }

    #[test]
    fn test_text_without_image_fails() {
        let mut session = session();
        assert!(session.utf8_text().is_err());
    }

    #[test]
    fn test_end_removes_temp_image() {
        let mut session = session();
        session.set_image(&DynamicImage::new_rgb8(4, 4)).unwrap();
        let path = session.image.as_ref().unwrap().path().to_path_buf();
        assert!(path.exists());
        session.end();
        assert!(!path.exists());
    }
}
