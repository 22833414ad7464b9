//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;

/// Crop a photo to a capture frame and read its text with Tesseract.
#[derive(Parser)]
#[command(name = "snapocr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "SNAPOCR_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Capture a photo, crop it and print the recognized text
    Scan {
        /// Photo to use as the captured frame
        photo: PathBuf,
    },

    /// Install language data into the data directory
    Install,

    /// Print the effective configuration
    Config {
        /// Also write it to the config file
        #[arg(long)]
        save: bool,
    },
}

/// Per-run overrides of config values
#[derive(Args, Default)]
pub struct Overrides {
    /// Base data directory (language data goes in its tessdata/ folder)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Directory for cropped captures
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Tesseract language code
    #[arg(long, short = 'l', global = true)]
    pub lang: Option<String>,

    /// Capture frame height / width
    #[arg(long, global = true)]
    pub ratio: Option<f32>,

    /// Left/right margin from the camera edge, in pixels
    #[arg(long, global = true)]
    pub margin_width: Option<i32>,

    /// Top/bottom margin from the camera edge, in pixels
    #[arg(long, global = true)]
    pub margin_height: Option<i32>,

    /// Extra directory of language data to install
    #[arg(long, global = true)]
    pub tessdata_source: Option<PathBuf>,

    /// Tesseract page segmentation mode
    #[arg(long, global = true)]
    pub psm: Option<i32>,

    /// Tesseract OCR engine mode
    #[arg(long, global = true)]
    pub oem: Option<i32>,
}

impl Overrides {
    pub fn apply(self, config: &mut Config) {
        if let Some(v) = self.data_dir {
            config.data_dir = v;
        }
        if let Some(v) = self.cache_dir {
            config.cache_dir = v;
        }
        if let Some(v) = self.lang {
            config.language = v;
        }
        if let Some(v) = self.ratio {
            config.view_ratio = v;
        }
        if let Some(v) = self.margin_width {
            config.margin_by_width = v;
        }
        if let Some(v) = self.margin_height {
            config.margin_by_height = v;
        }
        if self.tessdata_source.is_some() {
            config.tessdata_source = self.tessdata_source;
        }
        if self.psm.is_some() {
            config.psm = self.psm;
        }
        if self.oem.is_some() {
            config.oem = self.oem;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scan_with_overrides() {
        let cli = Cli::parse_from([
            "snapocr", "scan", "photo.jpg", "--ratio", "0.3", "-l", "deu", "--json",
        ]);
        assert!(cli.json);
        match &cli.command {
            Commands::Scan { photo } => assert_eq!(photo, &PathBuf::from("photo.jpg")),
            _ => panic!("expected scan"),
        }

        let mut config = Config::default();
        cli.overrides.apply(&mut config);
        assert_eq!(config.view_ratio, 0.3);
        assert_eq!(config.language, "deu");
        assert_eq!(config.margin_by_width, 50);
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
