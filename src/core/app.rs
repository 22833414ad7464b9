//! Scan flow: capture, downsample, recognize, display

use std::path::PathBuf;

use crate::capture::host::CaptureHost;
use crate::capture::image::decode_sampled;
use crate::capture::request::{CaptureReply, CaptureRequest, REQUEST_CAPTURE, crop_image_name};
use crate::config::Config;
use crate::core::view::ResultView;
use crate::ocr::OcrEngine;
use crate::ocr::TextExtractor;
use crate::ocr::tessdata::{self, DirSource, EmbeddedSource, InstallReport, Sources};

/// Language data sources for `config`: the bundled files, then `tessdata_source` if set
pub fn language_sources(config: &Config) -> Sources {
    let sources = Sources::new().with(EmbeddedSource);
    match &config.tessdata_source {
        Some(dir) => sources.with(DirSource::new(dir)),
        None => sources,
    }
}

/// Create the tessdata directory and install language data into it
pub fn prepare_tesseract(config: &Config, sources: &Sources) -> InstallReport {
    let dest = tessdata::tessdata_dir(&config.data_dir);
    tessdata::prepare_directory(&dest);
    let report = tessdata::install_all(sources, &dest);
    log::info!(
        "Language data: {} copied, {} already present, {} failed",
        report.copied.len(),
        report.skipped.len(),
        report.failed.len()
    );
    report
}

pub struct App<E: OcrEngine> {
    config: Config,
    extractor: TextExtractor<E>,
    view: ResultView,
}

impl<E: OcrEngine> App<E> {
    pub fn new(config: Config, engine: E) -> Self {
        let frame = config.display.preview_size(config.view_ratio);
        let extractor = TextExtractor::new(engine, config.language.clone());
        Self {
            config,
            extractor,
            view: ResultView::new(frame),
        }
    }

    pub fn view(&self) -> &ResultView {
        &self.view
    }

    /// Startup work: make sure language data is in place
    pub fn on_create(&mut self, sources: &Sources) -> InstallReport {
        prepare_tesseract(&self.config, sources)
    }

    /// Request for a new capture with a fresh, timestamped destination
    pub fn capture_request(&self) -> CaptureRequest {
        let destination: PathBuf = self.config.cache_dir.join(crop_image_name());
        CaptureRequest::create(destination)
            .with_view_ratio(self.config.view_ratio)
            .with_margin_camera_edge(self.config.margin_by_width, self.config.margin_by_height)
    }

    /// Issue a capture to `host` and handle whatever comes back
    pub fn on_capture_clicked<H: CaptureHost + ?Sized>(&mut self, host: &mut H) {
        let reply = self.capture_request().start(host);
        self.on_capture_reply(&reply);
    }

    /// Handle a host reply. Anything but a successful capture is ignored.
    pub fn on_capture_reply(&mut self, reply: &CaptureReply) {
        let Some(result) = reply.result_for(REQUEST_CAPTURE) else {
            log::debug!(
                "Ignoring capture reply {:?}: {:?}",
                reply.request_code,
                reply.outcome
            );
            return;
        };
        self.view.set_image(&result.output);
        log::info!("imageWidth: {}", result.width);
        log::info!("imageHeight: {}", result.height);

        let output = result.output.clone();
        self.start_ocr(&output);
    }

    fn start_ocr(&mut self, path: &std::path::Path) {
        let bitmap = match decode_sampled(path) {
            Ok(bitmap) => bitmap,
            Err(e) => {
                log::error!("{:#}", e);
                return;
            }
        };
        if let Some(text) = self.extractor.extract(&self.config.data_dir, &bitmap) {
            self.view.set_text(text);
        }
    }
}
