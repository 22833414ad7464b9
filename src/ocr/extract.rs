//! Single-shot text extraction with a scoped engine session

use std::path::Path;

use image::DynamicImage;

use super::engine::{OcrEngine, RecognitionSession};

/// Text reported when recognition itself fails
pub const EMPTY_RESULT: &str = "empty result";

/// Lifecycle of one recognition session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Initialized,
    ImageSet,
    TextExtracted,
    Ended,
}

/// Ends the wrapped session when dropped, whatever path was taken
struct ScopedSession<S: RecognitionSession> {
    session: S,
    state: SessionState,
}

impl<S: RecognitionSession> ScopedSession<S> {
    fn new(session: S) -> Self {
        Self {
            session,
            state: SessionState::Uninitialized,
        }
    }

    fn advance(&mut self, state: SessionState) {
        log::debug!("OCR session {:?} -> {:?}", self.state, state);
        self.state = state;
    }
}

impl<S: RecognitionSession> Drop for ScopedSession<S> {
    fn drop(&mut self) {
        self.session.end();
        self.advance(SessionState::Ended);
    }
}

/// Runs OCR for one image at a time, creating a new engine session per call
pub struct TextExtractor<E: OcrEngine> {
    engine: E,
    lang: String,
}

impl<E: OcrEngine> TextExtractor<E> {
    pub fn new(engine: E, lang: impl Into<String>) -> Self {
        Self {
            engine,
            lang: lang.into(),
        }
    }

    /// Recognize text in `image` using language data under `data_path`.
    ///
    /// Returns `None` when no session could be brought up. A failure after the
    /// session is initialized yields [`EMPTY_RESULT`]. The session is ended
    /// before this returns on every path.
    pub fn extract(&mut self, data_path: &Path, image: &DynamicImage) -> Option<String> {
        let session = match self.engine.create() {
            Ok(session) => session,
            Err(e) => {
                log::error!("OCR engine could not be created: {:#}", e);
                return None;
            }
        };
        let mut scoped = ScopedSession::new(session);

        if let Err(e) = scoped.session.init(data_path, &self.lang) {
            log::error!(
                "OCR engine failed to initialize with {} ({}): {:#}",
                data_path.display(),
                self.lang,
                e
            );
            return None;
        }
        scoped.advance(SessionState::Initialized);

        if let Err(e) = scoped.session.set_image(image) {
            log::error!("OCR engine rejected image: {:#}", e);
            return Some(EMPTY_RESULT.to_string());
        }
        scoped.advance(SessionState::ImageSet);

        let text = match scoped.session.utf8_text() {
            Ok(text) => text,
            Err(e) => {
                log::error!("Error in recognizing text: {:#}", e);
                EMPTY_RESULT.to_string()
            }
        };
        scoped.advance(SessionState::TextExtracted);
        Some(text)
    }
}
