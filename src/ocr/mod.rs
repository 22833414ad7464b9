//! Text recognition
//!
//! - Engine and session traits plus the Tesseract backend (engine.rs)
//! - Scoped single-shot extraction (extract.rs)
//! - Language data installation (tessdata.rs)

pub mod engine;
pub mod extract;
pub mod tessdata;

pub use engine::{OcrEngine, RecognitionSession, TesseractEngine, TesseractOptions};
pub use extract::{EMPTY_RESULT, TextExtractor};
