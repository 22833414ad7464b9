//! Capture a photo through a cropping frame and read its text with Tesseract.
//!
//! The flow is strictly sequential: a [`capture::request::CaptureRequest`] goes
//! to a [`capture::host::CaptureHost`], the cropped image comes back, is loaded
//! at a quarter of its resolution and handed to an [`ocr::OcrEngine`] session.

pub mod capture;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod ocr;
