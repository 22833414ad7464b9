//! Core application module
//!
//! This module contains:
//! - The scan flow driving capture, OCR and display (app.rs)
//! - The result view (view.rs)

pub mod app;
pub mod view;
