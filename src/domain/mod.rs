//! Pure domain types with minimal dependencies
//!
//! Types here have no knowledge of the capture host or the OCR engine.

pub mod geometry;

pub use geometry::*;
