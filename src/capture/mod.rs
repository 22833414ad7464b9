//! Image capture
//!
//! This module consolidates:
//! - Capture request/reply types (request.rs)
//! - Capture hosts (host.rs)
//! - Downsampled image loading (image.rs)

pub mod host;
pub mod image;
pub mod request;
