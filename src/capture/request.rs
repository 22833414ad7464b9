//! Typed request/reply pair exchanged with a capture host
//!
//! A [`CaptureRequest`] is built once per capture action and handed to a
//! [`CaptureHost`](super::host::CaptureHost). The host answers with a
//! [`CaptureReply`] carrying the same request code. Both halves also have a
//! flat key/value form ([`Extras`]) for hosts that speak loosely-typed bundles.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::host::CaptureHost;

/// Request code used when none is given explicitly
pub const REQUEST_CAPTURE: RequestCode = RequestCode(10);

/// Frame ratio (height / width) when the caller does not set one
pub const DEFAULT_VIEW_RATIO: f32 = 0.5;

pub const EXTRA_VIEW_RATIO: &str = "viewRatio";
pub const EXTRA_OUTPUT_URI: &str = "outputUri";
pub const EXTRA_OUTPUT_IMAGE_WIDTH: &str = "imageWidth";
pub const EXTRA_OUTPUT_IMAGE_HEIGHT: &str = "imageHeight";
pub const EXTRA_MARGIN_BY_WIDTH: &str = "marginByWidth";
pub const EXTRA_MARGIN_BY_HEIGHT: &str = "marginByHeight";

/// Flat key/value bundle form of a request or result
pub type Extras = serde_json::Map<String, serde_json::Value>;

/// Correlates a reply with the request that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestCode(pub i32);

/// Horizontal and vertical pixel insets from the camera edge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margins {
    pub by_width: i32,
    pub by_height: i32,
}

/// A single capture request. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRequest {
    destination: PathBuf,
    view_ratio: f32,
    margins: Margins,
}

impl CaptureRequest {
    /// Start building a request that writes the captured image to `destination`
    pub fn create(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            view_ratio: DEFAULT_VIEW_RATIO,
            margins: Margins::default(),
        }
    }

    /// Set the height/width ratio of the capture frame
    pub fn with_view_ratio(mut self, ratio: f32) -> Self {
        self.view_ratio = ratio;
        self
    }

    /// Set the insets from the left/right and top/bottom camera edges
    pub fn with_margin_camera_edge(mut self, left_right: i32, top_bottom: i32) -> Self {
        self.margins = Margins {
            by_width: left_right,
            by_height: top_bottom,
        };
        self
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn view_ratio(&self) -> f32 {
        self.view_ratio
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    /// Hand the request to `host` using [`REQUEST_CAPTURE`]
    pub fn start<H: CaptureHost + ?Sized>(self, host: &mut H) -> CaptureReply {
        self.start_with_code(host, REQUEST_CAPTURE)
    }

    /// Hand the request to `host` under a caller-chosen request code
    pub fn start_with_code<H: CaptureHost + ?Sized>(
        self,
        host: &mut H,
        code: RequestCode,
    ) -> CaptureReply {
        log::debug!(
            "Starting capture {:?} -> {} (ratio {}, margins {:?})",
            code,
            self.destination.display(),
            self.view_ratio,
            self.margins
        );
        let outcome = host.capture(&self);
        CaptureReply {
            request_code: code,
            outcome,
        }
    }

    /// Encode as a flat bundle
    pub fn to_extras(&self) -> Extras {
        let mut extras = Extras::new();
        extras.insert(
            EXTRA_OUTPUT_URI.into(),
            self.destination.to_string_lossy().into_owned().into(),
        );
        extras.insert(EXTRA_VIEW_RATIO.into(), f64::from(self.view_ratio).into());
        extras.insert(EXTRA_MARGIN_BY_WIDTH.into(), self.margins.by_width.into());
        extras.insert(EXTRA_MARGIN_BY_HEIGHT.into(), self.margins.by_height.into());
        extras
    }

    /// Decode from a flat bundle. Only the output location is required.
    pub fn from_extras(extras: &Extras) -> Result<Self> {
        let destination = extras
            .get(EXTRA_OUTPUT_URI)
            .and_then(|v| v.as_str())
            .context("Capture request is missing its output location")?;
        let view_ratio = extras
            .get(EXTRA_VIEW_RATIO)
            .and_then(|v| v.as_f64())
            .map_or(DEFAULT_VIEW_RATIO, |r| r as f32);
        Ok(Self {
            destination: PathBuf::from(destination),
            view_ratio,
            margins: Margins {
                by_width: int_extra(extras, EXTRA_MARGIN_BY_WIDTH),
                by_height: int_extra(extras, EXTRA_MARGIN_BY_HEIGHT),
            },
        })
    }
}

/// Image written by the host for a successful capture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureResult {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl CaptureResult {
    pub fn to_extras(&self) -> Extras {
        let mut extras = Extras::new();
        extras.insert(
            EXTRA_OUTPUT_URI.into(),
            self.output.to_string_lossy().into_owned().into(),
        );
        extras.insert(EXTRA_OUTPUT_IMAGE_WIDTH.into(), self.width.into());
        extras.insert(EXTRA_OUTPUT_IMAGE_HEIGHT.into(), self.height.into());
        extras
    }

    /// Decode from a flat bundle. Missing dimensions read as 0.
    pub fn from_extras(extras: &Extras) -> Result<Self> {
        let output = extras
            .get(EXTRA_OUTPUT_URI)
            .and_then(|v| v.as_str())
            .context("Capture result is missing its output location")?;
        Ok(Self {
            output: PathBuf::from(output),
            width: int_extra(extras, EXTRA_OUTPUT_IMAGE_WIDTH).max(0) as u32,
            height: int_extra(extras, EXTRA_OUTPUT_IMAGE_HEIGHT).max(0) as u32,
        })
    }
}

fn int_extra(extras: &Extras, key: &str) -> i32 {
    extras
        .get(key)
        .and_then(|v| v.as_i64())
        .and_then(|v| i32::try_from(v).ok())
        .unwrap_or(0)
}

/// What the host did with a request
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    Success(CaptureResult),
    Cancelled,
    Other,
}

/// Host answer, tagged with the code of the request it answers
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureReply {
    pub request_code: RequestCode,
    pub outcome: CaptureOutcome,
}

impl CaptureReply {
    /// The result, if this reply is a success for `expected`
    pub fn result_for(&self, expected: RequestCode) -> Option<&CaptureResult> {
        match &self.outcome {
            CaptureOutcome::Success(result) if self.request_code == expected => Some(result),
            _ => None,
        }
    }
}

/// Unique destination file name for a capture taken now
pub fn crop_image_name() -> String {
    format!("cropImage_{}.png", chrono::Local::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let request = CaptureRequest::create("/tmp/out.png");
        assert_eq!(request.view_ratio(), DEFAULT_VIEW_RATIO);
        assert_eq!(request.margins(), Margins::default());
        assert_eq!(request.destination(), Path::new("/tmp/out.png"));
    }

    #[test]
    fn test_request_extras_preserve_ratio_and_margins() {
        for (ratio, lr, tb) in [(0.5_f32, 50, 50), (0.25, 0, 120), (1.75, 33, 7), (0.1, -4, 0)] {
            let request = CaptureRequest::create("/cache/cropImage_1.png")
                .with_view_ratio(ratio)
                .with_margin_camera_edge(lr, tb);
            let decoded = CaptureRequest::from_extras(&request.to_extras()).unwrap();
            assert_eq!(decoded.view_ratio(), ratio);
            assert_eq!(decoded.margins(), Margins { by_width: lr, by_height: tb });
            assert_eq!(decoded, request);
        }
    }

    #[test]
    fn test_request_extras_use_wire_keys() {
        let extras = CaptureRequest::create("/a.png")
            .with_margin_camera_edge(1, 2)
            .to_extras();
        assert_eq!(extras[EXTRA_OUTPUT_URI], "/a.png");
        assert_eq!(extras[EXTRA_MARGIN_BY_WIDTH], 1);
        assert_eq!(extras[EXTRA_MARGIN_BY_HEIGHT], 2);
        assert!(extras.contains_key(EXTRA_VIEW_RATIO));
    }

    #[test]
    fn test_request_without_output_is_rejected() {
        assert!(CaptureRequest::from_extras(&Extras::new()).is_err());
    }

    #[test]
    fn test_result_extras_preserve_output_and_dimensions() {
        let result = CaptureResult {
            output: "/cache/cropImage_7.png".into(),
            width: 1280,
            height: 640,
        };
        let extras = result.to_extras();
        assert_eq!(extras[EXTRA_OUTPUT_IMAGE_WIDTH], 1280);
        assert_eq!(extras[EXTRA_OUTPUT_IMAGE_HEIGHT], 640);
        assert_eq!(CaptureResult::from_extras(&extras).unwrap(), result);
    }

    /// Host that records requests and answers with a fixed outcome
    struct RecordingHost {
        seen: Vec<CaptureRequest>,
        outcome: CaptureOutcome,
    }

    impl CaptureHost for RecordingHost {
        fn capture(&mut self, request: &CaptureRequest) -> CaptureOutcome {
            self.seen.push(request.clone());
            self.outcome.clone()
        }
    }

    #[test]
    fn test_start_with_code_tags_reply() {
        let mut host = RecordingHost {
            seen: Vec::new(),
            outcome: CaptureOutcome::Cancelled,
        };
        let request = CaptureRequest::create("/a.png").with_view_ratio(0.25);
        let reply = request.clone().start_with_code(&mut host, RequestCode(42));

        assert_eq!(reply.request_code, RequestCode(42));
        assert_eq!(reply.outcome, CaptureOutcome::Cancelled);
        assert_eq!(host.seen, vec![request]);

        let reply = CaptureRequest::create("/b.png").start(&mut host);
        assert_eq!(reply.request_code, REQUEST_CAPTURE);
    }

    #[test]
    fn test_result_missing_dimensions_read_as_zero() {
        let mut extras = Extras::new();
        extras.insert(EXTRA_OUTPUT_URI.into(), "/x.png".into());
        let result = CaptureResult::from_extras(&extras).unwrap();
        assert_eq!((result.width, result.height), (0, 0));
    }

    #[test]
    fn test_reply_result_requires_matching_code() {
        let result = CaptureResult {
            output: "/x.png".into(),
            width: 10,
            height: 5,
        };
        let reply = CaptureReply {
            request_code: REQUEST_CAPTURE,
            outcome: CaptureOutcome::Success(result.clone()),
        };
        assert_eq!(reply.result_for(REQUEST_CAPTURE), Some(&result));
        assert_eq!(reply.result_for(RequestCode(11)), None);

        let cancelled = CaptureReply {
            request_code: REQUEST_CAPTURE,
            outcome: CaptureOutcome::Cancelled,
        };
        assert_eq!(cancelled.result_for(REQUEST_CAPTURE), None);
    }

    #[test]
    fn test_crop_image_name_shape() {
        let name = crop_image_name();
        assert!(name.starts_with("cropImage_"));
        assert!(name.ends_with(".png"));
    }
}
