//! Camera frame types.
//!
//! A `Frame` is one captured image buffer, handed from a capture source to
//! the classifier. Frames are owned transiently: each is classified exactly
//! once or dropped, and is never buffered or re-delivered.

use std::time::Instant;

use crate::error::Error;

/// Pixel formats accepted by the pipeline.
///
/// Capture is fixed to 32-bit BGRA; sources convert whatever the device
/// delivers before constructing a `Frame` (see `capture::normalize`).
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PixelFormat {
    #[default]
    Bgra32,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Bgra32 => 4,
        }
    }
}

/// Frame orientation. Capture is fixed to portrait.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Portrait,
}

/// Camera intrinsics a source may attach to its frames.
///
/// Passed through to classifier backends; backends without geometric
/// correction ignore them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraIntrinsics {
    pub focal_x: f32,
    pub focal_y: f32,
    pub center_x: f32,
    pub center_y: f32,
}

/// One captured image buffer.
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    format: PixelFormat,
    orientation: Orientation,
    captured_at: Instant,
    intrinsics: Option<CameraIntrinsics>,
}

impl Frame {
    /// Construct a BGRA frame. Called by capture sources.
    ///
    /// The buffer length is validated against the dimensions here, so
    /// downstream consumers can rely on it.
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Result<Self, Error> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(PixelFormat::Bgra32.bytes_per_pixel()))
            .ok_or_else(|| Error::Capture("frame dimensions overflow".to_string()))?;
        if data.len() != expected {
            return Err(Error::Capture(format!(
                "BGRA frame length mismatch: expected {}, got {}",
                expected,
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            format: PixelFormat::Bgra32,
            orientation: Orientation::Portrait,
            captured_at: Instant::now(),
            intrinsics: None,
        })
    }

    /// Attach camera intrinsics reported by the device.
    pub fn with_intrinsics(mut self, intrinsics: CameraIntrinsics) -> Self {
        self.intrinsics = Some(intrinsics);
        self
    }

    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Monotonic capture instant.
    pub fn captured_at(&self) -> Instant {
        self.captured_at
    }

    pub fn intrinsics(&self) -> Option<CameraIntrinsics> {
        self.intrinsics
    }
}
