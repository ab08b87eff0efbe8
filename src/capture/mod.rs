//! Frame capture sources.
//!
//! Sources produce portrait BGRA `Frame`s for the pipeline:
//! - `stub://` device paths select the synthetic camera (tests, demo runs)
//! - real V4L2 device nodes (feature: ingest-v4l2)
//!
//! A source is responsible for:
//! - Delivering frames in capture order, each frame exactly once
//! - Converting device output to the fixed BGRA pixel format
//! - Stamping capture time at acquisition
//!
//! Late-frame discard is not a source concern: the pipeline's gate drops
//! frames that arrive while an inference is in flight.

pub(crate) mod normalize;
mod synthetic;
#[cfg(feature = "ingest-v4l2")]
pub mod v4l2;

pub use synthetic::SyntheticCamera;
#[cfg(feature = "ingest-v4l2")]
pub use v4l2::V4l2Camera;

use crate::error::Error;
use crate::frame::Frame;

/// Configuration for a capture source.
#[derive(Clone, Debug)]
pub struct CameraConfig {
    /// Device path (e.g. "/dev/video0", or "stub://camera" for synthetic).
    pub device: String,
    /// Target frame rate (frames per second). 0 means unpaced.
    pub target_fps: u32,
    /// Preferred frame width.
    pub width: u32,
    /// Preferred frame height.
    pub height: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: "stub://camera".to_string(),
            target_fps: 30,
            width: 480,
            height: 640,
        }
    }
}

/// A live frame source.
pub trait CaptureSource: Send {
    /// Source identifier for logs.
    fn name(&self) -> &'static str;

    /// Open the device and negotiate the capture format.
    fn connect(&mut self) -> Result<(), Error>;

    /// Capture the next frame. Blocks until the device delivers one.
    fn next_frame(&mut self) -> Result<Frame, Error>;

    /// Check if the source is healthy.
    fn is_healthy(&self) -> bool {
        true
    }

    /// Get frame statistics.
    fn stats(&self) -> CaptureStats;
}

/// Statistics for a capture source.
#[derive(Clone, Debug)]
pub struct CaptureStats {
    pub frames_captured: u64,
    pub device: String,
}

/// Open the capture source named by the config's device path.
///
/// Fails with `DeviceUnavailable` when the path names no usable device.
pub fn open_source(config: &CameraConfig) -> Result<Box<dyn CaptureSource>, Error> {
    if config.device.trim().is_empty() {
        return Err(Error::DeviceUnavailable);
    }
    if config.device.starts_with("stub://") {
        return Ok(Box::new(SyntheticCamera::new(config.clone())));
    }
    #[cfg(feature = "ingest-v4l2")]
    {
        Ok(Box::new(V4l2Camera::new(config.clone())))
    }
    #[cfg(not(feature = "ingest-v4l2"))]
    {
        Err(Error::DeviceUnavailable)
    }
}
