#![cfg(feature = "ingest-v4l2")]

//! V4L2 camera source.
//!
//! Captures from a local V4L2 device node (e.g. /dev/video0), negotiates an
//! RGB3 capture format, and converts each buffer to the pipeline's BGRA
//! frame format.
//!
//! Failure mapping:
//! - missing device node -> `DeviceUnavailable` (fatal at startup)
//! - format/stream negotiation failure -> `Configuration` (fatal at startup)
//! - capture fault mid-run -> `Capture` (terminates the capture loop)

use std::io::ErrorKind;
use std::time::{Duration, Instant};

use ouroboros::self_referencing;

use super::normalize;
use super::{CameraConfig, CaptureSource, CaptureStats};
use crate::error::Error;
use crate::frame::Frame;

pub struct V4l2Camera {
    config: CameraConfig,
    state: Option<DeviceState>,
    frame_count: u64,
    last_frame_at: Option<Instant>,
    last_error: Option<String>,
    active_width: u32,
    active_height: u32,
}

#[self_referencing]
struct DeviceState {
    device: v4l::Device,
    #[borrows(mut device)]
    #[covariant]
    stream: v4l::prelude::MmapStream<'this, v4l::Device>,
}

impl V4l2Camera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            active_width: config.width,
            active_height: config.height,
            config,
            state: None,
            frame_count: 0,
            last_frame_at: None,
            last_error: None,
        }
    }

    fn health_grace(&self) -> Duration {
        let base_ms = if self.config.target_fps == 0 {
            2_000
        } else {
            (1000 / self.config.target_fps).saturating_mul(6)
        };
        Duration::from_millis(base_ms.max(2_000) as u64)
    }
}

impl CaptureSource for V4l2Camera {
    fn name(&self) -> &'static str {
        "v4l2"
    }

    fn connect(&mut self) -> Result<(), Error> {
        use v4l::buffer::Type;
        use v4l::video::Capture;

        let mut device = v4l::Device::with_path(&self.config.device).map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                Error::DeviceUnavailable
            } else {
                Error::Configuration(format!(
                    "open v4l2 device {}: {}",
                    self.config.device, err
                ))
            }
        })?;

        let mut format = device
            .format()
            .map_err(|err| Error::Configuration(format!("read v4l2 format: {}", err)))?;
        format.width = self.config.width;
        format.height = self.config.height;
        format.fourcc = v4l::FourCC::new(b"RGB3");

        let format = match device.set_format(&format) {
            Ok(format) => format,
            Err(err) => {
                log::warn!(
                    "V4l2Camera: failed to set format on {}: {}",
                    self.config.device,
                    err
                );
                device.format().map_err(|err| {
                    Error::Configuration(format!("read v4l2 format after set failure: {}", err))
                })?
            }
        };
        if &format.fourcc.repr != b"RGB3" {
            return Err(Error::Configuration(format!(
                "device {} does not deliver RGB3 (got {})",
                self.config.device, format.fourcc
            )));
        }

        if self.config.target_fps > 0 {
            let params = v4l::video::capture::Parameters::with_fps(self.config.target_fps);
            if let Err(err) = device.set_params(&params) {
                log::warn!(
                    "V4l2Camera: failed to set fps on {}: {}",
                    self.config.device,
                    err
                );
            }
        }

        self.active_width = format.width;
        self.active_height = format.height;
        self.last_error = None;

        let state = DeviceStateTryBuilder {
            device,
            stream_builder: |device| {
                v4l::prelude::MmapStream::with_buffers(device, Type::VideoCapture, 4)
                    .map_err(|err| Error::Configuration(format!("create v4l2 buffer stream: {}", err)))
            },
        }
        .try_build()
        .map_err(|err| {
            self.last_error = Some(err.to_string());
            err
        })?;
        self.state = Some(state);

        log::info!(
            "V4l2Camera: connected to {} ({}x{})",
            self.config.device,
            self.active_width,
            self.active_height
        );
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Frame, Error> {
        use v4l::io::traits::CaptureStream;

        let state = self
            .state
            .as_mut()
            .ok_or_else(|| Error::Capture("v4l2 device not connected".to_string()))?;
        let width = self.active_width;
        let height = self.active_height;

        let bgra = state
            .with_stream_mut(|stream| {
                let (buf, _meta) = stream
                    .next()
                    .map_err(|err| Error::Capture(format!("capture v4l2 frame: {}", err)))?;
                normalize::rgb24_to_bgra(buf, width, height)
            })
            .map_err(|err| {
                self.last_error = Some(err.to_string());
                err
            })?;

        self.frame_count += 1;
        self.last_frame_at = Some(Instant::now());

        Frame::new(bgra, width, height)
    }

    fn is_healthy(&self) -> bool {
        if self.last_error.is_some() {
            return false;
        }
        let Some(last_frame_at) = self.last_frame_at else {
            return true;
        };
        last_frame_at.elapsed() <= self.health_grace()
    }

    fn stats(&self) -> CaptureStats {
        CaptureStats {
            frames_captured: self.frame_count,
            device: self.config.device.clone(),
        }
    }
}
