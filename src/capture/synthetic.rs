//! Synthetic camera for `stub://` device paths.
//!
//! Produces a deterministic BGRA test pattern, paced to the configured
//! frame rate. The pattern shifts every few frames so consecutive frames
//! are not identical.

use std::thread;
use std::time::Duration;

use super::{CameraConfig, CaptureSource, CaptureStats};
use crate::error::Error;
use crate::frame::Frame;

const SCENE_SHIFT_INTERVAL: u64 = 50;

pub struct SyntheticCamera {
    config: CameraConfig,
    frame_count: u64,
    scene_state: u8,
    connected: bool,
}

impl SyntheticCamera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            frame_count: 0,
            scene_state: 0,
            connected: false,
        }
    }

    /// Generate one BGRA test-pattern frame.
    fn generate_pixels(&mut self) -> Vec<u8> {
        let pixel_count = (self.config.width * self.config.height) as usize;

        if self.frame_count % SCENE_SHIFT_INTERVAL == 0 {
            self.scene_state = self.scene_state.wrapping_add(1);
        }

        let mut pixels = vec![0u8; pixel_count * 4];
        for (i, bgra) in pixels.chunks_exact_mut(4).enumerate() {
            let v = ((i as u64 + self.frame_count + self.scene_state as u64) % 256) as u8;
            bgra[0] = v;
            bgra[1] = v.wrapping_add(85);
            bgra[2] = v.wrapping_add(170);
            bgra[3] = 0xFF;
        }
        pixels
    }
}

impl CaptureSource for SyntheticCamera {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    fn connect(&mut self) -> Result<(), Error> {
        self.connected = true;
        log::info!(
            "SyntheticCamera: connected to {} ({}x{})",
            self.config.device,
            self.config.width,
            self.config.height
        );
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Frame, Error> {
        if !self.connected {
            return Err(Error::Capture("synthetic camera not connected".to_string()));
        }

        // Pace delivery to the target rate, like a real device would.
        if self.config.target_fps > 0 {
            thread::sleep(Duration::from_millis(
                (1000 / self.config.target_fps.max(1)) as u64,
            ));
        }

        self.frame_count += 1;
        let pixels = self.generate_pixels();
        Frame::new(pixels, self.config.width, self.config.height)
    }

    fn stats(&self) -> CaptureStats {
        CaptureStats {
            frames_captured: self.frame_count,
            device: self.config.device.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub_config() -> CameraConfig {
        CameraConfig {
            device: "stub://test".to_string(),
            target_fps: 0,
            width: 8,
            height: 12,
        }
    }

    #[test]
    fn produces_frames_after_connect() -> Result<(), Error> {
        let mut source = SyntheticCamera::new(stub_config());
        source.connect()?;

        let frame = source.next_frame()?;
        assert_eq!(frame.width(), 8);
        assert_eq!(frame.height(), 12);
        assert_eq!(frame.pixels().len(), 8 * 12 * 4);
        assert_eq!(source.stats().frames_captured, 1);
        Ok(())
    }

    #[test]
    fn fails_before_connect() {
        let mut source = SyntheticCamera::new(stub_config());
        assert!(matches!(source.next_frame(), Err(Error::Capture(_))));
    }

    #[test]
    fn consecutive_frames_differ() -> Result<(), Error> {
        let mut source = SyntheticCamera::new(stub_config());
        source.connect()?;

        let first = source.next_frame()?;
        let second = source.next_frame()?;
        assert_ne!(first.pixels(), second.pixels());
        Ok(())
    }
}
