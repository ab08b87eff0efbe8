use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::capture::CameraConfig;

const DEFAULT_DEVICE: &str = "stub://camera";
const DEFAULT_TARGET_FPS: u32 = 30;
const DEFAULT_BACKEND: &str = "stub";
const DEFAULT_MODEL_INPUT_WIDTH: u32 = 224;
const DEFAULT_MODEL_INPUT_HEIGHT: u32 = 224;

#[derive(Debug, Deserialize, Default)]
struct AppConfigFile {
    capture: Option<CaptureConfigFile>,
    classify: Option<ClassifyConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct CaptureConfigFile {
    device: Option<String>,
    target_fps: Option<u32>,
    quality: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
struct ClassifyConfigFile {
    backend: Option<String>,
    model_path: Option<PathBuf>,
    labels_path: Option<PathBuf>,
    input_width: Option<u32>,
    input_height: Option<u32>,
}

/// Capture quality tier, supplying portrait default dimensions when the
/// config does not name explicit ones.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QualityTier {
    Low,
    Medium,
    #[default]
    High,
}

impl QualityTier {
    fn parse(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "low" => Ok(QualityTier::Low),
            "medium" => Ok(QualityTier::Medium),
            "high" => Ok(QualityTier::High),
            other => Err(anyhow!("unknown quality tier '{}'", other)),
        }
    }

    /// Portrait capture dimensions for the tier.
    pub fn frame_size(self) -> (u32, u32) {
        match self {
            QualityTier::Low => (240, 320),
            QualityTier::Medium => (480, 640),
            QualityTier::High => (720, 1280),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub capture: CaptureSettings,
    pub classify: ClassifySettings,
}

#[derive(Clone, Debug)]
pub struct CaptureSettings {
    pub device: String,
    pub target_fps: u32,
    pub quality: QualityTier,
    pub width: u32,
    pub height: u32,
}

impl CaptureSettings {
    pub fn camera_config(&self) -> CameraConfig {
        CameraConfig {
            device: self.device.clone(),
            target_fps: self.target_fps,
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ClassifySettings {
    pub backend: String,
    pub model_path: Option<PathBuf>,
    pub labels_path: Option<PathBuf>,
    pub input_width: u32,
    pub input_height: u32,
}

impl AppConfig {
    /// Load configuration: `CATWATCH_CONFIG` file (JSON), then environment
    /// overrides, then validation.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("CATWATCH_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default())?;
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: AppConfigFile) -> Result<Self> {
        let capture_file = file.capture.unwrap_or_default();
        let quality = match capture_file.quality.as_deref() {
            Some(value) => QualityTier::parse(value)?,
            None => QualityTier::default(),
        };
        let (default_width, default_height) = quality.frame_size();
        let capture = CaptureSettings {
            device: capture_file
                .device
                .unwrap_or_else(|| DEFAULT_DEVICE.to_string()),
            target_fps: capture_file.target_fps.unwrap_or(DEFAULT_TARGET_FPS),
            quality,
            width: capture_file.width.unwrap_or(default_width),
            height: capture_file.height.unwrap_or(default_height),
        };

        let classify_file = file.classify.unwrap_or_default();
        let classify = ClassifySettings {
            backend: classify_file
                .backend
                .unwrap_or_else(|| DEFAULT_BACKEND.to_string()),
            model_path: classify_file.model_path,
            labels_path: classify_file.labels_path,
            input_width: classify_file.input_width.unwrap_or(DEFAULT_MODEL_INPUT_WIDTH),
            input_height: classify_file
                .input_height
                .unwrap_or(DEFAULT_MODEL_INPUT_HEIGHT),
        };

        Ok(Self { capture, classify })
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(device) = std::env::var("CATWATCH_DEVICE") {
            if !device.trim().is_empty() {
                self.capture.device = device;
            }
        }
        if let Ok(fps) = std::env::var("CATWATCH_TARGET_FPS") {
            let fps: u32 = fps
                .parse()
                .map_err(|_| anyhow!("CATWATCH_TARGET_FPS must be an integer"))?;
            self.capture.target_fps = fps;
        }
        if let Ok(backend) = std::env::var("CATWATCH_BACKEND") {
            if !backend.trim().is_empty() {
                self.classify.backend = backend;
            }
        }
        if let Ok(path) = std::env::var("CATWATCH_MODEL_PATH") {
            if !path.trim().is_empty() {
                self.classify.model_path = Some(PathBuf::from(path));
            }
        }
        if let Ok(path) = std::env::var("CATWATCH_LABELS_PATH") {
            if !path.trim().is_empty() {
                self.classify.labels_path = Some(PathBuf::from(path));
            }
        }
        Ok(())
    }

    /// Validate the assembled configuration. Called by `load`; call again
    /// after applying command-line overrides.
    pub fn validate(&self) -> Result<()> {
        if self.capture.width == 0 || self.capture.height == 0 {
            return Err(anyhow!("capture dimensions must be greater than zero"));
        }
        if self.classify.input_width == 0 || self.classify.input_height == 0 {
            return Err(anyhow!("model input dimensions must be greater than zero"));
        }
        match self.classify.backend.as_str() {
            "stub" => {}
            "tract" => {
                if self.classify.model_path.is_none() {
                    return Err(anyhow!("tract backend requires a model path"));
                }
                if self.classify.labels_path.is_none() {
                    return Err(anyhow!("tract backend requires a labels path"));
                }
            }
            other => return Err(anyhow!("unknown classifier backend '{}'", other)),
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<AppConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
