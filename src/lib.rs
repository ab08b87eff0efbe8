//! catwatch
//!
//! A live-camera "is this a cat?" spotter: capture frames, classify each
//! accepted frame, display a binary verdict.
//!
//! # Architecture
//!
//! - `capture`: frame sources (synthetic `stub://` camera, V4L2 devices
//!   behind the `ingest-v4l2` feature)
//! - `classify`: classifier backends (stub; tract ONNX behind
//!   `backend-tract`), center-crop preprocessing, verdict derivation
//! - `pipeline`: owned start/stop pipeline; a single-slot drop-if-busy gate
//!   between capture and inference, a single-slot verdict outbox toward the
//!   UI thread
//! - `display`: text display surface and the UI-thread consumer loop
//! - `config`: config file + environment overrides
//!
//! The load-shedding contract: frames arriving while an inference is in
//! flight are dropped, never queued, and at most one inference runs at any
//! time.

pub mod capture;
pub mod classify;
pub mod config;
pub mod display;
pub mod error;
pub mod frame;
pub mod pipeline;

pub use capture::{open_source, CameraConfig, CaptureSource, CaptureStats, SyntheticCamera};
#[cfg(feature = "ingest-v4l2")]
pub use capture::V4l2Camera;
pub use classify::{
    Classification, ClassificationResult, ClassifierBackend, StubBackend, Verdict,
    VERDICT_KEYWORD, VERDICT_TOP_K,
};
#[cfg(feature = "backend-tract")]
pub use classify::TractBackend;
pub use config::{AppConfig, CaptureSettings, ClassifySettings, QualityTier};
pub use display::{
    run_display_loop, verdict_text, ConsoleDisplay, TextDisplay, CAT_TEXT, NOT_CAT_TEXT,
};
pub use error::Error;
pub use frame::{CameraIntrinsics, Frame, Orientation, PixelFormat};
pub use pipeline::{InferenceGate, Pipeline, PipelineStats, VerdictOutbox};
