use thiserror::Error;

/// Pipeline error taxonomy.
///
/// Startup errors (`DeviceUnavailable`, `Configuration`) are fatal: they
/// abort `Pipeline::start` and are never retried. Per-frame errors
/// (`Inference`, `NoResult`) are isolated to their frame; the worker logs
/// them and moves on, leaving the previous verdict displayed.
#[derive(Debug, Error)]
pub enum Error {
    /// No capture device could be found or opened.
    #[error("no capture device available")]
    DeviceUnavailable,

    /// The capture session or classifier could not be configured.
    #[error("configuration failed: {0}")]
    Configuration(String),

    /// The device failed mid-run while delivering a frame.
    #[error("frame capture failed: {0}")]
    Capture(String),

    /// The classifier backend failed to process a frame.
    #[error("inference failed: {0}")]
    Inference(String),

    /// The classifier backend returned no usable classification.
    #[error("classifier returned no usable result")]
    NoResult,
}
