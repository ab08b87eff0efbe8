use crate::classify::result::ClassificationResult;
use crate::error::Error;
use crate::frame::Frame;

/// Classifier backend trait.
///
/// The pipeline worker hands a backend one frame at a time; at most one
/// `classify` call runs at any moment. Implementations must treat the frame
/// as read-only and ephemeral and must not retain it beyond the call.
///
/// Frames may carry camera intrinsics; backends that perform no geometric
/// correction ignore them.
pub trait ClassifierBackend: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Classify one frame into a ranked label list.
    ///
    /// Returns `Error::Inference` when the backend cannot process the frame
    /// and `Error::NoResult` when it produced nothing usable. Either way the
    /// frame's result is discarded and the pipeline continues.
    fn classify(&mut self, frame: &Frame) -> Result<ClassificationResult, Error>;

    /// Optional warm-up hook, called once before the first frame.
    fn warm_up(&mut self) -> Result<(), Error> {
        Ok(())
    }
}
