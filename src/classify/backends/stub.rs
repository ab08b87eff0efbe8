//! Stub classifier for tests and demo runs.

use crate::classify::backend::ClassifierBackend;
use crate::classify::result::{Classification, ClassificationResult};
use crate::error::Error;
use crate::frame::Frame;

/// Stub backend returning canned ranked results.
///
/// Cycles through the configured result lists, one per frame. The default
/// script always reports a confident cat.
pub struct StubBackend {
    scripts: Vec<Vec<Classification>>,
    cursor: usize,
}

impl StubBackend {
    pub fn new() -> Self {
        Self::with_results(vec![vec![
            Classification::new("tabby, tabby cat", 0.58),
            Classification::new("tiger cat", 0.21),
            Classification::new("Egyptian cat", 0.08),
            Classification::new("window screen", 0.04),
        ]])
    }

    /// Cycle through the given result lists, one per classify call.
    ///
    /// An empty outer list makes every call fail with `NoResult`.
    pub fn with_results(scripts: Vec<Vec<Classification>>) -> Self {
        Self { scripts, cursor: 0 }
    }
}

impl Default for StubBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassifierBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn classify(&mut self, _frame: &Frame) -> Result<ClassificationResult, Error> {
        if self.scripts.is_empty() {
            return Err(Error::NoResult);
        }
        let labels = self.scripts[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.scripts.len();
        Ok(ClassificationResult::from_model_output(labels))
    }
}
