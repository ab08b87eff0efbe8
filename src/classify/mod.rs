//! Image classification: backends, preprocessing, verdict derivation.

mod backend;
mod backends;
pub mod preprocess;
mod result;

pub use backend::ClassifierBackend;
pub use backends::StubBackend;
#[cfg(feature = "backend-tract")]
pub use backends::TractBackend;
pub use result::{Classification, ClassificationResult, Verdict, VERDICT_KEYWORD, VERDICT_TOP_K};
