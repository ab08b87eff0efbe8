//! Capture-to-verdict pipeline.
//!
//! An explicitly owned pipeline with a start/stop lifecycle:
//!
//! capture thread -> `InferenceGate` (drop-if-busy) -> inference worker ->
//! `VerdictOutbox` -> UI thread
//!
//! Startup errors (device unavailable, configuration failure) abort
//! `Pipeline::start` before any thread spawns and before the classifier
//! sees a frame. Per-frame inference errors are logged and skipped; the
//! previously published verdict stands.

mod gate;
mod outbox;

pub use gate::InferenceGate;
pub use outbox::VerdictOutbox;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::capture::CaptureSource;
use crate::classify::{ClassifierBackend, Verdict};
use crate::error::Error;
use crate::frame::Frame;

/// Aggregate pipeline counters.
#[derive(Clone, Debug, Default)]
pub struct PipelineStats {
    /// Frames delivered by the capture source.
    pub frames_captured: u64,
    /// Frames dropped because an inference was in flight.
    pub frames_dropped: u64,
    /// Frames classified successfully.
    pub frames_classified: u64,
    /// Frames whose inference failed or produced no result.
    pub inference_failures: u64,
}

#[derive(Default)]
struct WorkerCounters {
    captured: AtomicU64,
    classified: AtomicU64,
    failures: AtomicU64,
}

pub struct Pipeline {
    gate: Arc<InferenceGate>,
    outbox: Arc<VerdictOutbox>,
    running: Arc<AtomicBool>,
    counters: Arc<WorkerCounters>,
    capture: Option<JoinHandle<()>>,
    worker: Option<JoinHandle<()>>,
}

impl Pipeline {
    /// Connect the source, warm up the backend, and start the capture and
    /// inference threads.
    ///
    /// Source startup failures abort here; the classifier is never invoked
    /// for a session whose capture could not start.
    pub fn start(
        mut source: Box<dyn CaptureSource>,
        mut backend: Box<dyn ClassifierBackend>,
    ) -> Result<Self, Error> {
        source.connect()?;
        backend.warm_up()?;

        let gate = Arc::new(InferenceGate::new());
        let outbox = Arc::new(VerdictOutbox::new());
        let running = Arc::new(AtomicBool::new(true));
        let counters = Arc::new(WorkerCounters::default());

        let capture = {
            let gate = gate.clone();
            let running = running.clone();
            let counters = counters.clone();
            std::thread::Builder::new()
                .name("catwatch-capture".to_string())
                .spawn(move || capture_loop(source, &gate, &running, &counters))
                .map_err(|err| {
                    Error::Configuration(format!("failed to spawn capture thread: {}", err))
                })?
        };

        let worker = {
            let gate = gate.clone();
            let outbox = outbox.clone();
            let counters = counters.clone();
            std::thread::Builder::new()
                .name("catwatch-inference".to_string())
                .spawn(move || worker_loop(backend, &gate, &outbox, &counters))
                .map_err(|err| {
                    Error::Configuration(format!("failed to spawn inference thread: {}", err))
                })?
        };

        Ok(Self {
            gate,
            outbox,
            running,
            counters,
            capture: Some(capture),
            worker: Some(worker),
        })
    }

    /// Handle for the UI thread to consume verdicts from.
    pub fn outbox(&self) -> Arc<VerdictOutbox> {
        self.outbox.clone()
    }

    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            frames_captured: self.counters.captured.load(Ordering::Relaxed),
            frames_dropped: self.gate.dropped(),
            frames_classified: self.counters.classified.load(Ordering::Relaxed),
            inference_failures: self.counters.failures.load(Ordering::Relaxed),
        }
    }

    /// Stop capture, close the gate, and join both threads. Idempotent.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        self.gate.close();
        if let Some(handle) = self.capture.take() {
            let _ = handle.join();
        }
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.stop();
    }
}

fn capture_loop(
    mut source: Box<dyn CaptureSource>,
    gate: &InferenceGate,
    running: &AtomicBool,
    counters: &WorkerCounters,
) {
    while running.load(Ordering::SeqCst) {
        match source.next_frame() {
            Ok(frame) => {
                counters.captured.fetch_add(1, Ordering::Relaxed);
                if !gate.submit(frame) {
                    log::trace!("frame dropped: inference in flight");
                }
            }
            Err(err) => {
                log::error!("{}: capture failed, stopping capture: {}", source.name(), err);
                break;
            }
        }
    }
}

fn worker_loop(
    mut backend: Box<dyn ClassifierBackend>,
    gate: &InferenceGate,
    outbox: &VerdictOutbox,
    counters: &WorkerCounters,
) {
    while let Some(frame) = gate.recv() {
        if let Some(verdict) = process_frame(backend.as_mut(), &frame, counters) {
            outbox.publish(verdict);
        }
        gate.finish();
    }
}

/// Per-frame inference policy: a verdict on success, None on backend
/// failure or empty output. None leaves the previously published verdict
/// untouched.
fn process_frame(
    backend: &mut dyn ClassifierBackend,
    frame: &Frame,
    counters: &WorkerCounters,
) -> Option<Verdict> {
    match backend.classify(frame) {
        Ok(result) if result.is_empty() => {
            counters.failures.fetch_add(1, Ordering::Relaxed);
            log::warn!("{}: classifier returned no results", backend.name());
            None
        }
        Ok(result) => {
            counters.classified.fetch_add(1, Ordering::Relaxed);
            Some(Verdict::from_ranked(&result))
        }
        Err(err) => {
            counters.failures.fetch_add(1, Ordering::Relaxed);
            log::error!("{}: {}", backend.name(), err);
            None
        }
    }
}
