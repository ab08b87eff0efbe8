//! End-to-end pipeline tests on the synthetic camera and stub classifier.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use catwatch::{
    open_source, CameraConfig, CaptureSource, CaptureStats, Classification, ClassificationResult,
    ClassifierBackend, Error, Frame, Pipeline, StubBackend, Verdict, VerdictOutbox,
};

fn camera(device: &str) -> CameraConfig {
    CameraConfig {
        device: device.to_string(),
        target_fps: 0,
        width: 32,
        height: 48,
    }
}

fn wait_for_verdict(outbox: &VerdictOutbox, timeout: Duration) -> Option<Verdict> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(verdict) = outbox.take() {
            return Some(verdict);
        }
        if Instant::now() >= deadline {
            return None;
        }
        thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn synthetic_run_reaches_a_cat_verdict() {
    let source = open_source(&camera("stub://test")).unwrap();
    let backend = Box::new(StubBackend::new());

    let mut pipeline = Pipeline::start(source, backend).unwrap();
    let verdict = wait_for_verdict(&pipeline.outbox(), Duration::from_secs(2));
    assert_eq!(verdict, Some(Verdict::Cat));

    pipeline.stop();
    let stats = pipeline.stats();
    assert!(stats.frames_captured >= 1);
    assert!(stats.frames_classified >= 1);
    assert_eq!(stats.inference_failures, 0);
}

#[test]
fn negative_labels_produce_a_negative_verdict() {
    let source = open_source(&camera("stub://test")).unwrap();
    let backend = Box::new(StubBackend::with_results(vec![vec![
        Classification::new("dog", 0.8),
        Classification::new("car", 0.1),
        Classification::new("tree", 0.05),
        Classification::new("chair", 0.05),
    ]]));

    let mut pipeline = Pipeline::start(source, backend).unwrap();
    let verdict = wait_for_verdict(&pipeline.outbox(), Duration::from_secs(2));
    assert_eq!(verdict, Some(Verdict::NotCat));
    pipeline.stop();
}

struct SlowBackend;

impl ClassifierBackend for SlowBackend {
    fn name(&self) -> &'static str {
        "slow"
    }

    fn classify(&mut self, _frame: &Frame) -> Result<ClassificationResult, Error> {
        thread::sleep(Duration::from_millis(50));
        Ok(ClassificationResult::from_model_output(vec![
            Classification::new("tabby", 0.9),
        ]))
    }
}

#[test]
fn frames_arriving_mid_inference_are_dropped() {
    // Unpaced synthetic camera against a slow classifier: most frames must
    // be shed at the gate rather than queued.
    let source = open_source(&camera("stub://test")).unwrap();
    let mut pipeline = Pipeline::start(source, Box::new(SlowBackend)).unwrap();

    thread::sleep(Duration::from_millis(300));
    pipeline.stop();

    let stats = pipeline.stats();
    assert!(stats.frames_dropped >= 1, "stats: {:?}", stats);
    // Everything captured was either classified, dropped, or at most one
    // frame was in flight at shutdown.
    assert!(stats.frames_classified + stats.frames_dropped <= stats.frames_captured);
    assert!(stats.frames_classified < stats.frames_captured);
}

struct UnavailableSource;

impl CaptureSource for UnavailableSource {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn connect(&mut self) -> Result<(), Error> {
        Err(Error::DeviceUnavailable)
    }

    fn next_frame(&mut self) -> Result<Frame, Error> {
        Err(Error::Capture("no device".to_string()))
    }

    fn stats(&self) -> CaptureStats {
        CaptureStats {
            frames_captured: 0,
            device: "unavailable".to_string(),
        }
    }
}

struct CountingBackend {
    calls: Arc<AtomicU64>,
}

impl ClassifierBackend for CountingBackend {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn classify(&mut self, _frame: &Frame) -> Result<ClassificationResult, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ClassificationResult::default())
    }

    fn warm_up(&mut self) -> Result<(), Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[test]
fn startup_failure_never_touches_the_classifier() {
    let calls = Arc::new(AtomicU64::new(0));
    let backend = Box::new(CountingBackend {
        calls: calls.clone(),
    });

    let result = Pipeline::start(Box::new(UnavailableSource), backend);
    assert!(matches!(result, Err(Error::DeviceUnavailable)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn stop_is_idempotent_and_joins_cleanly() {
    let source = open_source(&camera("stub://test")).unwrap();
    let mut pipeline = Pipeline::start(source, Box::new(StubBackend::new())).unwrap();
    pipeline.stop();
    pipeline.stop();
}
