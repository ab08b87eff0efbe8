//! catwatch - live camera cat spotter
//!
//! Captures frames from the configured camera, classifies each accepted
//! frame, and prints the verdict whenever it changes. Runs until ctrl-c or
//! the optional duration elapses.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Parser;

use catwatch::{
    open_source, run_display_loop, AppConfig, ClassifierBackend, ClassifySettings, ConsoleDisplay,
    Pipeline, StubBackend,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Capture device path (stub:// selects the synthetic camera).
    #[arg(long)]
    device: Option<String>,
    /// Classifier backend (stub, tract).
    #[arg(long)]
    backend: Option<String>,
    /// ONNX model path (tract backend).
    #[arg(long)]
    model: Option<PathBuf>,
    /// Labels file, one label per line (tract backend).
    #[arg(long)]
    labels: Option<PathBuf>,
    /// Target capture rate in frames per second (0 = unpaced).
    #[arg(long)]
    fps: Option<u32>,
    /// Run duration in seconds (0 = until ctrl-c).
    #[arg(long, default_value_t = 0)]
    seconds: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut cfg = AppConfig::load()?;
    if let Some(device) = args.device {
        cfg.capture.device = device;
    }
    if let Some(fps) = args.fps {
        cfg.capture.target_fps = fps;
    }
    if let Some(backend) = args.backend {
        cfg.classify.backend = backend;
    }
    if let Some(model) = args.model {
        cfg.classify.model_path = Some(model);
    }
    if let Some(labels) = args.labels {
        cfg.classify.labels_path = Some(labels);
    }
    cfg.validate()?;

    let source = open_source(&cfg.capture.camera_config())?;
    let backend = build_backend(&cfg.classify)?;

    let mut pipeline = Pipeline::start(source, backend)?;
    log::info!(
        "watching {} with the {} backend",
        cfg.capture.device,
        cfg.classify.backend
    );

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))?;
    }
    if args.seconds > 0 {
        let running = running.clone();
        let seconds = args.seconds;
        thread::spawn(move || {
            thread::sleep(Duration::from_secs(seconds));
            running.store(false, Ordering::SeqCst);
        });
    }

    // The main thread is the UI-owning context.
    let outbox = pipeline.outbox();
    let mut display = ConsoleDisplay::default();
    run_display_loop(&outbox, &mut display, &running, Duration::from_millis(33));

    pipeline.stop();
    let stats = pipeline.stats();
    println!("summary:");
    println!("  frames captured: {}", stats.frames_captured);
    println!("  frames dropped (inference busy): {}", stats.frames_dropped);
    println!("  frames classified: {}", stats.frames_classified);
    println!("  inference failures: {}", stats.inference_failures);
    Ok(())
}

fn build_backend(settings: &ClassifySettings) -> Result<Box<dyn ClassifierBackend>> {
    match settings.backend.as_str() {
        "stub" => Ok(Box::new(StubBackend::new())),
        #[cfg(feature = "backend-tract")]
        "tract" => {
            let model = settings
                .model_path
                .as_ref()
                .ok_or_else(|| anyhow!("tract backend requires a model path"))?;
            let labels = settings
                .labels_path
                .as_ref()
                .ok_or_else(|| anyhow!("tract backend requires a labels path"))?;
            Ok(Box::new(catwatch::TractBackend::new(
                model,
                labels,
                settings.input_width,
                settings.input_height,
            )?))
        }
        #[cfg(not(feature = "backend-tract"))]
        "tract" => Err(anyhow!(
            "tract backend requires building with the backend-tract feature"
        )),
        other => Err(anyhow!("unknown classifier backend '{}'", other)),
    }
}
