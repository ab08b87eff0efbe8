#![cfg(feature = "backend-tract")]

//! Tract-based classifier backend for ONNX models.
//!
//! Loads a local model file plus a labels file (one label per line) and
//! performs inference on center-cropped frames. No network I/O; disk access
//! is limited to model loading.

use std::fs;
use std::path::Path;

use tract_onnx::prelude::*;

use crate::classify::backend::ClassifierBackend;
use crate::classify::preprocess;
use crate::classify::result::{Classification, ClassificationResult};
use crate::error::Error;
use crate::frame::Frame;

/// Ranked entries kept per frame.
const RANKED_LIMIT: usize = 5;

pub struct TractBackend {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>,
    labels: Vec<String>,
    input_width: u32,
    input_height: u32,
}

impl TractBackend {
    /// Load an ONNX classifier and its labels file.
    pub fn new<P: AsRef<Path>>(
        model_path: P,
        labels_path: P,
        input_width: u32,
        input_height: u32,
    ) -> Result<Self, Error> {
        let labels = load_labels(labels_path.as_ref())?;

        let model_path = model_path.as_ref();
        let model = tract_onnx::onnx()
            .model_for_path(model_path)
            .map_err(|err| {
                Error::Configuration(format!(
                    "failed to load ONNX model from {}: {}",
                    model_path.display(),
                    err
                ))
            })?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(
                    f32::datum_type(),
                    tvec!(1, 3, input_height as usize, input_width as usize),
                ),
            )
            .map_err(|err| Error::Configuration(format!("failed to set input fact: {}", err)))?
            .into_optimized()
            .map_err(|err| Error::Configuration(format!("failed to optimize ONNX model: {}", err)))?
            .into_runnable()
            .map_err(|err| {
                Error::Configuration(format!("failed to build runnable ONNX model: {}", err))
            })?;

        Ok(Self {
            model,
            labels,
            input_width,
            input_height,
        })
    }

    fn build_input(&self, image: &image::RgbImage) -> Tensor {
        let (width, height) = image.dimensions();
        tract_ndarray::Array4::from_shape_fn(
            (1, 3, height as usize, width as usize),
            |(_, channel, y, x)| image.get_pixel(x as u32, y as u32)[channel] as f32 / 255.0,
        )
        .into_tensor()
    }

    fn rank_outputs(&self, outputs: TVec<TValue>) -> Result<ClassificationResult, Error> {
        let output = outputs.first().ok_or(Error::NoResult)?;
        let scores = output
            .to_array_view::<f32>()
            .map_err(|err| Error::Inference(format!("model output tensor was not f32: {}", err)))?;

        let labeled: Vec<Classification> = scores
            .iter()
            .zip(self.labels.iter())
            .map(|(score, label)| Classification::new(label.clone(), *score))
            .collect();
        if labeled.is_empty() {
            return Err(Error::NoResult);
        }

        let ranked = ClassificationResult::from_model_output(labeled);
        Ok(ClassificationResult::from_model_output(
            ranked.top(RANKED_LIMIT).to_vec(),
        ))
    }
}

impl ClassifierBackend for TractBackend {
    fn name(&self) -> &'static str {
        "tract"
    }

    fn classify(&mut self, frame: &Frame) -> Result<ClassificationResult, Error> {
        let image = preprocess::center_crop_and_scale(frame, self.input_width, self.input_height)?;
        let input = self.build_input(&image);
        let outputs = self
            .model
            .run(tvec!(input.into_tvalue()))
            .map_err(|err| Error::Inference(format!("ONNX inference failed: {}", err)))?;
        self.rank_outputs(outputs)
    }
}

fn load_labels(path: &Path) -> Result<Vec<String>, Error> {
    let raw = fs::read_to_string(path).map_err(|err| {
        Error::Configuration(format!(
            "failed to read labels file {}: {}",
            path.display(),
            err
        ))
    })?;
    let labels: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    if labels.is_empty() {
        return Err(Error::Configuration(format!(
            "labels file {} contains no labels",
            path.display()
        )));
    }
    Ok(labels)
}
