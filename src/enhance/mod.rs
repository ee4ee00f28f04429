// Speech enhancement adapter
//
// - Model: loading of the pre-trained network, done once per batch
// - Rnnoise: RNNoise-backed enhancer running inference over decoded audio
// - AudioIo: decoding, resampling and WAV output

pub mod audio_io;
pub mod model;
pub mod rnnoise;

use std::path::Path;

pub use model::*;
pub use rnnoise::*;

use crate::config::EnhanceConfig;
use crate::error::Result;

/// Runs the enhancement model over an audio file
#[cfg_attr(test, mockall::automock)]
pub trait Enhancer: Send + Sync {
    /// Native sample rate of the model; enhanced output is written at this rate
    fn sample_rate(&self) -> u32;

    /// Denoise `input_path` and write a WAV file to `output_path`
    fn enhance(&self, input_path: &Path, output_path: &Path) -> Result<()>;
}

/// Factory for creating enhancer instances
pub struct EnhancerFactory;

impl EnhancerFactory {
    /// Load the model once and wrap it in the default enhancer
    pub fn create(config: &EnhanceConfig, show_progress: bool) -> Result<Box<dyn Enhancer>> {
        let model = EnhancementModel::load(config.model_path.as_deref())?;
        Ok(Box::new(RnnoiseEnhancer::new(model, config.strength, show_progress)))
    }
}
