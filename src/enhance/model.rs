use std::path::{Path, PathBuf};

use nnnoiseless::{DenoiseState, RnnModel};
use tracing::info;

use crate::error::{DfmError, Result};

/// Native sample rate of the RNNoise network
pub const MODEL_SAMPLE_RATE: u32 = 48000;

/// Samples per inference frame (10 ms at 48 kHz)
pub const FRAME_SIZE: usize = 480;

#[derive(Clone)]
enum ModelSource {
    Builtin,
    Weights { path: PathBuf, weights: RnnModel },
}

/// Loaded model handle, shared by every file of a batch
#[derive(Clone)]
pub struct EnhancementModel {
    source: ModelSource,
}

impl std::fmt::Debug for EnhancementModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source = match &self.source {
            ModelSource::Builtin => "builtin".to_string(),
            ModelSource::Weights { path, .. } => path.display().to_string(),
        };
        f.debug_struct("EnhancementModel").field("source", &source).finish()
    }
}

impl EnhancementModel {
    /// Load the built-in weights, or a weights file when `weights_path` is given
    pub fn load(weights_path: Option<&Path>) -> Result<Self> {
        let source = match weights_path {
            None => ModelSource::Builtin,
            Some(path) => {
                let bytes = std::fs::read(path).map_err(|e| {
                    DfmError::Enhancement(format!("failed to read model {}: {}", path.display(), e))
                })?;
                let weights = RnnModel::from_bytes(&bytes).ok_or_else(|| {
                    DfmError::Enhancement(format!("{} is not a valid RNNoise weights file", path.display()))
                })?;
                ModelSource::Weights {
                    path: path.to_path_buf(),
                    weights,
                }
            }
        };

        let model = Self { source };
        info!("Loaded enhancement model: {}", model.describe());
        Ok(model)
    }

    pub fn sample_rate(&self) -> u32 {
        MODEL_SAMPLE_RATE
    }

    pub fn describe(&self) -> String {
        match &self.source {
            ModelSource::Builtin => "RNNoise (built-in weights)".to_string(),
            ModelSource::Weights { path, .. } => format!("RNNoise ({})", path.display()),
        }
    }

    /// Fresh recurrent state; one is needed per audio channel
    pub fn new_state(&self) -> Box<DenoiseState<'_>> {
        match &self.source {
            ModelSource::Builtin => DenoiseState::new(),
            ModelSource::Weights { weights, .. } => DenoiseState::with_model(weights),
        }
    }
}

/// Smallest well-formed RNNoise weights file: every layer 4 neurons wide, all weights zero
#[cfg(test)]
pub(crate) fn tiny_weights() -> Vec<u8> {
    const HIDDEN: u8 = 4;
    const FEATURES: u8 = 42;
    const TANH: u8 = 0;
    const SIGMOID: u8 = 1;

    fn dense(bytes: &mut Vec<u8>, inputs: u8, neurons: u8, activation: u8) {
        bytes.extend([inputs, neurons, activation]);
        bytes.resize(bytes.len() + inputs as usize * neurons as usize + neurons as usize, 0);
    }

    fn gru(bytes: &mut Vec<u8>, inputs: u8, neurons: u8, activation: u8) {
        let (inputs_n, neurons_n) = (inputs as usize, neurons as usize);
        bytes.extend([inputs, neurons, activation]);
        bytes.resize(
            bytes.len() + 3 * inputs_n * neurons_n + 3 * neurons_n * neurons_n + 3 * neurons_n,
            0,
        );
    }

    let mut bytes = Vec::new();
    dense(&mut bytes, FEATURES, HIDDEN, TANH);
    gru(&mut bytes, HIDDEN, HIDDEN, TANH);
    gru(&mut bytes, FEATURES + 2 * HIDDEN, HIDDEN, TANH);
    gru(&mut bytes, FEATURES + 2 * HIDDEN, HIDDEN, TANH);
    dense(&mut bytes, HIDDEN, 22, SIGMOID);
    dense(&mut bytes, HIDDEN, 1, SIGMOID);
    bytes
}
