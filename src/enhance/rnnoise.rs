use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use super::audio_io::{self, PlanarAudio};
use super::{Enhancer, EnhancementModel, FRAME_SIZE};
use crate::error::Result;

/// RNNoise works on samples in the 16-bit PCM range
const PCM_SCALE: f32 = i16::MAX as f32;

/// Enhancer backed by the RNNoise network
pub struct RnnoiseEnhancer {
    model: EnhancementModel,
    strength: f32,
    show_progress: bool,
}

impl RnnoiseEnhancer {
    /// # Arguments
    /// * `model` - Loaded model handle
    /// * `strength` - Blend strength (0.0 = original, 1.0 = fully denoised)
    /// * `show_progress` - Draw a progress bar while running inference
    pub fn new(model: EnhancementModel, strength: f32, show_progress: bool) -> Self {
        Self {
            model,
            strength: strength.clamp(0.0, 1.0),
            show_progress,
        }
    }

    /// Denoise planar audio already at the model rate
    pub fn enhance_samples(&self, audio: &PlanarAudio) -> Result<PlanarAudio> {
        let frames_per_channel = audio.frames().div_ceil(FRAME_SIZE) + 1;
        let progress = self.progress_bar((frames_per_channel * audio.channels.len()) as u64);

        let channels = audio
            .channels
            .iter()
            .map(|channel| self.denoise_channel(channel, &progress))
            .collect::<Result<Vec<_>>>()?;

        progress.finish_and_clear();

        Ok(PlanarAudio {
            sample_rate: audio.sample_rate,
            channels,
        })
    }

    fn denoise_channel(&self, samples: &[f32], progress: &ProgressBar) -> Result<Vec<f32>> {
        if samples.is_empty() || self.strength <= 0.0 {
            return Ok(samples.to_vec());
        }

        let mut state = self.model.new_state();

        // One extra frame flushes the network's single-frame delay
        let padded_len = (samples.len().div_ceil(FRAME_SIZE) + 1) * FRAME_SIZE;
        let mut input = vec![0.0f32; padded_len];
        for (dst, src) in input.iter_mut().zip(samples) {
            *dst = src * PCM_SCALE;
        }

        let mut denoised = Vec::with_capacity(padded_len);
        let mut out_frame = [0.0f32; FRAME_SIZE];
        for in_frame in input.chunks_exact(FRAME_SIZE) {
            state.process_frame(&mut out_frame, in_frame);
            denoised.extend_from_slice(&out_frame);
            progress.inc(1);
        }

        Ok(denoised[FRAME_SIZE..FRAME_SIZE + samples.len()]
            .iter()
            .zip(samples)
            .map(|(wet, dry)| dry * (1.0 - self.strength) + (wet / PCM_SCALE) * self.strength)
            .collect())
    }

    fn progress_bar(&self, total_frames: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(total_frames);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent}% ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    }
}

impl Enhancer for RnnoiseEnhancer {
    fn sample_rate(&self) -> u32 {
        self.model.sample_rate()
    }

    fn enhance(&self, input_path: &Path, output_path: &Path) -> Result<()> {
        info!("Enhancing {} with {}", input_path.display(), self.model.describe());

        let decoded = audio_io::decode_file(input_path)?;
        debug!(
            "Decoded {} frames, {} channel(s) at {} Hz",
            decoded.frames(),
            decoded.channels.len(),
            decoded.sample_rate
        );

        let audio = audio_io::resample(decoded, self.sample_rate())?;
        let enhanced = self.enhance_samples(&audio)?;
        audio_io::write_wav(output_path, &enhanced)?;

        info!("Enhanced audio written to {}", output_path.display());
        Ok(())
    }
}
