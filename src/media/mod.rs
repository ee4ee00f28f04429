// Media tool adapter
//
// This module wraps the external transcoding tool behind a trait:
// - Processor: ffmpeg-backed implementation
// - Commands: command builder and the fixed argument templates

pub mod commands;
pub mod processor;

use async_trait::async_trait;
use std::path::Path;

pub use commands::*;
pub use processor::*;

use crate::config::MediaConfig;
use crate::error::Result;

/// Operations delegated to the external media tool
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaTool: Send + Sync {
    /// Demux the audio track of a container into a PCM WAV file
    async fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> Result<()>;

    /// Rebuild a container from the original video stream and a replacement audio track
    async fn remux(
        &self,
        video_path: &Path,
        audio_path: &Path,
        output_path: &Path,
    ) -> Result<()>;

    /// Transcode a WAV file into the container implied by the output extension
    async fn encode_audio(&self, wav_path: &Path, output_path: &Path) -> Result<()>;

    /// Check that the media tool can be executed
    async fn check_availability(&self) -> Result<()>;

    /// First line of the media tool's version banner
    async fn version_info(&self) -> Result<String>;
}

/// Factory for creating media tool instances
pub struct MediaToolFactory;

impl MediaToolFactory {
    /// Create the default media tool implementation (ffmpeg)
    pub fn create(config: MediaConfig) -> Box<dyn MediaTool> {
        Box::new(FfmpegTool::new(config))
    }
}
