use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, info};

use crate::config::MediaConfig;
use crate::error::{DfmError, Result};
use super::{MediaCommandBuilder, MediaTool};

/// ffmpeg-backed media tool
pub struct FfmpegTool {
    command_builder: MediaCommandBuilder,
}

impl FfmpegTool {
    pub fn new(config: MediaConfig) -> Self {
        Self {
            command_builder: MediaCommandBuilder::new(config),
        }
    }
}

#[async_trait]
impl MediaTool for FfmpegTool {
    async fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> Result<()> {
        info!("Extracting audio from {} to {}", video_path.display(), audio_path.display());

        self.command_builder
            .extract_audio(video_path, audio_path)
            .execute()
            .await?;

        info!("Audio extraction completed");
        Ok(())
    }

    async fn remux(
        &self,
        video_path: &Path,
        audio_path: &Path,
        output_path: &Path,
    ) -> Result<()> {
        info!(
            "Reassembling {} with audio {} -> {}",
            video_path.display(),
            audio_path.display(),
            output_path.display()
        );

        self.command_builder
            .remux(video_path, audio_path, output_path)
            .execute()
            .await?;

        info!("Video reassembly completed");
        Ok(())
    }

    async fn encode_audio(&self, wav_path: &Path, output_path: &Path) -> Result<()> {
        info!("Encoding {} -> {}", wav_path.display(), output_path.display());

        self.command_builder
            .encode_audio(wav_path, output_path)
            .execute()
            .await?;

        Ok(())
    }

    async fn check_availability(&self) -> Result<()> {
        let version = self.version_info().await?;
        info!("Media tool is available: {}", version);
        Ok(())
    }

    async fn version_info(&self) -> Result<String> {
        debug!("Getting media tool version information");

        let output = self
            .command_builder
            .version_check()
            .execute()
            .await
            .map_err(|e| match e {
                DfmError::MediaTool { diagnostic, .. } => DfmError::MediaToolUnavailable(
                    format!("version check failed: {}", diagnostic.trim()),
                ),
                other => other,
            })?;

        Ok(output
            .stdout
            .lines()
            .next()
            .unwrap_or("Unknown version")
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unavailable_binary() {
        let tool = FfmpegTool::new(MediaConfig {
            binary_path: "/nonexistent/ffmpeg".to_string(),
            ..MediaConfig::default()
        });

        let err = tool.check_availability().await.unwrap_err();
        assert!(matches!(err, DfmError::MediaToolUnavailable(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_extract_failure_surfaces_media_tool_error() {
        // `false` ignores its arguments and exits non-zero
        let tool = FfmpegTool::new(MediaConfig {
            binary_path: "false".to_string(),
            ..MediaConfig::default()
        });

        let err = tool
            .extract_audio(Path::new("in.mkv"), Path::new("out.wav"))
            .await
            .unwrap_err();
        assert!(matches!(err, DfmError::MediaTool { ref operation, .. } if operation == "Audio extraction"));
    }
}
