use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::config::MediaConfig;
use crate::error::{DfmError, Result};

/// Captured output of a successful media tool run
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Abstract media processing command representation
#[derive(Debug, Clone)]
pub struct MediaCommand {
    pub binary_path: String,
    pub args: Vec<String>,
    pub description: String,
}

impl MediaCommand {
    /// Create a new media processing command
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    /// Add an argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add input file
    pub fn input<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg("-i").arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Add output file
    pub fn output<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Force overwrite output
    pub fn overwrite(self) -> Self {
        self.arg("-y")
    }

    pub fn video_codec<S: Into<String>>(self, codec: S) -> Self {
        self.arg("-c:v").arg(codec)
    }

    /// Codec for the encoded audio stream (`-c:a`)
    pub fn audio_codec<S: Into<String>>(self, codec: S) -> Self {
        self.arg("-c:a").arg(codec)
    }

    /// Raw sample format for extracted audio (`-acodec`)
    pub fn pcm_codec<S: Into<String>>(self, codec: S) -> Self {
        self.arg("-acodec").arg(codec)
    }

    /// Copy video stream
    pub fn copy_video(self) -> Self {
        self.video_codec("copy")
    }

    /// Disable video
    pub fn no_video(self) -> Self {
        self.arg("-vn")
    }

    /// Set audio sample rate
    pub fn audio_sample_rate(self, rate: u32) -> Self {
        self.arg("-ar").arg(rate.to_string())
    }

    /// Set audio channels
    pub fn audio_channels(self, channels: u32) -> Self {
        self.arg("-ac").arg(channels.to_string())
    }

    pub fn audio_bitrate<S: Into<String>>(self, bitrate: S) -> Self {
        self.arg("-b:a").arg(bitrate)
    }

    /// Select a stream, e.g. `0:v:0`
    pub fn map<S: Into<String>>(self, specifier: S) -> Self {
        self.arg("-map").arg(specifier)
    }

    /// Stop at the end of the shortest stream
    pub fn shortest(self) -> Self {
        self.arg("-shortest")
    }

    pub fn avoid_negative_ts<S: Into<String>>(self, mode: S) -> Self {
        self.arg("-avoid_negative_ts").arg(mode)
    }

    /// Execute the command, capturing its output
    pub async fn execute(&self) -> Result<CommandOutput> {
        debug!("Executing media processing command: {} {:?}", self.binary_path, self.args);
        debug!("Description: {}", self.description);

        let output = Command::new(&self.binary_path)
            .args(&self.args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| DfmError::MediaToolUnavailable(format!(
                "failed to execute {}: {}",
                self.binary_path, e
            )))?;

        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        if !output.status.success() {
            return Err(DfmError::MediaTool {
                operation: self.description.clone(),
                diagnostic: stderr,
            });
        }

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr,
        })
    }
}

/// Builder for the fixed media tool templates
pub struct MediaCommandBuilder {
    config: MediaConfig,
}

impl MediaCommandBuilder {
    pub fn new(config: MediaConfig) -> Self {
        Self { config }
    }

    /// Build audio extraction command: 16-bit PCM WAV at the configured rate and channel count
    pub fn extract_audio<P: AsRef<Path>>(&self, video_path: P, audio_path: P) -> MediaCommand {
        MediaCommand::new(&self.config.binary_path, "Audio extraction")
            .input(video_path)
            .no_video()
            .pcm_codec("pcm_s16le")
            .audio_sample_rate(self.config.extract_sample_rate)
            .audio_channels(self.config.extract_channels)
            .overwrite()
            .output(audio_path)
    }

    /// Build remux command: original video stream copied, replacement audio re-encoded
    pub fn remux<P: AsRef<Path>>(
        &self,
        video_path: P,
        audio_path: P,
        output_path: P,
    ) -> MediaCommand {
        MediaCommand::new(&self.config.binary_path, "Video reassembly")
            .input(video_path)
            .input(audio_path)
            .copy_video()
            .audio_codec(&self.config.audio_codec)
            .audio_bitrate(&self.config.audio_bitrate)
            .map("0:v:0")
            .map("1:a:0")
            .shortest()
            .avoid_negative_ts("make_zero")
            .overwrite()
            .output(output_path)
    }

    /// Build audio transcoding command; the container follows the output extension
    pub fn encode_audio<P: AsRef<Path>>(&self, wav_path: P, output_path: P) -> MediaCommand {
        MediaCommand::new(&self.config.binary_path, "Audio encoding")
            .input(wav_path)
            .no_video()
            .overwrite()
            .output(output_path)
    }

    /// Build version check command
    pub fn version_check(&self) -> MediaCommand {
        MediaCommand::new(&self.config.binary_path, "Version check")
            .arg("-version")
    }
}
