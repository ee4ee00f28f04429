use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{DfmError, Result};

/// Name of the configuration file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "dfm.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub media: MediaConfig,
    pub enhance: EnhanceConfig,
    pub output: OutputConfig,
    pub batch: BatchConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Path to ffmpeg binary
    pub binary_path: String,
    /// Codec used for the replacement audio track when remuxing
    pub audio_codec: String,
    /// Bitrate of the replacement audio track
    pub audio_bitrate: String,
    /// Sample rate of audio extracted from video
    pub extract_sample_rate: u32,
    /// Channel count of audio extracted from video
    pub extract_channels: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceConfig {
    /// RNNoise weights file; the built-in model is used when unset
    pub model_path: Option<PathBuf>,
    /// Blend between original (0.0) and fully denoised (1.0) signal
    pub strength: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for outputs when no explicit path is given
    pub dir: PathBuf,
    /// Appended to the input file stem
    pub suffix: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Attempt every file even after one fails
    pub keep_going: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for a daily rolling log file; console only when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            binary_path: "ffmpeg".to_string(),
            audio_codec: "aac".to_string(),
            audio_bitrate: "320k".to_string(),
            extract_sample_rate: 48000,
            extract_channels: 2,
        }
    }
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            strength: 1.0,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            suffix: "_enhanced".to_string(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DfmError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| DfmError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| DfmError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| DfmError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Load an explicit config file, else `dfm.toml` from the working directory, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.enhance.strength) {
            return Err(DfmError::Config(format!(
                "enhance.strength must be between 0.0 and 1.0, got {}",
                self.enhance.strength
            )));
        }
        if self.media.binary_path.trim().is_empty() {
            return Err(DfmError::Config("media.binary_path must not be empty".to_string()));
        }
        if self.media.extract_sample_rate == 0 || self.media.extract_channels == 0 {
            return Err(DfmError::Config(
                "media.extract_sample_rate and media.extract_channels must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
