use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{info, warn};

use crate::config::{Config, OutputConfig};
use crate::enhance::Enhancer;
use crate::error::{DfmError, Result};
use crate::media::MediaTool;

pub const AUDIO_EXTENSIONS: &[&str] = &[".aac", ".flac", ".m4a", ".mp3", ".ogg", ".wav", ".wma"];
pub const VIDEO_EXTENSIONS: &[&str] = &[".avi", ".flv", ".m4v", ".mkv", ".mov", ".mp4", ".webm", ".wmv"];

const EXTRACTED_AUDIO_FILE: &str = "extracted_audio.wav";
const ENHANCED_AUDIO_FILE: &str = "enhanced_audio.wav";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    /// Classify a path by its extension, ignoring case
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = dotted_extension(path);
        if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
            Ok(MediaKind::Video)
        } else if AUDIO_EXTENSIONS.contains(&extension.as_str()) {
            Ok(MediaKind::Audio)
        } else {
            Err(DfmError::UnsupportedType { extension })
        }
    }
}

/// Lowercase extension with its leading dot, or an empty string
fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

fn is_wav(path: &Path) -> bool {
    dotted_extension(path) == ".wav"
}

/// `<dir>/<stem><suffix><ext>`, keeping the input extension as written
pub fn default_output_path(input_path: &Path, output: &OutputConfig) -> Result<PathBuf> {
    let stem = input_path
        .file_stem()
        .ok_or_else(|| DfmError::InvalidArgument(format!("Invalid input filename: {}", input_path.display())))?
        .to_string_lossy();

    let extension = input_path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    Ok(output.dir.join(format!("{}{}{}", stem, output.suffix, extension)))
}

/// Dispatches each input to the audio or video pipeline
pub struct FileRouter {
    config: Config,
    media: Box<dyn MediaTool>,
    enhancer: Arc<dyn Enhancer>,
}

impl FileRouter {
    pub fn new(config: Config, media: Box<dyn MediaTool>, enhancer: Box<dyn Enhancer>) -> Self {
        Self {
            config,
            media,
            enhancer: Arc::from(enhancer),
        }
    }

    /// Process a single file, returning the path of the written output
    pub async fn process_file(&self, input_path: &Path, output_path: Option<&Path>) -> Result<PathBuf> {
        if !input_path.exists() {
            return Err(DfmError::NotFound(input_path.display().to_string()));
        }

        let kind = MediaKind::from_path(input_path)?;

        let output_path = match output_path {
            Some(path) => path.to_path_buf(),
            None => default_output_path(input_path, &self.config.output)?,
        };

        let output_dir = output_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf();
        fs::create_dir_all(&output_dir).await?;

        match kind {
            MediaKind::Audio => self.process_audio_file(input_path, &output_path, &output_dir).await?,
            MediaKind::Video => self.process_video_file(input_path, &output_path).await?,
        }

        Ok(output_path)
    }

    async fn process_audio_file(&self, input_path: &Path, output_path: &Path, output_dir: &Path) -> Result<()> {
        info!("Processing audio: {}", input_path.display());

        // Scratch space next to the output, so the finished file can be renamed into place
        let temp_dir = tempfile::Builder::new().prefix(".dfm-").tempdir_in(output_dir)?;
        let enhanced_path = temp_dir.path().join(ENHANCED_AUDIO_FILE);

        match self.enhance(input_path, &enhanced_path).await {
            Err(DfmError::Decode(reason)) => {
                warn!("Decoder cannot read {} ({}), converting with media tool", input_path.display(), reason);
                let extracted_path = temp_dir.path().join(EXTRACTED_AUDIO_FILE);
                self.media.extract_audio(input_path, &extracted_path).await?;
                self.enhance(&extracted_path, &enhanced_path).await?;
            }
            other => other?,
        }

        if is_wav(output_path) {
            fs::rename(&enhanced_path, output_path).await?;
        } else {
            self.media.encode_audio(&enhanced_path, output_path).await?;
        }

        info!("Processing complete: {}", output_path.display());
        Ok(())
    }

    async fn process_video_file(&self, input_path: &Path, output_path: &Path) -> Result<()> {
        info!("Processing video: {}", input_path.display());
        info!("Output: {}", output_path.display());

        let temp_dir = tempfile::tempdir()?;
        let extracted_path = temp_dir.path().join(EXTRACTED_AUDIO_FILE);
        let enhanced_path = temp_dir.path().join(ENHANCED_AUDIO_FILE);

        self.media.extract_audio(input_path, &extracted_path).await?;
        self.enhance(&extracted_path, &enhanced_path).await?;
        self.media.remux(input_path, &enhanced_path, output_path).await?;

        info!("Processing complete: {}", output_path.display());
        Ok(())
    }

    /// Run inference on a blocking thread so Ctrl-C stays responsive
    async fn enhance(&self, input_path: &Path, output_path: &Path) -> Result<()> {
        let enhancer = Arc::clone(&self.enhancer);
        let input_path = input_path.to_path_buf();
        let output_path = output_path.to_path_buf();

        tokio::task::spawn_blocking(move || enhancer.enhance(&input_path, &output_path))
            .await
            .map_err(|e| DfmError::Enhancement(format!("inference task failed: {}", e)))?
    }
}
