use thiserror::Error;

#[derive(Error, Debug)]
pub enum DfmError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("Input file not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error(
        "Unsupported file type: {extension}\nSupported video: {}\nSupported audio: {}",
        crate::router::VIDEO_EXTENSIONS.join(", "),
        crate::router::AUDIO_EXTENSIONS.join(", ")
    )]
    UnsupportedType { extension: String },

    #[error("{operation} failed: {diagnostic}")]
    MediaTool { operation: String, diagnostic: String },

    #[error("Media tool unavailable: {0}")]
    MediaToolUnavailable(String),

    #[error("Audio decoding error: {0}")]
    Decode(String),

    #[error("Enhancement error: {0}")]
    Enhancement(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DfmError {
    /// Process exit code reported for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

pub type Result<T> = std::result::Result<T, DfmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_type_lists_both_sets() {
        let message = DfmError::UnsupportedType { extension: ".txt".to_string() }.to_string();
        assert!(message.starts_with("Unsupported file type: .txt"));
        assert!(message.contains(".mkv"));
        assert!(message.contains(".flac"));
    }

    #[test]
    fn test_media_tool_message_carries_diagnostic() {
        let err = DfmError::MediaTool {
            operation: "Audio extraction".to_string(),
            diagnostic: "Invalid data found when processing input".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Audio extraction failed: Invalid data found when processing input"
        );
        assert_eq!(err.exit_code(), 1);
    }
}
