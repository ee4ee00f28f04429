use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "dfm",
    author,
    version,
    about = "Remove noise from audio and video files using a neural speech-enhancement model",
    long_about = None,
    after_help = "Video files are demuxed and remuxed with ffmpeg; the video stream is copied unchanged."
)]
pub struct Args {
    /// Input audio or video file(s) to process; directories are searched for media files
    #[arg(required_unless_present = "check")]
    pub input: Vec<PathBuf>,

    /// Output file path (only valid for a single input file).
    /// If not specified, saves to 'output/<filename>_enhanced.<ext>'
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Enable verbose logging and print error causes
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable progress messages
    #[arg(short, long)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// RNNoise weights file to use instead of the built-in model
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Path to the ffmpeg binary
    #[arg(long)]
    pub ffmpeg: Option<String>,

    /// Keep processing the remaining files after one fails
    #[arg(short = 'k', long)]
    pub keep_going: bool,

    /// Print the media tool version and exit
    #[arg(long)]
    pub check: bool,
}

impl Args {
    /// Progress messages are on unless `--quiet` is given
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    /// Command-line flags take precedence over the configuration file
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(model) = &self.model {
            config.enhance.model_path = Some(model.clone());
        }
        if let Some(ffmpeg) = &self.ffmpeg {
            config.media.binary_path = ffmpeg.clone();
        }
        if self.keep_going {
            config.batch.keep_going = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_positional_inputs_and_flags() {
        let args = Args::try_parse_from(["dfm", "a.wav", "b.mkv", "-q", "--keep-going"]).unwrap();
        assert_eq!(args.input, vec![PathBuf::from("a.wav"), PathBuf::from("b.mkv")]);
        assert!(args.quiet);
        assert!(!args.show_progress());
        assert!(args.keep_going);
        assert!(args.output.is_none());
    }

    #[test]
    fn test_input_required_unless_check() {
        let err = Args::try_parse_from(["dfm"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let args = Args::try_parse_from(["dfm", "--check"]).unwrap();
        assert!(args.check);
        assert!(args.input.is_empty());
    }

    #[test]
    fn test_version_flag() {
        let err = Args::try_parse_from(["dfm", "--version"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_overrides_replace_config_values() {
        let args = Args::try_parse_from([
            "dfm", "in.mp4", "-o", "out.mp4", "--model", "weights.rnn", "--ffmpeg", "/opt/ffmpeg", "-k",
        ])
        .unwrap();
        let mut config = Config::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.enhance.model_path, Some(PathBuf::from("weights.rnn")));
        assert_eq!(config.media.binary_path, "/opt/ffmpeg");
        assert!(config.batch.keep_going);
        assert_eq!(args.output, Some(PathBuf::from("out.mp4")));
    }
}
