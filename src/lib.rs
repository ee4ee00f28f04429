//! dfm - DeepFilter Multimedia
//!
//! Removes background noise from audio and video files. Noise suppression is
//! delegated to a pre-trained RNNoise model; demuxing and remuxing of video
//! containers is delegated to ffmpeg.

pub mod batch;
pub mod cli;
pub mod config;
pub mod enhance;
pub mod error;
pub mod media;
pub mod router;
