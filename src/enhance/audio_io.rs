//! Decoding, resampling and WAV output around the enhancement model.
//!
//! Samples are kept planar (`channels[channel][frame]`) in the `[-1.0, 1.0]` range.

use std::fs::File;
use std::path::Path;

use rubato::{Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use crate::error::{DfmError, Result};

/// Sinc window length; the interpolator looks half of it ahead of each output sample
const SINC_LEN: usize = 256;

/// Planar audio buffer
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarAudio {
    pub sample_rate: u32,
    pub channels: Vec<Vec<f32>>,
}

impl PlanarAudio {
    pub fn frames(&self) -> usize {
        self.channels.first().map(Vec::len).unwrap_or(0)
    }
}

/// Decode the first audio track of a file
pub fn decode_file(path: &Path) -> Result<PlanarAudio> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| DfmError::Decode(format!("failed to probe {}: {}", path.display(), e)))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| DfmError::Decode(format!("no audio track in {}", path.display())))?;

    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate;
    let mut channel_count = track.codec_params.channels.map(|c| c.count());

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| DfmError::Decode(format!("failed to create decoder: {}", e)))?;

    let mut interleaved: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(DfmError::Decode(format!("error reading packet: {}", e))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(e)) => {
                debug!("Skipping corrupt packet: {}", e);
                continue;
            }
            Err(e) => return Err(DfmError::Decode(format!("decode error: {}", e))),
        };

        let spec = *decoded.spec();
        sample_rate.get_or_insert(spec.rate);
        channel_count.get_or_insert(spec.channels.count());

        let mut sample_buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        interleaved.extend_from_slice(sample_buf.samples());
    }

    let sample_rate = sample_rate
        .ok_or_else(|| DfmError::Decode(format!("unknown sample rate in {}", path.display())))?;
    let channel_count = channel_count.unwrap_or(1).max(1);

    Ok(PlanarAudio {
        sample_rate,
        channels: deinterleave(&interleaved, channel_count),
    })
}

/// Split interleaved samples into one buffer per channel; a trailing partial frame is dropped
pub fn deinterleave(interleaved: &[f32], channel_count: usize) -> Vec<Vec<f32>> {
    let frames = interleaved.len() / channel_count;
    let mut channels = vec![Vec::with_capacity(frames); channel_count];
    for frame in interleaved.chunks_exact(channel_count) {
        for (channel, sample) in channels.iter_mut().zip(frame) {
            channel.push(*sample);
        }
    }
    channels
}

/// Resample every channel to `target_rate`
pub fn resample(audio: PlanarAudio, target_rate: u32) -> Result<PlanarAudio> {
    let frames = audio.frames();
    if audio.sample_rate == target_rate || frames == 0 {
        return Ok(PlanarAudio {
            sample_rate: target_rate,
            channels: audio.channels,
        });
    }

    debug!("Resampling {} frames from {} Hz to {} Hz", frames, audio.sample_rate, target_rate);

    let params = SincInterpolationParameters {
        sinc_len: SINC_LEN,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    // Trailing silence flushes the last input samples out of the interpolator
    let padded: Vec<Vec<f32>> = audio
        .channels
        .into_iter()
        .map(|mut channel| {
            channel.resize(frames + SINC_LEN, 0.0);
            channel
        })
        .collect();

    let ratio = target_rate as f64 / audio.sample_rate as f64;
    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, frames + SINC_LEN, padded.len())
        .map_err(|e| DfmError::Enhancement(format!("failed to create resampler: {}", e)))?;

    let mut channels = resampler
        .process(&padded, None)
        .map_err(|e| DfmError::Enhancement(format!("failed to resample: {}", e)))?;

    let expected = (frames as f64 * ratio).round() as usize;
    for channel in &mut channels {
        channel.resize(expected, 0.0);
    }

    Ok(PlanarAudio {
        sample_rate: target_rate,
        channels,
    })
}

/// Write a 16-bit PCM WAV file
pub fn write_wav(path: &Path, audio: &PlanarAudio) -> Result<()> {
    let spec = hound::WavSpec {
        channels: audio.channels.len() as u16,
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for frame in 0..audio.frames() {
        for channel in &audio.channels {
            let value = (channel[frame].clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer.write_sample(value)?;
        }
    }
    writer.finalize()?;
    Ok(())
}
