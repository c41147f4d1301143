//! PCM to waveform tensor: normalize to [-1, 1], de-interleave, add the batch axis.
//!
//! The tensor layout is `(batch = 1, channels, samples)`.

use ndarray::{Array2, Array3, Axis};
use tracing::warn;

use super::{PcmAudio, PcmSamples};
use crate::{Error, ErrorContext, Result};

/// Scale samples to `f32` in [-1, 1].
///
/// Integer PCM is divided by the largest magnitude of its bit depth
/// (32768 for 16-bit); float PCM is clamped.
pub fn normalize(samples: &PcmSamples) -> Vec<f32> {
    match samples {
        PcmSamples::Int {
            data,
            bits_per_sample,
        } => {
            let scale = (1u64 << (bits_per_sample.saturating_sub(1))) as f32;
            data.iter()
                .map(|&s| (s as f32 / scale).clamp(-1.0, 1.0))
                .collect()
        }
        PcmSamples::Float(data) => data.iter().map(|s| s.clamp(-1.0, 1.0)).collect(),
    }
}

/// Reshape interleaved samples to `(1, channels, frames)`.
pub fn deinterleave(mut interleaved: Vec<f32>, channels: usize) -> Result<Array3<f32>> {
    if channels == 0 {
        return Err(Error::decode("channel count is zero"));
    }
    let frames = interleaved.len() / channels;
    let remainder = interleaved.len() % channels;
    if remainder != 0 {
        warn!(remainder, channels, "dropping trailing partial frame");
        interleaved.truncate(frames * channels);
    }

    let by_frame = Array2::from_shape_vec((frames, channels), interleaved).map_err(|e| {
        Error::decode_with_context(
            format!("failed to shape samples: {}", e),
            ErrorContext::new().with_source("waveform"),
        )
    })?;
    let by_channel = by_frame.reversed_axes().as_standard_layout().into_owned();
    Ok(by_channel.insert_axis(Axis(0)))
}

/// Full conversion from decoded PCM.
pub fn to_waveform(pcm: &PcmAudio) -> Result<Array3<f32>> {
    deinterleave(normalize(&pcm.samples), pcm.channels as usize)
}

/// Inverse of [`deinterleave`] for the first batch entry.
pub fn to_interleaved(waveform: &Array3<f32>) -> Vec<f32> {
    waveform
        .index_axis(Axis(0), 0)
        .t()
        .iter()
        .copied()
        .collect()
}
