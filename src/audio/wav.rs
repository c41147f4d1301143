//! WAV decoding with hound.

use std::io::Cursor;

use super::{PcmAudio, PcmSamples};
use crate::{Error, ErrorContext, Result};

fn wav_error(stage: &str, e: hound::Error) -> Error {
    Error::decode_with_context(
        format!("failed to {} WAV: {}", stage, e),
        ErrorContext::new().with_source("wav_decoder"),
    )
}

pub fn decode_wav(bytes: &[u8]) -> Result<PcmAudio> {
    let mut reader =
        hound::WavReader::new(Cursor::new(bytes)).map_err(|e| wav_error("parse", e))?;
    let spec = reader.spec();

    let samples = match spec.sample_format {
        hound::SampleFormat::Int => {
            if !(1..=32).contains(&spec.bits_per_sample) {
                return Err(Error::decode_with_context(
                    format!("unsupported bit depth: {}", spec.bits_per_sample),
                    ErrorContext::new().with_source("wav_decoder"),
                ));
            }
            let data = reader
                .samples::<i32>()
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| wav_error("read samples from", e))?;
            PcmSamples::Int {
                data,
                bits_per_sample: spec.bits_per_sample,
            }
        }
        hound::SampleFormat::Float => {
            let data = reader
                .samples::<f32>()
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| wav_error("read samples from", e))?;
            PcmSamples::Float(data)
        }
    };

    Ok(PcmAudio {
        samples,
        channels: spec.channels,
        sample_rate: spec.sample_rate,
    })
}
