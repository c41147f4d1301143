//! Container decoding (WAV, MP3) into PCM, and PCM into the waveform tensor.

pub mod mp3;
pub mod wav;
pub mod waveform;

use bytes::Bytes;
use tracing::debug;

use crate::config::AudioFormat;
use crate::{Error, ErrorContext, Result};

/// Interleaved samples as they come out of the container.
#[derive(Debug, Clone, PartialEq)]
pub enum PcmSamples {
    /// Signed integer PCM; 8-bit data is already shifted to signed.
    Int { data: Vec<i32>, bits_per_sample: u16 },
    /// IEEE float PCM, nominally in [-1, 1].
    Float(Vec<f32>),
}

impl PcmSamples {
    pub fn len(&self) -> usize {
        match self {
            Self::Int { data, .. } => data.len(),
            Self::Float(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bits per sample (sample width).
    pub fn bits_per_sample(&self) -> u16 {
        match self {
            Self::Int {
                bits_per_sample, ..
            } => *bits_per_sample,
            Self::Float(_) => 32,
        }
    }
}

/// Decoded container: samples plus the metadata read from it.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmAudio {
    pub samples: PcmSamples,
    pub channels: u16,
    pub sample_rate: u32,
}

impl PcmAudio {
    /// Samples per channel.
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels as usize
    }
}

/// Decode `bytes` as `format`. Only mono and stereo audio is accepted.
pub fn decode(bytes: &Bytes, format: AudioFormat) -> Result<PcmAudio> {
    let pcm = match format {
        AudioFormat::Wav => wav::decode_wav(bytes)?,
        AudioFormat::Mp3 => mp3::decode_mp3(bytes.clone())?,
    };

    if !(1..=2).contains(&pcm.channels) {
        return Err(Error::decode_with_context(
            format!("unsupported channel count {}", pcm.channels),
            ErrorContext::new()
                .with_details("expected mono or stereo")
                .with_source(format.as_str()),
        ));
    }
    if pcm.samples.is_empty() {
        return Err(Error::decode_with_context(
            "no audio samples decoded",
            ErrorContext::new().with_source(format.as_str()),
        ));
    }

    debug!(
        format = %format,
        channels = pcm.channels,
        sample_rate = pcm.sample_rate,
        bits_per_sample = pcm.samples.bits_per_sample(),
        frames = pcm.frames(),
        "decoded audio container"
    );
    Ok(pcm)
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use std::io::Cursor;

    /// In-memory 16-bit WAV.
    pub fn wav_i16(channels: u16, sample_rate: u32, interleaved: &[i16]) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for s in interleaved {
                writer.write_sample(*s).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::test_fixtures::*;
    use super::*;

    #[test]
    fn test_dispatch_by_format() {
        let wav = Bytes::from(wav_i16(1, 22_050, &[0, 100, -100]));
        let pcm = decode(&wav, AudioFormat::Wav).unwrap();
        assert_eq!(pcm.sample_rate, 22_050);
        assert_eq!(pcm.frames(), 3);

        let err = decode(&wav, AudioFormat::Mp3).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_more_than_two_channels_rejected() {
        let wav = Bytes::from(wav_i16(3, 16_000, &[1, 2, 3, 4, 5, 6]));
        let err = decode(&wav, AudioFormat::Wav).unwrap_err();
        assert!(err.is_decode());
        assert!(err.to_string().contains("channel count 3"));
    }

    #[test]
    fn test_empty_wav_rejected() {
        let wav = Bytes::from(wav_i16(1, 16_000, &[]));
        let err = decode(&wav, AudioFormat::Wav).unwrap_err();
        assert!(err.to_string().contains("no audio samples"));
    }
}
