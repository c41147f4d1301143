//! MP3 decoding with symphonia.

use bytes::Bytes;
use std::io::Cursor;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::warn;

use super::{PcmAudio, PcmSamples};
use crate::config::AudioFormat;
use crate::{Error, ErrorContext, Result};

fn mp3_error(msg: String) -> Error {
    Error::decode_with_context(msg, ErrorContext::new().with_source("mp3_decoder"))
}

/// Decode a complete MP3 stream to interleaved 16-bit PCM.
pub fn decode_mp3(bytes: Bytes) -> Result<PcmAudio> {
    let mss = MediaSourceStream::new(
        Box::new(Cursor::new(bytes)),
        MediaSourceStreamOptions::default(),
    );

    let mut hint = Hint::new();
    hint.with_extension(AudioFormat::Mp3.as_str());
    hint.mime_type(AudioFormat::Mp3.mime_type());

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| mp3_error(format!("failed to probe MP3 format: {e}")))?;
    let mut format_reader = probed.format;

    let track = format_reader
        .default_track()
        .ok_or_else(|| mp3_error("no default track found in MP3".to_string()))?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let mut sample_rate = codec_params.sample_rate;
    let mut channels = codec_params.channels.map(|c| c.count());

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| mp3_error(format!("failed to create MP3 decoder: {e}")))?;

    let mut samples: Vec<i32> = Vec::new();
    let mut skipped = 0usize;

    loop {
        let packet = match format_reader.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => return Err(mp3_error(format!("failed to read MP3 packet: {e}"))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(audio_buf) => {
                let spec = *audio_buf.spec();
                let mut buf = SampleBuffer::<i16>::new(audio_buf.capacity() as u64, spec);
                buf.copy_interleaved_ref(audio_buf);
                samples.extend(buf.samples().iter().map(|&s| i32::from(s)));
                sample_rate = Some(spec.rate);
                channels = Some(spec.channels.count());
            }
            Err(SymphoniaError::DecodeError(err)) => {
                skipped += 1;
                warn!("MP3 decode error (skipping frame): {}", err);
            }
            Err(e) => return Err(mp3_error(format!("failed to decode MP3 packet: {e}"))),
        }
    }

    if skipped > 0 {
        warn!(skipped, "skipped corrupt MP3 frames");
    }

    let sample_rate =
        sample_rate.ok_or_else(|| mp3_error("no sample rate found in MP3".to_string()))?;
    let channel_count =
        channels.ok_or_else(|| mp3_error("no channel info found in MP3".to_string()))?;
    let channels = u16::try_from(channel_count)
        .map_err(|_| mp3_error(format!("channel count {channel_count} exceeds u16::MAX")))?;

    Ok(PcmAudio {
        samples: PcmSamples::Int {
            data: samples,
            bits_per_sample: 16,
        },
        channels,
        sample_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::waveform;

    const TONE_STEREO_MP3: &[u8] = include_bytes!("../../tests/fixtures/tone_stereo.mp3");

    #[test]
    fn test_stereo_stream_carries_signal() {
        let pcm = decode_mp3(Bytes::from_static(TONE_STEREO_MP3)).unwrap();
        assert_eq!(pcm.channels, 2);
        assert_eq!(pcm.sample_rate, 44_100);
        assert_eq!(pcm.samples.bits_per_sample(), 16);
        assert!(pcm.frames() > 0);
        assert_eq!(pcm.samples.len() % 2, 0);

        let PcmSamples::Int { data, .. } = &pcm.samples else {
            panic!("mp3 decodes to integer PCM");
        };
        assert!(data.iter().any(|&s| s != 0), "decoded stream is silent");

        let normalized = waveform::normalize(&pcm.samples);
        assert!(normalized.iter().any(|&v| v != 0.0));
        assert!(normalized.iter().all(|v| (-1.0..=1.0).contains(v)));
        for (raw, norm) in data.iter().zip(&normalized) {
            assert!((*raw as f32 / 32768.0 - norm).abs() < 1e-6);
        }
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let err = decode_mp3(Bytes::from_static(b"definitely not an mp3 stream")).unwrap_err();
        assert!(err.is_decode());
    }
}
