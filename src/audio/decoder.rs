//! Container/codec-agnostic audio decoding via symphonia.
//!
//! Decodes the first audio track of any supported container to interleaved
//! 16-bit PCM, then normalizes to 16kHz mono. A readable file with no
//! decodeable audio track is an error; a track that yields no PCM produces an
//! empty buffer, which callers treat as "nothing to transcribe".

use crate::audio::normalize::{PcmBuffer, float_to_pcm16};
use crate::error::{Result, SousChefError};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::{AudioBufferRef, SampleBuffer, Signal};
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

/// Decode an audio-bearing file to 16kHz mono 16-bit PCM.
///
/// # Errors
/// Returns `SousChefError::NoAudioTrack` when the container holds no
/// decodeable audio track, `SousChefError::AudioDecode` when the container
/// cannot be probed. An input that decodes to zero samples returns an empty
/// buffer, not an error.
pub fn decode_to_pcm(path: &Path) -> Result<PcmBuffer> {
    let src = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(src), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let meta_opts: MetadataOptions = Default::default();
    let fmt_opts: FormatOptions = Default::default();

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &fmt_opts, &meta_opts)
        .map_err(|e| SousChefError::AudioDecode {
            message: format!("unrecognized container {}: {}", path.display(), e),
        })?;
    let mut format = probed.format;

    // First track with a known (decodeable) codec.
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| SousChefError::NoAudioTrack {
            path: path.display().to_string(),
        })?;
    let track_id = track.id;

    let dec_opts: DecoderOptions = Default::default();
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &dec_opts)
        .map_err(|e| SousChefError::AudioDecode {
            message: format!("unsupported codec: {}", e),
        })?;

    let mut samples: Vec<i16> = Vec::new();
    let mut sample_rate = 0u32;
    let mut channels = 0u16;
    let mut int_buf: Option<SampleBuffer<i16>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            // End of stream or unrecoverable read error: stop decoding.
            Err(_) => break,
        };
        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                if sample_rate == 0 {
                    sample_rate = spec.rate;
                    channels = spec.channels.count() as u16;
                    debug!(sample_rate, channels, "decoder output format");
                }

                match decoded {
                    // Floating-point output: clamp to [-1, 1] and scale to
                    // 16-bit with round-to-nearest.
                    AudioBufferRef::F32(buf) => {
                        let interleaved = interleave_f32(buf.frames(), spec.channels.count(), |c| {
                            buf.chan(c)
                        });
                        samples.extend(float_to_pcm16(&interleaved));
                    }
                    AudioBufferRef::F64(buf) => {
                        let floats: Vec<Vec<f32>> = (0..spec.channels.count())
                            .map(|c| buf.chan(c).iter().map(|&s| s as f32).collect())
                            .collect();
                        let interleaved = interleave_f32(buf.frames(), spec.channels.count(), |c| {
                            floats[c].as_slice()
                        });
                        samples.extend(float_to_pcm16(&interleaved));
                    }
                    // Integer widths convert through symphonia's interleaved
                    // sample buffer.
                    other => {
                        if int_buf.is_none() {
                            int_buf = Some(SampleBuffer::new(other.capacity() as u64, spec));
                        }
                        if let Some(buf) = &mut int_buf {
                            buf.copy_interleaved_ref(other);
                            samples.extend_from_slice(buf.samples());
                        }
                    }
                }
            }
            Err(SymphoniaError::DecodeError(e)) => {
                // Corrupt packet; skip and keep going.
                warn!(error = %e, "skipping undecodable packet");
            }
            Err(e) => {
                warn!(error = %e, "decode aborted");
                break;
            }
        }
    }

    if samples.is_empty() {
        warn!(path = %path.display(), "decoded PCM is empty");
        return Ok(PcmBuffer::empty());
    }

    Ok(PcmBuffer::new(samples, sample_rate, channels).normalize())
}

/// Interleave planar channel data into frame order as f32.
fn interleave_f32<'a, F>(frames: usize, channels: usize, chan: F) -> Vec<f32>
where
    F: Fn(usize) -> &'a [f32],
{
    let mut out = Vec::with_capacity(frames * channels);
    for frame in 0..frames {
        for c in 0..channels {
            out.push(chan(c)[frame]);
        }
    }
    out
}
