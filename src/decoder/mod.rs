// src/decoder/mod.rs

//! Full-file decode into per-channel sample arrays.
//!
//! This is the collaborator that feeds the summarizer: it runs once per
//! track load and hands back every sample of every channel.

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::{get_codecs, get_probe};
use tracing::{debug, warn};

use crate::error::{Result, StudioError};

/// Decoded audio, one `Vec<f32>` per channel.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl DecodedAudio {
    /// Wrap already-decoded channel data.
    ///
    /// All channels must have the same length and there must be at least one.
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self> {
        if sample_rate == 0 {
            return Err(StudioError::InvalidInput("sample rate must be positive".into()));
        }
        let Some(first) = channels.first() else {
            return Err(StudioError::InvalidInput("decoded audio has no channels".into()));
        };
        let frames = first.len();
        if channels.iter().any(|c| c.len() != frames) {
            return Err(StudioError::InvalidInput(
                "all channels must have the same length".into(),
            ));
        }
        Ok(Self { sample_rate, channels })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Channel 0, the one the waveform is drawn from.
    pub fn primary_channel(&self) -> &[f32] {
        &self.channels[0]
    }

    /// Length of each channel in samples.
    pub fn frames(&self) -> usize {
        self.channels[0].len()
    }

    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }
}

// SampleBuffer capacity is in samples, decoder buffer capacity is in frames.
fn needs_realloc(held_samples: Option<usize>, packet_frames: usize, channels: usize) -> bool {
    held_samples.is_none_or(|held| held < packet_frames * channels)
}

/// Decode a whole audio file.
pub fn decode_file(path: impl AsRef<Path>) -> Result<DecodedAudio> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| StudioError::Decode("no default audio track".into()))?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let mut decoder = get_codecs().make(&codec_params, &DecoderOptions::default())?;

    let mut sample_rate = codec_params.sample_rate.unwrap_or(0);
    let mut channels: Vec<Vec<f32>> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut skipped_packets = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(e.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(msg)) => {
                skipped_packets += 1;
                warn!(%msg, "skipping corrupt packet");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        let count = spec.channels.count();
        if count == 0 || decoded.frames() == 0 {
            continue;
        }
        if channels.is_empty() {
            channels = vec![Vec::new(); count];
            sample_rate = spec.rate;
        } else if channels.len() != count {
            // Channel layout changed mid-stream; drop the odd packet.
            skipped_packets += 1;
            continue;
        }

        let held = sample_buf.as_ref().map(SampleBuffer::<f32>::capacity);
        if needs_realloc(held, decoded.capacity(), count) {
            sample_buf = Some(SampleBuffer::<f32>::new(decoded.capacity() as u64, spec));
        }
        let Some(buf) = sample_buf.as_mut() else {
            continue;
        };
        buf.copy_interleaved_ref(decoded);

        for frame in buf.samples().chunks_exact(count) {
            for (c, &s) in frame.iter().enumerate() {
                channels[c].push(s);
            }
        }
    }

    if channels.is_empty() || channels[0].is_empty() {
        return Err(StudioError::Decode(format!(
            "no audio frames decoded from {}",
            path.display()
        )));
    }

    let audio = DecodedAudio::new(sample_rate, channels)?;
    debug!(
        path = %path.display(),
        sample_rate = audio.sample_rate(),
        channels = audio.channel_count(),
        frames = audio.frames(),
        skipped_packets,
        "decoded audio file"
    );
    Ok(audio)
}
