// src/session/export.rs

use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::Path;
use tracing::info;

use crate::decoder::DecodedAudio;
use crate::error::{Result, StudioError};
use crate::trim::TrimWindow;

/// Frame range `[first, last)` covered by `window` at `sample_rate`.
pub fn window_frames(window: &TrimWindow, sample_rate: u32, total_frames: usize) -> (usize, usize) {
    let sr = sample_rate as f64;
    let first = ((window.start() * sr).round() as usize).min(total_frames);
    let last = ((window.end() * sr).round() as usize).clamp(first, total_frames);
    (first, last)
}

/// Write the trimmed region of `audio` as 16-bit PCM WAV, all channels interleaved.
///
/// Returns the number of frames written.
pub fn export_trimmed_wav(
    audio: &DecodedAudio,
    window: &TrimWindow,
    path: impl AsRef<Path>,
) -> Result<usize> {
    let window = window.apply()?;

    let frame_secs = 1.0 / audio.sample_rate() as f64;
    if (window.duration() - audio.duration_secs()).abs() > frame_secs {
        return Err(StudioError::InvalidInput(format!(
            "trim window is for a {:.3}s track but the audio lasts {:.3}s",
            window.duration(),
            audio.duration_secs()
        )));
    }

    let channels = audio.channel_count();
    let spec = WavSpec {
        channels: channels as u16,
        sample_rate: audio.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let (first, last) = window_frames(&window, audio.sample_rate(), audio.frames());
    let mut writer = WavWriter::create(path.as_ref(), spec)?;
    for frame in first..last {
        for c in 0..channels {
            let s = audio.channel(c).map_or(0.0, |ch| ch[frame]);
            let samp = if s.is_finite() {
                (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
            } else {
                0i16
            };
            writer.write_sample(samp)?;
        }
    }
    writer.finalize()?;

    info!(
        path = %path.as_ref().display(),
        frames = last - first,
        start = window.start(),
        end = window.end(),
        "exported trimmed audio"
    );
    Ok(last - first)
}
