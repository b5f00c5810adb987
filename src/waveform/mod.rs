// src/waveform/mod.rs

//! Block-averaged amplitude profile for the bar-style waveform view.

pub mod layout;
pub mod terminal;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decoder::DecodedAudio;
use crate::error::{Result, StudioError};

/// Bars drawn by the editor when nothing else is configured.
pub const DEFAULT_BIN_COUNT: usize = 200;

/// Normalized mean-magnitude per time bin.
///
/// Values are in `[0, 1]`. The loudest bin is exactly `1.0` unless the source
/// was silent, in which case every bin is `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredProfile")]
pub struct WaveformProfile {
    bins: Vec<f32>,
}

#[derive(Deserialize)]
struct StoredProfile {
    bins: Vec<f32>,
}

impl TryFrom<StoredProfile> for WaveformProfile {
    type Error = StudioError;

    fn try_from(raw: StoredProfile) -> Result<Self> {
        if let Some(bad) = raw.bins.iter().find(|v| !(0.0..=1.0).contains(*v)) {
            return Err(StudioError::InvalidInput(format!(
                "profile bin {bad} is outside [0, 1]"
            )));
        }
        Ok(Self { bins: raw.bins })
    }
}

impl WaveformProfile {
    /// Summarize channel 0 of a decoded track.
    pub fn from_decoded(audio: &DecodedAudio, bin_count: usize) -> Result<Self> {
        summarize(audio.primary_channel(), bin_count)
    }

    pub fn bins(&self) -> &[f32] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Largest bin value: 1.0, or 0.0 for silence.
    pub fn peak(&self) -> f32 {
        self.bins.iter().copied().fold(0.0, f32::max)
    }
}

/// [`summarize`] with [`DEFAULT_BIN_COUNT`] bins.
pub fn summarize_default(samples: &[f32]) -> Result<WaveformProfile> {
    summarize(samples, DEFAULT_BIN_COUNT)
}

/// Downsample `samples` into `bin_count` bins of mean absolute amplitude.
///
/// A request for more bins than there are samples is clamped to one sample per
/// bin. Samples past `bin_count * block_size` are dropped.
pub fn summarize(samples: &[f32], bin_count: usize) -> Result<WaveformProfile> {
    if samples.is_empty() {
        return Err(StudioError::InvalidInput("sample buffer is empty".into()));
    }
    if bin_count == 0 {
        return Err(StudioError::InvalidInput("bin count must be positive".into()));
    }

    let bins_out = if bin_count > samples.len() {
        debug!(
            requested = bin_count,
            available = samples.len(),
            "clamping bin count to sample count"
        );
        samples.len()
    } else {
        bin_count
    };
    let block_size = samples.len() / bins_out;

    let mut bins: Vec<f32> = samples
        .chunks_exact(block_size)
        .take(bins_out)
        .map(|block| {
            let sum: f64 = block.iter().map(|s| s.abs() as f64).sum();
            (sum / block_size as f64) as f32
        })
        .collect();

    let peak = bins.iter().copied().fold(0.0f32, f32::max);
    // Divide rather than multiply by 1/peak so the loudest bin lands on exactly 1.0.
    if peak > 0.0 {
        for v in &mut bins {
            *v /= peak;
        }
    }

    Ok(WaveformProfile { bins })
}
