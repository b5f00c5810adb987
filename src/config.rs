// src/config.rs

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::debug;

use crate::error::{Result, StudioError};
use crate::waveform::DEFAULT_BIN_COUNT;

/// Settings shared by the waveform editor and the simple trimmer.
///
/// The two trimmer flavours only differ in `min_gap`; pick one of the
/// presets or load a JSON file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
    /// Number of bars in the waveform profile.
    pub bin_count: usize,
    /// Minimum separation between trim start and end, in seconds.
    pub min_gap: f64,
    /// Slider step in seconds.
    pub slider_step: f64,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Fraction of the canvas height a full-scale bar occupies.
    pub bar_height_ratio: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::waveform_editor()
    }
}

impl EditorConfig {
    /// Waveform editor: no gap, validation deferred to apply.
    pub fn waveform_editor() -> Self {
        Self {
            bin_count: DEFAULT_BIN_COUNT,
            min_gap: 0.0,
            slider_step: 0.1,
            canvas_width: 800,
            canvas_height: 150,
            bar_height_ratio: 0.8,
        }
    }

    /// Simple trimmer: handles always stay one second apart.
    pub fn simple_trimmer() -> Self {
        Self {
            min_gap: 1.0,
            ..Self::waveform_editor()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.bin_count == 0 {
            return Err(StudioError::InvalidInput("bin_count must be positive".into()));
        }
        if !self.min_gap.is_finite() || self.min_gap < 0.0 {
            return Err(StudioError::InvalidInput(format!(
                "min_gap must be a non-negative number, got {}",
                self.min_gap
            )));
        }
        if !self.slider_step.is_finite() || self.slider_step <= 0.0 {
            return Err(StudioError::InvalidInput(format!(
                "slider_step must be positive, got {}",
                self.slider_step
            )));
        }
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(StudioError::InvalidInput("canvas dimensions must be non-zero".into()));
        }
        if !(self.bar_height_ratio > 0.0 && self.bar_height_ratio <= 1.0) {
            return Err(StudioError::InvalidInput(format!(
                "bar_height_ratio must be in (0, 1], got {}",
                self.bar_height_ratio
            )));
        }
        Ok(())
    }

    pub fn save_to_disk(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn load_from_disk(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        debug!(path = %path.display(), ?config, "loaded editor config");
        Ok(config)
    }
}
