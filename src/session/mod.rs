// src/session/mod.rs

pub mod export;
pub mod serialization;

pub use export::export_trimmed_wav;
pub use serialization::{TrackTrim, TrimManifest};

use crate::error::Result;
use crate::trim::TrimCommit;

/// Where applied trims end up.
///
/// Playback later reads the stored window back to limit seeking and stop at
/// the trim end.
pub trait TrimStore {
    fn commit(&mut self, commit: &TrimCommit) -> Result<()>;

    fn lookup(&self, track_id: &str) -> Option<&TrackTrim>;
}
