// src/lib.rs

pub mod config;
pub mod decoder;
pub mod error;
pub mod session;
pub mod trim;
pub mod trim_controller;
pub mod waveform;

pub use config::EditorConfig;
pub use decoder::{decode_file, DecodedAudio};
pub use error::{Result, StudioError};
pub use session::{TrimManifest, TrimStore};
pub use trim::{TrimCommit, TrimEditor, TrimWindow};
pub use waveform::{summarize, WaveformProfile};
