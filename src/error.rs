// src/error.rs

use thiserror::Error;

/// Errors surfaced by the waveform and trim core.
///
/// Every variant is recoverable: callers show the message and keep the
/// previously committed state.
#[derive(Error, Debug)]
pub enum StudioError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Start time must be less than end time (start {start:.3}s, end {end:.3}s)")]
    InvalidTrimRange { start: f64, end: f64 },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

impl StudioError {
    /// Stable code for UI surfaces.
    pub fn code(&self) -> &'static str {
        match self {
            StudioError::InvalidInput(_) => "INVALID_INPUT",
            StudioError::InvalidTrimRange { .. } => "INVALID_TRIM_RANGE",
            StudioError::Decode(_) => "DECODE_ERROR",
            StudioError::Io(_) => "IO_ERROR",
            StudioError::Serialization(_) => "SERIALIZATION_ERROR",
            StudioError::Wav(_) => "WAV_ERROR",
        }
    }
}

impl From<symphonia::core::errors::Error> for StudioError {
    fn from(e: symphonia::core::errors::Error) -> Self {
        StudioError::Decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_range_message_is_user_facing() {
        let err = StudioError::InvalidTrimRange { start: 5.0, end: 2.0 };
        assert!(err.to_string().starts_with("Start time must be less than end time"));
        assert_eq!(err.code(), "INVALID_TRIM_RANGE");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: StudioError = io.into();
        assert_eq!(err.code(), "IO_ERROR");
    }
}
