//! Error types for the lip-sync core.

/// Top-level error type for mouth animation and playback sessions.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LipSyncError {
    /// The speech-synthesis collaborator was unreachable or returned a failure.
    #[error("synthesis error: {0}")]
    Synthesis(String),

    /// The audio handle failed after playback started.
    #[error("playback error: {0}")]
    Playback(String),

    /// A caller-supplied value outside the accepted range.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for LipSyncError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, LipSyncError>;
