use thiserror::Error;

/// Errors from playback control. None of these are fatal; the controller
/// always settles back into a consistent, not-playing state.
#[derive(Debug, Clone, Error)]
pub enum PlayerError {
    /// Track index outside the playlist bounds
    #[error("track index {0} out of range")]
    IndexOutOfRange(usize),

    /// Playlist was constructed without any tracks
    #[error("playlist must contain at least one track")]
    EmptyPlaylist,

    /// The host refused to start playback
    #[error("playback request rejected: {0}")]
    PlaybackRejected(String),

    /// The media source could not be loaded
    #[error("failed to load {source_path}: {reason}")]
    LoadFailed { source_path: String, reason: String },
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlayerError>;
