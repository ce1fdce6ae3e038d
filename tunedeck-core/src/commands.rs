/// Commands sent from the presentation layer to the playback engine
#[derive(Debug, Clone)]
pub enum PlayerCommand {
    /// Start or resume playback
    Play,
    /// Pause playback
    Pause,
    /// Toggle between play and pause
    Toggle,
    /// Skip to the next track, wrapping at the end of the playlist
    Next,
    /// Skip to the previous track, wrapping at the start
    Previous,
    /// Jump to a specific playlist entry
    SelectTrack(usize),
    /// Seek to a fraction of the current track (0.0 to 1.0)
    Seek(f32),
    /// Set volume (0.0 to 1.0)
    SetVolume(f32),
    /// Silence the output or restore the pre-mute volume
    ToggleMute,
    /// Step to the next playback speed
    CycleRate,
    /// Shut down the playback engine
    Quit,
}

/// Responses sent from the playback engine to the presentation layer
#[derive(Debug, Clone)]
pub enum PlayerResponse {
    /// Fresh render state, emitted every engine tick
    State(PlayerSnapshot),
    /// A recoverable error to surface as a transient notice
    Error(String),
    /// Engine is shutting down
    Shutdown,
}

/// Everything the presentation layer needs to render one frame
#[derive(Debug, Clone)]
pub struct PlayerSnapshot {
    pub current_index: usize,
    pub is_playing: bool,
    pub track_name: String,
    pub track_artist: String,
    /// Playback position in seconds
    pub position: f32,
    /// Total duration in seconds, unknown until the source is ready
    pub duration: Option<f32>,
    pub volume: f32,
    pub rate_label: String,
}
