use ratatui::widgets::ListState;
use tunedeck_core::commands::PlayerResponse;
use tunedeck_core::playlist::Track;

/// Render-side mirror of the controller's state, updated from engine
/// responses. The TUI never mutates playback state directly; it only sends
/// commands and redraws from the latest snapshot.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Fixed playlist, kept for the side panel
    pub tracks: Vec<Track>,
    pub current_index: usize,
    pub is_playing: bool,
    /// Current playback position in seconds
    pub position: f32,
    /// Total duration in seconds, if known
    pub duration: Option<f32>,
    /// Current volume (0.0 to 1.0)
    pub volume: f32,
    pub rate_label: String,
    pub track_name: String,
    pub track_artist: String,

    /// Whether the playlist side panel is open
    pub show_playlist: bool,
    /// Cursor inside the playlist panel
    pub playlist_state: ListState,

    /// Status message to display
    pub status_message: String,
    /// Error message if any
    pub error_message: Option<String>,
}

impl AppState {
    pub fn new(tracks: Vec<Track>) -> Self {
        let first = tracks.first().cloned();
        let mut playlist_state = ListState::default();
        playlist_state.select(Some(0));

        Self {
            tracks,
            current_index: 0,
            is_playing: false,
            position: 0.0,
            duration: None,
            volume: 1.0,
            rate_label: "1.0X".to_string(),
            track_name: first.as_ref().map(|t| t.name.clone()).unwrap_or_default(),
            track_artist: first.map(|t| t.artist).unwrap_or_default(),
            show_playlist: false,
            playlist_state,
            status_message: "Loading...".to_string(),
            error_message: None,
        }
    }

    /// Fold one engine response into the render state. Returns true when the
    /// engine announced shutdown.
    pub fn handle_response(&mut self, response: PlayerResponse) -> bool {
        match response {
            PlayerResponse::State(snapshot) => {
                self.current_index = snapshot.current_index;
                self.is_playing = snapshot.is_playing;
                self.position = snapshot.position;
                self.duration = snapshot.duration;
                self.volume = snapshot.volume;
                self.rate_label = snapshot.rate_label;
                self.track_name = snapshot.track_name;
                self.track_artist = snapshot.track_artist;
                self.status_message = if self.is_playing {
                    "Playing".to_string()
                } else {
                    "Paused".to_string()
                };
                false
            }
            PlayerResponse::Error(message) => {
                self.error_message = Some(message);
                false
            }
            PlayerResponse::Shutdown => true,
        }
    }

    /// Get the progress fraction (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        match self.duration {
            Some(duration) if duration > 0.0 => (self.position / duration).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    /// Format time as MM:SS
    pub fn format_time(seconds: f32) -> String {
        if !seconds.is_finite() || seconds < 0.0 {
            return "00:00".to_string();
        }
        let mins = (seconds / 60.0).floor() as u32;
        let secs = (seconds % 60.0).floor() as u32;
        format!("{:02}:{:02}", mins, secs)
    }

    /// Move the playlist cursor down, wrapping
    pub fn playlist_next(&mut self) {
        let i = match self.playlist_state.selected() {
            Some(i) => {
                if i >= self.tracks.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.playlist_state.select(Some(i));
    }

    /// Move the playlist cursor up, wrapping
    pub fn playlist_prev(&mut self) {
        let i = match self.playlist_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.tracks.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.playlist_state.select(Some(i));
    }
}
