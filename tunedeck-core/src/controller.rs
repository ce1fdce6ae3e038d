use crate::error::{PlayerError, Result};
use crate::playlist::{Playlist, Track};
use crate::port::{MediaEvent, MediaPort};
use crate::rate::PlaybackRate;

/// Which neighbor of the current track to advance to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// The playback state controller.
///
/// Owns the authoritative playback state and mediates every transition
/// between user intent (play/pause/next/previous/select) and media readiness
/// (load completion, end of track). `is_playing` reflects intent and is set
/// synchronously; it may disagree with the port's actual state while a load
/// is in flight.
///
/// Each load is tagged with a monotonically increasing sequence number.
/// A second `select_track` issued before the previous load completes
/// supersedes it, and the controller ignores `Ready`/`LoadFailed` events
/// whose tag does not match the most recent load.
pub struct PlayerController<P: MediaPort> {
    playlist: Playlist,
    port: P,

    current_index: usize,
    /// Playback intent, as distinct from what the port is actually doing
    is_playing: bool,
    /// Resume playback once the in-flight load reports ready. Cleared exactly
    /// once per load cycle: by the resume attempt, or by an explicit pause.
    autoplay_on_ready: bool,
    /// Whether the most recent load has signalled ready
    ready: bool,
    /// Tag of the most recent load request
    load_seq: u64,

    /// Remembered for mute restore; only updated by volumes above zero
    last_nonzero_volume: f32,
    rate: PlaybackRate,
    /// Last position reported by the port, for rendering
    position: f32,
}

impl<P: MediaPort> PlayerController<P> {
    /// Create a controller and begin loading the first track.
    pub fn new(playlist: Playlist, mut port: P) -> Self {
        port.set_volume(1.0);

        let mut controller = PlayerController {
            playlist,
            port,
            current_index: 0,
            is_playing: false,
            autoplay_on_ready: false,
            ready: false,
            load_seq: 0,
            last_nonzero_volume: 1.0,
            rate: PlaybackRate::default(),
            position: 0.0,
        };
        controller.begin_load(0);
        controller
    }

    /// Switch to the given track. A no-op when it is already current.
    ///
    /// Does not set `is_playing` itself: if playback intent was active the
    /// resume is deferred until the new source reports ready, so the state
    /// never claims "playing" for a source that cannot play yet.
    pub fn select_track(&mut self, index: usize) {
        if index == self.current_index {
            return;
        }
        if self.playlist.get(index).is_err() {
            debug_assert!(false, "select_track index {} out of range", index);
            log::warn!("Ignoring out-of-range track index {}", index);
            return;
        }

        if self.is_playing {
            self.autoplay_on_ready = true;
        }
        self.begin_load(index);
    }

    /// Start playback, or arm it to start as soon as the in-flight load is
    /// ready. On rejection the intent is rolled back and the error surfaced
    /// as a recoverable notice.
    pub fn play(&mut self) -> Result<()> {
        self.is_playing = true;
        if self.ready {
            self.attempt_play()
        } else {
            self.autoplay_on_ready = true;
            Ok(())
        }
    }

    /// Pause playback. Always cancels any pending autoplay from an in-flight
    /// load. Idempotent.
    pub fn pause(&mut self) {
        self.is_playing = false;
        self.autoplay_on_ready = false;
        self.port.request_pause();
    }

    /// Pause if playing, play otherwise
    pub fn toggle(&mut self) -> Result<()> {
        if self.is_playing {
            self.pause();
            Ok(())
        } else {
            self.play()
        }
    }

    /// Move to the wrapped neighbor track. Track changes made while playing
    /// resume automatically once the new source is ready.
    pub fn advance(&mut self, direction: Direction) {
        let index = match direction {
            Direction::Next => self.playlist.next_index(self.current_index),
            Direction::Previous => self.playlist.previous_index(self.current_index),
        };
        self.select_track(index);
    }

    /// Seek to a fraction of the track. A no-op while the duration is unknown.
    pub fn seek(&mut self, fraction: f32) {
        let Some(duration) = self.port.duration() else {
            return;
        };
        let target = fraction.clamp(0.0, 1.0) * duration;
        self.port.set_position(target);
        self.position = target;
    }

    /// Set volume, clamped to [0, 1]. Nonzero values are remembered for
    /// mute restore.
    pub fn set_volume(&mut self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        if volume > 0.0 {
            self.last_nonzero_volume = volume;
        }
        self.port.set_volume(volume);
    }

    /// Silence the output, or restore the last nonzero volume.
    ///
    /// Reads the live volume rather than a separate muted flag, so a slider
    /// dragged to zero counts as muted.
    pub fn toggle_mute(&mut self) {
        let current = self.port.volume();
        if current > 0.0 {
            self.last_nonzero_volume = current;
            self.port.set_volume(0.0);
        } else {
            let target = if self.last_nonzero_volume > 0.0 {
                self.last_nonzero_volume
            } else {
                1.0
            };
            self.port.set_volume(target);
        }
    }

    /// Step to the next playback rate in the cycle
    pub fn cycle_rate(&mut self) {
        self.rate = self.rate.next();
        self.port.set_rate(self.rate.multiplier());
    }

    /// React to one media port event. Stale `Ready`/`LoadFailed` events for
    /// superseded loads are discarded without touching any state.
    pub fn handle_media_event(&mut self, event: MediaEvent) -> Result<()> {
        match event {
            MediaEvent::Ready { seq } => self.on_media_ready(seq),
            MediaEvent::TimeUpdate { position } => {
                self.position = position;
                Ok(())
            }
            MediaEvent::Ended => {
                log::debug!("Track ended, advancing");
                self.advance(Direction::Next);
                Ok(())
            }
            MediaEvent::LoadFailed { seq, reason } => self.on_load_error(seq, reason),
        }
    }

    /// Tick the port and dispatch everything it has queued.
    pub fn pump(&mut self) -> Result<()> {
        self.port.tick();
        for event in self.port.take_events() {
            self.handle_media_event(event)?;
        }
        Ok(())
    }

    fn on_media_ready(&mut self, seq: u64) -> Result<()> {
        if seq != self.load_seq {
            log::debug!("Discarding stale ready event (load {} superseded)", seq);
            return Ok(());
        }
        self.ready = true;

        if self.autoplay_on_ready {
            self.autoplay_on_ready = false;
            self.attempt_play()?;
        }
        Ok(())
    }

    fn on_load_error(&mut self, seq: u64, reason: String) -> Result<()> {
        if seq != self.load_seq {
            log::debug!("Discarding stale load error (load {} superseded)", seq);
            return Ok(());
        }

        self.is_playing = false;
        self.autoplay_on_ready = false;
        let source_path = self.current_track().audio_source.clone();
        log::error!("Failed to load {}: {}", source_path, reason);
        Err(PlayerError::LoadFailed {
            source_path,
            reason,
        })
    }

    /// Issue `request_play` against a ready source, rolling intent back on
    /// rejection.
    fn attempt_play(&mut self) -> Result<()> {
        match self.port.request_play() {
            Ok(()) => {
                self.is_playing = true;
                Ok(())
            }
            Err(e) => {
                log::warn!("Playback rejected: {}", e);
                self.is_playing = false;
                self.autoplay_on_ready = false;
                Err(e)
            }
        }
    }

    fn begin_load(&mut self, index: usize) {
        self.current_index = index;
        self.ready = false;
        self.position = 0.0;
        self.load_seq += 1;

        let source = self.current_track().audio_source.clone();
        log::info!("Loading track {}: {}", index, source);
        self.port.load(&source, self.load_seq);
    }

    // Render state, pulled by the presentation layer.

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn current_track(&self) -> &Track {
        // current_index is always wrapped into range
        &self.playlist.tracks()[self.current_index]
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn duration(&self) -> Option<f32> {
        self.port.duration()
    }

    pub fn volume(&self) -> f32 {
        self.port.volume()
    }

    pub fn rate(&self) -> PlaybackRate {
        self.rate
    }
}
