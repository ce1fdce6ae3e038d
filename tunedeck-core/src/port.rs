use crate::error::Result;

/// Abstraction over the host's audio playback primitive.
///
/// The controller owns its port exclusively and drives it synchronously;
/// asynchronous outcomes (load completion, end of track) come back as
/// [`MediaEvent`]s pulled out of the port one at a time. Every `load` carries
/// a caller-supplied sequence number, and the port must echo that number on
/// the `Ready`/`LoadFailed` event it produces for that load, so the
/// controller can discard completions for superseded requests.
pub trait MediaPort {
    /// Begin acquiring a new source. Invalidates any previous ready/duration
    /// state. Completion is reported via `Ready { seq }` or
    /// `LoadFailed { seq, .. }`.
    fn load(&mut self, source: &str, seq: u64);

    /// Attempt to start playback of the current source. Fails with
    /// `PlaybackRejected` when the host refuses.
    fn request_play(&mut self) -> Result<()>;

    /// Stop playback. Always succeeds, idempotent.
    fn request_pause(&mut self);

    /// Current playback position in seconds
    fn position(&self) -> f32;

    /// Jump to an absolute position in seconds
    fn set_position(&mut self, seconds: f32);

    /// Total duration in seconds, `None` until the source's metadata is known
    fn duration(&self) -> Option<f32>;

    /// Current volume in [0, 1]
    fn volume(&self) -> f32;

    /// Set volume; callers clamp to [0, 1] first
    fn set_volume(&mut self, volume: f32);

    /// Set the playback speed multiplier
    fn set_rate(&mut self, rate: f32);

    /// Give the port a chance to notice progress and queue `TimeUpdate` /
    /// `Ended` events. Called periodically by the engine loop.
    fn tick(&mut self);

    /// Drain all queued lifecycle events, oldest first
    fn take_events(&mut self) -> Vec<MediaEvent>;
}

/// Asynchronous lifecycle events emitted by a media port.
///
/// Delivered one at a time, in order, never concurrently.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// The load tagged `seq` finished and the source can start playing
    Ready { seq: u64 },
    /// Playback position moved
    TimeUpdate { position: f32 },
    /// The current track played to its end
    Ended,
    /// The load tagged `seq` failed
    LoadFailed { seq: u64, reason: String },
}
