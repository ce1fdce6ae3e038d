//! Controller behavior tests driven through a recording fake media port.
//!
//! The port records every load (with its sequence tag) and every play
//! request, so the tests can check not just the final state but which
//! source each request was issued against.

use std::cell::RefCell;
use std::rc::Rc;

use tunedeck_core::controller::{Direction, PlayerController};
use tunedeck_core::error::PlayerError;
use tunedeck_core::playlist::{Playlist, Track};
use tunedeck_core::port::{MediaEvent, MediaPort};

#[derive(Default)]
struct PortLog {
    /// (source, seq) for every load request, in order
    loads: Vec<(String, u64)>,
    /// Source that was current when each play request arrived
    play_requests: Vec<String>,
    pause_requests: usize,
    reject_play: bool,
    paused: bool,
    volume: f32,
    rate: f32,
    position: f32,
    duration: Option<f32>,
}

struct RecordingPort {
    log: Rc<RefCell<PortLog>>,
}

impl MediaPort for RecordingPort {
    fn load(&mut self, source: &str, seq: u64) {
        let mut log = self.log.borrow_mut();
        log.loads.push((source.to_string(), seq));
        log.duration = None;
        log.paused = true;
    }

    fn request_play(&mut self) -> tunedeck_core::error::Result<()> {
        let mut log = self.log.borrow_mut();
        if log.reject_play {
            return Err(PlayerError::PlaybackRejected("no user gesture".to_string()));
        }
        let current = log
            .loads
            .last()
            .map(|(source, _)| source.clone())
            .unwrap_or_default();
        log.play_requests.push(current);
        log.paused = false;
        Ok(())
    }

    fn request_pause(&mut self) {
        let mut log = self.log.borrow_mut();
        log.pause_requests += 1;
        log.paused = true;
    }

    fn position(&self) -> f32 {
        self.log.borrow().position
    }

    fn set_position(&mut self, seconds: f32) {
        self.log.borrow_mut().position = seconds;
    }

    fn duration(&self) -> Option<f32> {
        self.log.borrow().duration
    }

    fn volume(&self) -> f32 {
        self.log.borrow().volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.log.borrow_mut().volume = volume;
    }

    fn set_rate(&mut self, rate: f32) {
        self.log.borrow_mut().rate = rate;
    }

    fn tick(&mut self) {}

    fn take_events(&mut self) -> Vec<MediaEvent> {
        Vec::new()
    }
}

fn playlist(len: usize) -> Playlist {
    let tracks = (0..len)
        .map(|i| Track {
            name: format!("Track {i}"),
            artist: format!("Artist {i}"),
            audio_source: format!("t{i}.mp3"),
            cover_source: None,
        })
        .collect();
    Playlist::new(tracks).unwrap()
}

fn controller(len: usize) -> (PlayerController<RecordingPort>, Rc<RefCell<PortLog>>) {
    let log = Rc::new(RefCell::new(PortLog::default()));
    let port = RecordingPort { log: Rc::clone(&log) };
    (PlayerController::new(playlist(len), port), log)
}

fn last_seq(log: &Rc<RefCell<PortLog>>) -> u64 {
    log.borrow().loads.last().expect("no load issued").1
}

#[test]
fn construction_loads_first_track() {
    let (controller, log) = controller(3);

    assert_eq!(controller.current_index(), 0);
    assert!(!controller.is_playing());
    let log = log.borrow();
    assert_eq!(log.loads, vec![("t0.mp3".to_string(), 1)]);
    assert!(log.play_requests.is_empty());
    assert_eq!(log.volume, 1.0);
}

#[test]
fn play_after_ready_requests_playback() {
    let (mut controller, log) = controller(3);
    let seq = last_seq(&log);

    controller.handle_media_event(MediaEvent::Ready { seq }).unwrap();
    controller.play().unwrap();

    assert!(controller.is_playing());
    assert_eq!(log.borrow().play_requests, vec!["t0.mp3".to_string()]);
}

#[test]
fn play_before_ready_defers_until_load_completes() {
    let (mut controller, log) = controller(3);
    let seq = last_seq(&log);

    controller.play().unwrap();
    assert!(controller.is_playing());
    assert!(log.borrow().play_requests.is_empty());

    controller.handle_media_event(MediaEvent::Ready { seq }).unwrap();
    assert!(controller.is_playing());
    assert_eq!(log.borrow().play_requests, vec!["t0.mp3".to_string()]);
}

#[test]
fn superseding_select_gets_the_only_play_request() {
    // play() on track A, jump to track C before its load is ready, then the
    // ready events arrive. Only C's load may start playback.
    let (mut controller, log) = controller(3);
    let first_seq = last_seq(&log);

    controller.play().unwrap();
    controller.select_track(2);
    let second_seq = last_seq(&log);
    assert_ne!(first_seq, second_seq);

    // Stale completion for the superseded load must change nothing
    controller
        .handle_media_event(MediaEvent::Ready { seq: first_seq })
        .unwrap();
    assert!(log.borrow().play_requests.is_empty());

    controller
        .handle_media_event(MediaEvent::Ready { seq: second_seq })
        .unwrap();

    assert_eq!(controller.current_index(), 2);
    assert!(controller.is_playing());
    assert_eq!(log.borrow().play_requests, vec!["t2.mp3".to_string()]);
}

#[test]
fn stale_ready_does_not_start_playback() {
    let (mut controller, log) = controller(3);

    controller.play().unwrap();
    controller
        .handle_media_event(MediaEvent::Ready { seq: 999 })
        .unwrap();

    assert!(controller.is_playing());
    assert!(log.borrow().play_requests.is_empty());
}

#[test]
fn pause_cancels_pending_autoplay() {
    let (mut controller, log) = controller(3);
    let seq = last_seq(&log);

    controller.play().unwrap();
    controller.pause();
    controller.handle_media_event(MediaEvent::Ready { seq }).unwrap();

    assert!(!controller.is_playing());
    assert!(log.borrow().play_requests.is_empty());
}

#[test]
fn select_while_playing_resumes_on_new_track() {
    let (mut controller, log) = controller(3);
    controller
        .handle_media_event(MediaEvent::Ready { seq: last_seq(&log) })
        .unwrap();
    controller.play().unwrap();

    controller.select_track(1);
    assert!(controller.is_playing());
    assert_eq!(log.borrow().play_requests.len(), 1);

    controller
        .handle_media_event(MediaEvent::Ready { seq: last_seq(&log) })
        .unwrap();
    assert_eq!(
        log.borrow().play_requests,
        vec!["t0.mp3".to_string(), "t1.mp3".to_string()]
    );
}

#[test]
fn select_while_paused_does_not_autoplay() {
    let (mut controller, log) = controller(3);

    controller.select_track(1);
    controller
        .handle_media_event(MediaEvent::Ready { seq: last_seq(&log) })
        .unwrap();

    assert_eq!(controller.current_index(), 1);
    assert!(!controller.is_playing());
    assert!(log.borrow().play_requests.is_empty());
}

#[test]
fn select_current_track_is_a_no_op() {
    let (mut controller, log) = controller(3);

    controller.select_track(0);
    assert_eq!(log.borrow().loads.len(), 1);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "out of range")]
fn select_out_of_range_panics_in_debug() {
    let (mut controller, _log) = controller(3);
    controller.select_track(7);
}

#[test]
fn advance_full_cycle_returns_to_start() {
    let (mut controller, _log) = controller(4);

    for _ in 0..4 {
        controller.advance(Direction::Next);
    }
    assert_eq!(controller.current_index(), 0);

    for _ in 0..4 {
        controller.advance(Direction::Previous);
    }
    assert_eq!(controller.current_index(), 0);
}

#[test]
fn track_end_wraps_and_resumes_playback() {
    // Playing the last track; it ends; playback continues from the first.
    let (mut controller, log) = controller(3);
    controller.select_track(2);
    controller
        .handle_media_event(MediaEvent::Ready { seq: last_seq(&log) })
        .unwrap();
    controller.play().unwrap();

    controller.handle_media_event(MediaEvent::Ended).unwrap();
    assert_eq!(controller.current_index(), 0);
    assert!(controller.is_playing());

    controller
        .handle_media_event(MediaEvent::Ready { seq: last_seq(&log) })
        .unwrap();
    let log = log.borrow();
    assert_eq!(log.play_requests.last(), Some(&"t0.mp3".to_string()));
}

#[test]
fn track_end_while_paused_advances_without_playing() {
    let (mut controller, log) = controller(3);
    controller
        .handle_media_event(MediaEvent::Ready { seq: last_seq(&log) })
        .unwrap();

    controller.handle_media_event(MediaEvent::Ended).unwrap();
    controller
        .handle_media_event(MediaEvent::Ready { seq: last_seq(&log) })
        .unwrap();

    assert_eq!(controller.current_index(), 1);
    assert!(!controller.is_playing());
    assert!(log.borrow().play_requests.is_empty());
}

#[test]
fn rejected_play_rolls_back_intent() {
    let (mut controller, log) = controller(3);
    controller
        .handle_media_event(MediaEvent::Ready { seq: last_seq(&log) })
        .unwrap();
    log.borrow_mut().reject_play = true;

    let result = controller.play();
    assert!(matches!(result, Err(PlayerError::PlaybackRejected(_))));
    assert!(!controller.is_playing());
}

#[test]
fn rejected_deferred_play_rolls_back_on_ready() {
    let (mut controller, log) = controller(3);
    log.borrow_mut().reject_play = true;

    controller.play().unwrap();
    assert!(controller.is_playing());

    let result = controller.handle_media_event(MediaEvent::Ready { seq: last_seq(&log) });
    assert!(matches!(result, Err(PlayerError::PlaybackRejected(_))));
    assert!(!controller.is_playing());
}

#[test]
fn load_failure_leaves_player_paused_on_failed_track() {
    let (mut controller, log) = controller(3);
    controller.play().unwrap();

    let result = controller.handle_media_event(MediaEvent::LoadFailed {
        seq: last_seq(&log),
        reason: "corrupt file".to_string(),
    });

    assert!(matches!(result, Err(PlayerError::LoadFailed { .. })));
    assert!(!controller.is_playing());
    // No auto-advance away from the failed track
    assert_eq!(controller.current_index(), 0);
}

#[test]
fn stale_load_failure_is_ignored() {
    let (mut controller, log) = controller(3);
    controller.play().unwrap();
    controller.select_track(1);

    let result = controller.handle_media_event(MediaEvent::LoadFailed {
        seq: 1,
        reason: "corrupt file".to_string(),
    });

    assert!(result.is_ok());
    assert!(controller.is_playing());

    controller
        .handle_media_event(MediaEvent::Ready { seq: last_seq(&log) })
        .unwrap();
    assert_eq!(log.borrow().play_requests, vec!["t1.mp3".to_string()]);
}

#[test]
fn set_volume_clamps_to_unit_range() {
    let (mut controller, log) = controller(3);

    controller.set_volume(-0.5);
    assert_eq!(log.borrow().volume, 0.0);

    controller.set_volume(1.7);
    assert_eq!(log.borrow().volume, 1.0);
}

#[test]
fn toggle_mute_is_its_own_inverse() {
    let (mut controller, log) = controller(3);
    controller.set_volume(0.73);

    controller.toggle_mute();
    assert_eq!(log.borrow().volume, 0.0);

    controller.toggle_mute();
    assert_eq!(log.borrow().volume, 0.73);
}

#[test]
fn mute_after_sliding_to_zero_restores_last_nonzero() {
    let (mut controller, log) = controller(3);

    controller.set_volume(0.4);
    controller.set_volume(0.0);
    assert_eq!(log.borrow().volume, 0.0);

    controller.toggle_mute();
    assert_eq!(log.borrow().volume, 0.4);
}

#[test]
fn mute_with_no_remembered_volume_restores_full() {
    let (mut controller, log) = controller(3);

    controller.toggle_mute();
    assert_eq!(log.borrow().volume, 0.0);

    controller.toggle_mute();
    assert_eq!(log.borrow().volume, 1.0);
}

#[test]
fn seek_is_a_no_op_without_duration() {
    let (mut controller, log) = controller(3);

    controller.seek(0.5);
    assert_eq!(log.borrow().position, 0.0);
}

#[test]
fn seek_translates_fraction_and_clamps() {
    let (mut controller, log) = controller(3);
    log.borrow_mut().duration = Some(200.0);

    controller.seek(0.5);
    assert_eq!(log.borrow().position, 100.0);
    assert_eq!(controller.position(), 100.0);

    controller.seek(1.7);
    assert_eq!(log.borrow().position, 200.0);

    controller.seek(-0.3);
    assert_eq!(log.borrow().position, 0.0);
}

#[test]
fn rate_cycle_wraps_back_to_normal() {
    let (mut controller, log) = controller(3);
    assert_eq!(controller.rate().to_string(), "1.0X");

    controller.cycle_rate();
    assert_eq!(controller.rate().to_string(), "1.25X");
    assert_eq!(log.borrow().rate, 1.25);

    for _ in 0..5 {
        controller.cycle_rate();
    }
    assert_eq!(controller.rate().to_string(), "1.0X");
    assert_eq!(log.borrow().rate, 1.0);
}

#[test]
fn time_updates_feed_render_position() {
    let (mut controller, _log) = controller(3);

    controller
        .handle_media_event(MediaEvent::TimeUpdate { position: 42.5 })
        .unwrap();
    assert_eq!(controller.position(), 42.5);

    // Switching tracks resets the rendered position
    controller.select_track(1);
    assert_eq!(controller.position(), 0.0);
}
