use std::collections::VecDeque;
use std::fs::File;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Context;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use lofty::{file::AudioFile, probe::Probe};
use rodio::{
    Decoder, DeviceTrait, OutputStream, OutputStreamBuilder, Sink, Source,
    cpal::{self, traits::HostTrait},
};

use crate::commands::{PlayerCommand, PlayerResponse, PlayerSnapshot};
use crate::controller::{Direction, PlayerController};
use crate::error::{PlayerError, Result};
use crate::playlist::Playlist;
use crate::port::{MediaEvent, MediaPort};

/// How often the engine loop wakes up to pump port events and publish state
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Media port backed by a rodio `Sink` on the default output device.
///
/// `load` decodes synchronously but still reports completion through the
/// event queue, so the controller sees the same async lifecycle it would get
/// from a streaming host. `tick` synthesizes `TimeUpdate` and `Ended` events
/// from sink state.
pub struct RodioPort {
    _stream: OutputStream,
    sink: Sink,
    duration: Option<f32>,
    track_loaded: bool,
    events: VecDeque<MediaEvent>,
}

impl RodioPort {
    pub fn try_new_default() -> anyhow::Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .context("No default output device found")?;

        let device_name = device.name().unwrap_or_else(|_| "(unknown)".to_string());
        log::info!("Opening output stream on {}", device_name);

        let stream_builder = OutputStreamBuilder::from_device(device)
            .context("cannot create output stream builder from device")?;

        let stream = stream_builder
            .open_stream()
            .context("Cannot create stream output")?;

        let sink = Sink::connect_new(&stream.mixer());
        sink.pause();

        Ok(RodioPort {
            _stream: stream,
            sink,
            duration: None,
            track_loaded: false,
            events: VecDeque::new(),
        })
    }

    /// Fall back to the container metadata when the decoder cannot tell
    fn probe_duration(source: &str) -> Option<f32> {
        let tagged_file = Probe::open(source).and_then(|p| p.read()).ok()?;
        Some(tagged_file.properties().duration().as_secs_f32())
    }
}

impl MediaPort for RodioPort {
    fn load(&mut self, source: &str, seq: u64) {
        self.sink.clear();
        self.duration = None;
        self.track_loaded = false;

        let file = match File::open(source) {
            Ok(file) => file,
            Err(e) => {
                self.events
                    .push_back(MediaEvent::LoadFailed { seq, reason: e.to_string() });
                return;
            }
        };
        let decoder = match Decoder::try_from(file) {
            Ok(decoder) => decoder,
            Err(e) => {
                self.events
                    .push_back(MediaEvent::LoadFailed { seq, reason: e.to_string() });
                return;
            }
        };

        self.duration = decoder
            .total_duration()
            .map(|d| d.as_secs_f32())
            .or_else(|| Self::probe_duration(source));

        // The sink stays paused until the controller asks to play
        self.sink.append(decoder);
        self.track_loaded = true;
        self.events.push_back(MediaEvent::Ready { seq });
    }

    fn request_play(&mut self) -> Result<()> {
        if !self.track_loaded {
            return Err(PlayerError::PlaybackRejected(
                "no source loaded".to_string(),
            ));
        }
        self.sink.play();
        Ok(())
    }

    fn request_pause(&mut self) {
        self.sink.pause();
    }

    fn position(&self) -> f32 {
        self.sink.get_pos().as_secs_f32()
    }

    fn set_position(&mut self, seconds: f32) {
        if let Err(e) = self.sink.try_seek(Duration::from_secs_f32(seconds)) {
            log::warn!("Seek failed: {:?}", e);
        }
    }

    fn duration(&self) -> Option<f32> {
        self.duration
    }

    fn volume(&self) -> f32 {
        self.sink.volume()
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn set_rate(&mut self, rate: f32) {
        self.sink.set_speed(rate);
    }

    fn tick(&mut self) {
        if !self.track_loaded {
            return;
        }
        if self.sink.empty() {
            if !self.sink.is_paused() {
                self.track_loaded = false;
                self.events.push_back(MediaEvent::Ended);
            }
        } else if !self.sink.is_paused() {
            self.events.push_back(MediaEvent::TimeUpdate {
                position: self.sink.get_pos().as_secs_f32(),
            });
        }
    }

    fn take_events(&mut self) -> Vec<MediaEvent> {
        self.events.drain(..).collect()
    }
}

/// Communication handle given to the presentation layer
pub struct PlayerHandle {
    pub cmd_tx: Sender<PlayerCommand>,
    pub resp_rx: Receiver<PlayerResponse>,
}

/// Playback engine that runs the controller on a dedicated thread,
/// translating channel commands into controller calls and publishing
/// snapshots back.
pub struct PlayerEngine {
    controller: PlayerController<RodioPort>,
    cmd_rx: Receiver<PlayerCommand>,
    resp_tx: Sender<PlayerResponse>,
}

impl PlayerEngine {
    /// Open the default output device and create the engine plus the handle
    /// the UI talks through.
    pub fn new(playlist: Playlist) -> anyhow::Result<(Self, PlayerHandle)> {
        let port = RodioPort::try_new_default()?;
        let controller = PlayerController::new(playlist, port);

        let (cmd_tx, cmd_rx) = unbounded();
        let (resp_tx, resp_rx) = unbounded();

        let engine = PlayerEngine {
            controller,
            cmd_rx,
            resp_tx,
        };
        let handle = PlayerHandle { cmd_tx, resp_rx };
        Ok((engine, handle))
    }

    /// Run the engine loop on its own thread
    pub fn spawn(self) -> JoinHandle<()> {
        thread::spawn(move || self.run())
    }

    fn run(mut self) {
        log::info!("Playback engine started");
        loop {
            match self.cmd_rx.recv_timeout(TICK_INTERVAL) {
                Ok(command) => {
                    if self.handle_command(command) {
                        break;
                    }
                    // Drain any burst of queued commands before the next tick
                    let mut quit = false;
                    while let Ok(command) = self.cmd_rx.try_recv() {
                        if self.handle_command(command) {
                            quit = true;
                            break;
                        }
                    }
                    if quit {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if let Err(e) = self.controller.pump() {
                let _ = self.resp_tx.send(PlayerResponse::Error(e.to_string()));
            }
            let _ = self.resp_tx.send(PlayerResponse::State(self.snapshot()));
        }
        log::info!("Playback engine stopped");
    }

    /// Apply one command. Returns true when the engine should shut down.
    fn handle_command(&mut self, command: PlayerCommand) -> bool {
        let result = match command {
            PlayerCommand::Play => self.controller.play(),
            PlayerCommand::Pause => {
                self.controller.pause();
                Ok(())
            }
            PlayerCommand::Toggle => self.controller.toggle(),
            PlayerCommand::Next => {
                self.controller.advance(Direction::Next);
                Ok(())
            }
            PlayerCommand::Previous => {
                self.controller.advance(Direction::Previous);
                Ok(())
            }
            PlayerCommand::SelectTrack(index) => {
                self.controller.select_track(index);
                Ok(())
            }
            PlayerCommand::Seek(fraction) => {
                self.controller.seek(fraction);
                Ok(())
            }
            PlayerCommand::SetVolume(volume) => {
                self.controller.set_volume(volume);
                Ok(())
            }
            PlayerCommand::ToggleMute => {
                self.controller.toggle_mute();
                Ok(())
            }
            PlayerCommand::CycleRate => {
                self.controller.cycle_rate();
                Ok(())
            }
            PlayerCommand::Quit => {
                self.controller.pause();
                let _ = self.resp_tx.send(PlayerResponse::Shutdown);
                return true;
            }
        };

        if let Err(e) = result {
            let _ = self.resp_tx.send(PlayerResponse::Error(e.to_string()));
        }
        false
    }

    fn snapshot(&self) -> PlayerSnapshot {
        let track = self.controller.current_track();
        PlayerSnapshot {
            current_index: self.controller.current_index(),
            is_playing: self.controller.is_playing(),
            track_name: track.name.clone(),
            track_artist: track.artist.clone(),
            position: self.controller.position(),
            duration: self.controller.duration(),
            volume: self.controller.volume(),
            rate_label: self.controller.rate().to_string(),
        }
    }
}
