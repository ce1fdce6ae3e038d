use std::io;
use std::time::Duration;

use anyhow::bail;
use ratatui::{
    backend::CrosstermBackend,
    crossterm::{
        event::{self, Event, KeyCode, KeyEventKind},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
};

use tunedeck_core::{
    commands::PlayerCommand,
    engine::{PlayerEngine, PlayerHandle},
    playlist::{Playlist, Track},
};

mod state;
mod ui;

use state::AppState;

fn main() -> anyhow::Result<()> {
    // Initialize tui_logger for the in-UI log pane
    tui_logger::init_logger(log::LevelFilter::Debug).expect("Failed to init tui_logger");
    tui_logger::set_default_level(log::LevelFilter::Debug);

    log::info!("Starting Tunedeck TUI");

    // Playlist comes from command line args, fixed for the whole session
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        bail!("Usage: tunedeck-tui <audio file> [audio file ...]");
    }

    let tracks: Vec<Track> = args.iter().map(|path| Track::from_path(path)).collect();
    let playlist = Playlist::new(tracks.clone())?;

    // Create the playback engine and get the communication handle
    let (engine, handle) = PlayerEngine::new(playlist)?;

    // Spawn the engine on its dedicated thread
    let _engine_thread = engine.spawn();

    run_tui(handle, tracks)
}

fn run_tui(handle: PlayerHandle, tracks: Vec<Track>) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut state = AppState::new(tracks);

    loop {
        // Handle engine responses
        let mut shutdown = false;
        while let Ok(response) = handle.resp_rx.try_recv() {
            if state.handle_response(response) {
                shutdown = true;
            }
        }
        if shutdown {
            break;
        }

        // Draw UI
        terminal.draw(|f| ui::draw(f, &mut state))?;

        // Handle input
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let should_quit = handle_key(key.code, &mut state, &handle)?;
                    if should_quit {
                        break;
                    }
                }
            }
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

fn handle_key(key: KeyCode, state: &mut AppState, handle: &PlayerHandle) -> anyhow::Result<bool> {
    // A keypress dismisses any stale error notice
    state.error_message = None;

    match key {
        KeyCode::Char('q') => {
            let _ = handle.cmd_tx.send(PlayerCommand::Quit);
            return Ok(true);
        }
        KeyCode::Char(' ') => {
            handle.cmd_tx.send(PlayerCommand::Toggle)?;
        }
        KeyCode::Char('n') => {
            handle.cmd_tx.send(PlayerCommand::Next)?;
        }
        KeyCode::Char('p') => {
            handle.cmd_tx.send(PlayerCommand::Previous)?;
        }
        KeyCode::Char('m') => {
            handle.cmd_tx.send(PlayerCommand::ToggleMute)?;
        }
        KeyCode::Char('x') => {
            handle.cmd_tx.send(PlayerCommand::CycleRate)?;
        }
        KeyCode::Char('l') => {
            state.show_playlist = !state.show_playlist;
        }
        KeyCode::Esc if state.show_playlist => {
            state.show_playlist = false;
        }
        KeyCode::Up => {
            handle.cmd_tx.send(PlayerCommand::SetVolume(state.volume + 0.05))?;
        }
        KeyCode::Down => {
            handle.cmd_tx.send(PlayerCommand::SetVolume(state.volume - 0.05))?;
        }
        KeyCode::Left => {
            if let Some(fraction) = seek_target(state, -5.0) {
                handle.cmd_tx.send(PlayerCommand::Seek(fraction))?;
            }
        }
        KeyCode::Right => {
            if let Some(fraction) = seek_target(state, 5.0) {
                handle.cmd_tx.send(PlayerCommand::Seek(fraction))?;
            }
        }
        KeyCode::Char('j') if state.show_playlist => {
            state.playlist_next();
        }
        KeyCode::Char('k') if state.show_playlist => {
            state.playlist_prev();
        }
        KeyCode::Enter if state.show_playlist => {
            if let Some(index) = state.playlist_state.selected() {
                // Select then play, like clicking a song row
                handle.cmd_tx.send(PlayerCommand::SelectTrack(index))?;
                handle.cmd_tx.send(PlayerCommand::Play)?;
            }
        }
        _ => {}
    }

    Ok(false)
}

/// Fraction of the track `offset_secs` away from the current position, or
/// `None` while the duration is still unknown.
fn seek_target(state: &AppState, offset_secs: f32) -> Option<f32> {
    let duration = state.duration.filter(|d| *d > 0.0)?;
    Some(((state.position + offset_secs) / duration).clamp(0.0, 1.0))
}
