use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph},
};
use tui_logger::TuiLoggerWidget;

use crate::state::AppState;

/// Draw the TUI interface
pub fn draw(f: &mut Frame, state: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(0),    // Player + playlist panel
            Constraint::Length(3), // Controls info
            Constraint::Length(3), // Status bar
        ])
        .split(f.area());

    let content_area = chunks[0];
    draw_content(f, content_area, state);
    draw_controls(f, chunks[1], state);
    draw_status(f, chunks[2], state);
}

/// Split the content area between the player column and the slide-out
/// playlist panel
fn draw_content(f: &mut Frame, area: Rect, state: &mut AppState) {
    if state.show_playlist {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(40), Constraint::Length(34)])
            .split(area);
        draw_player(f, columns[0], state);
        draw_playlist_panel(f, columns[1], state);
    } else {
        draw_player(f, area, state);
    }
}

fn draw_player(f: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Now playing info
            Constraint::Length(3), // Progress bar
            Constraint::Length(3), // Volume bar
            Constraint::Min(0),    // Log pane
        ])
        .split(area);

    draw_now_playing(f, chunks[0], state);
    draw_progress(f, chunks[1], state);
    draw_volume(f, chunks[2], state);
    draw_log(f, chunks[3]);
}

/// Draw the now playing section
fn draw_now_playing(f: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(" 🎵 Now Playing ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let text = vec![
        Line::from(Span::styled(
            state.track_name.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            state.track_artist.clone(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            format!("Speed: {}", state.rate_label),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    f.render_widget(Paragraph::new(text), inner);
}

/// Draw the progress bar
fn draw_progress(f: &mut Frame, area: Rect, state: &AppState) {
    let progress_pct = (state.progress() * 100.0) as u16;
    let position_str = AppState::format_time(state.position);
    let duration_str = AppState::format_time(state.duration.unwrap_or(0.0));

    let label = format!("{} / {}", position_str, duration_str);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray))
        .percent(progress_pct)
        .label(label);

    f.render_widget(gauge, area);
}

/// Draw the volume bar
fn draw_volume(f: &mut Frame, area: Rect, state: &AppState) {
    let volume_pct = (state.volume.clamp(0.0, 1.0) * 100.0) as u16;
    let label = if volume_pct == 0 {
        "Muted".to_string()
    } else {
        format!("Vol {:3}%", volume_pct)
    };

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Volume "))
        .gauge_style(Style::default().fg(Color::Green).bg(Color::DarkGray))
        .percent(volume_pct)
        .label(label);

    f.render_widget(gauge, area);
}

/// Draw the log pane
fn draw_log(f: &mut Frame, area: Rect) {
    let log_widget = TuiLoggerWidget::default()
        .block(
            Block::default()
                .title(" 📋 Log ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .style(Style::default().fg(Color::White));

    f.render_widget(log_widget, area);
}

/// Draw the playlist side panel
fn draw_playlist_panel(f: &mut Frame, area: Rect, state: &mut AppState) {
    let title = format!(" Playlist ({} tracks) ", state.tracks.len());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let items: Vec<ListItem> = state
        .tracks
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let is_current = state.current_index == i;
            let prefix = if is_current { "▶ " } else { "  " };
            let style = if is_current {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}{}", prefix, track.name), style),
                Span::styled(format!("  {}", track.artist), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    f.render_stateful_widget(list, area, &mut state.playlist_state);
}

/// Draw the controls help section
fn draw_controls(f: &mut Frame, area: Rect, state: &AppState) {
    let controls = if state.show_playlist {
        vec![
            Span::styled("[J/K]", Style::default().fg(Color::Yellow)),
            Span::raw(" Move  "),
            Span::styled("[Enter]", Style::default().fg(Color::Yellow)),
            Span::raw(" Play Track  "),
            Span::styled("[L]", Style::default().fg(Color::Magenta)),
            Span::raw(" Close Playlist  "),
            Span::styled("[Q]", Style::default().fg(Color::Red)),
            Span::raw(" Quit"),
        ]
    } else {
        vec![
            Span::styled("[Space]", Style::default().fg(Color::Yellow)),
            Span::raw(" Play/Pause  "),
            Span::styled("[N/P]", Style::default().fg(Color::Yellow)),
            Span::raw(" Next/Prev  "),
            Span::styled("[←/→]", Style::default().fg(Color::Yellow)),
            Span::raw(" Seek  "),
            Span::styled("[↑/↓]", Style::default().fg(Color::Yellow)),
            Span::raw(" Volume  "),
            Span::styled("[M]", Style::default().fg(Color::Yellow)),
            Span::raw(" Mute  "),
            Span::styled("[X]", Style::default().fg(Color::Yellow)),
            Span::raw(" Speed  "),
            Span::styled("[L]", Style::default().fg(Color::Magenta)),
            Span::raw(" Playlist  "),
            Span::styled("[Q]", Style::default().fg(Color::Red)),
            Span::raw(" Quit"),
        ]
    };

    let paragraph = Paragraph::new(Line::from(controls))
        .block(Block::default().borders(Borders::ALL).title(" Controls "));

    f.render_widget(paragraph, area);
}

/// Draw the status section
fn draw_status(f: &mut Frame, area: Rect, state: &AppState) {
    let status_style = if state.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else if state.is_playing {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Yellow)
    };

    let status_text = match &state.error_message {
        Some(error) => format!("Error: {}", error),
        None => format!(
            "{}  |  Track {}/{}  |  {}",
            state.status_message,
            state.current_index + 1,
            state.tracks.len(),
            state.rate_label
        ),
    };

    let paragraph = Paragraph::new(status_text)
        .style(status_style)
        .block(Block::default().borders(Borders::ALL).title(" Status "));

    f.render_widget(paragraph, area);
}
