//! UI rendering for the terminal interface: spectrum panel, status line,
//! track list and controls footer.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::App;
use crate::audio::PlaybackState;
use crate::config::{ControlsSettings, UiSettings, VisualizerSettings};

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Render a spectrum frame as rows of block characters, top row first.
/// Bar heights are scaled from the clamped display range onto `height`
/// cells; the floor maps to an empty column.
fn spectrum_lines(frame: &[f32], height: usize, floor: f32, ceiling: f32) -> Vec<String> {
    let span = (ceiling - floor).max(f32::EPSILON);
    let levels: Vec<usize> = frame
        .iter()
        .map(|&v| {
            let norm = ((v - floor) / span).clamp(0.0, 1.0);
            (norm * height as f32).round() as usize
        })
        .collect();

    (0..height)
        .map(|row| {
            let cutoff = height - row;
            levels
                .iter()
                .map(|&lvl| if lvl >= cutoff { '█' } else { ' ' })
                .collect()
        })
        .collect()
}

/// Render the entire UI into `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    spectrum: &[f32],
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
    visualizer: &VisualizerSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(10),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" tinamp ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Spectrum panel
    {
        let inner_height = chunks[1].height.saturating_sub(2) as usize;
        let lines = spectrum_lines(spectrum, inner_height, visualizer.floor, visualizer.ceiling);
        let body = lines.join("\n");
        let panel = Paragraph::new(body).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" spectrum "),
        );
        frame.render_widget(panel, chunks[1]);
    }

    // Status box
    let status = {
        let mut parts: Vec<String> = Vec::new();

        if let Some(ref h) = app.playback_handle {
            if let Ok(info) = h.lock() {
                match info.state {
                    PlaybackState::Stopped => parts.push("Stopped".to_string()),
                    state => {
                        if let Some(idx) = info.index {
                            if let Some(track) = app.tracks.get(idx) {
                                let time = match info.duration {
                                    Some(total) => format!(
                                        "{} / {}",
                                        format_mmss(info.elapsed),
                                        format_mmss(total)
                                    ),
                                    None => format_mmss(info.elapsed),
                                };
                                parts.push(format!("Song: {} [{}]", track.display, time));
                            }
                        }
                        parts.push(
                            match state {
                                PlaybackState::Playing => "Playing",
                                _ => "Paused",
                            }
                            .to_string(),
                        );
                    }
                }

                if let Some(err) = &info.last_error {
                    parts.push(format!("! {err}"));
                }
            }
        }

        parts.push(format!(
            "Shuffle: {}",
            if app.shuffle { "ON" } else { "OFF" }
        ));
        parts.push(format!("Vol: {:.0}%", app.volume * 100.0));

        if let Some(dir) = &app.current_dir {
            parts.push(format!("Dir: {}", dir));
        }

        parts.join(" • ")
    };

    let status_par = Paragraph::new(status)
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[2]);

    // Track list: windowed around the cursor so long playlists stay cheap.
    {
        let total = app.tracks.len();
        let list_height = chunks[3].height.saturating_sub(2) as usize;
        let sel = app.selected.min(total.saturating_sub(1));
        let (start, end, selected_pos) = if total <= list_height || list_height == 0 {
            (0, total, sel)
        } else {
            let half = list_height / 2;
            let mut start = sel.saturating_sub(half);
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height, sel - start)
        };

        let items: Vec<ListItem> = app.tracks[start..end]
            .iter()
            .enumerate()
            .map(|(offset, track)| {
                ListItem::new(format!("{}. {}", start + offset + 1, track.display))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" playlist "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if total > 0 {
            state.select(Some(selected_pos));
        }
        frame.render_stateful_widget(list, chunks[3], &mut state);
    }

    // Footer
    let footer_text = format!(
        "[j/k] up/down | [enter] play selected | [space/p] play/pause | [x] stop | [h/l] prev/next | [H/L] scrub -/+{}s | [s] shuffle | [-/+] volume | [a] add | [c] clear | [q] quit",
        controls_settings.scrub_seconds
    );
    let footer = Paragraph::new(footer_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_mmss_pads_minutes_and_seconds() {
        assert_eq!(format_mmss(Duration::ZERO), "00:00");
        assert_eq!(format_mmss(Duration::from_secs(65)), "01:05");
        assert_eq!(format_mmss(Duration::from_secs(600)), "10:00");
    }

    #[test]
    fn spectrum_lines_floor_frame_is_blank() {
        let frame = vec![2.0f32; 8];
        let lines = spectrum_lines(&frame, 4, 2.0, 15.0);
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().all(|l| l.chars().all(|c| c == ' ')));
    }

    #[test]
    fn spectrum_lines_ceiling_bar_fills_the_column() {
        let frame = vec![15.0f32, 2.0];
        let lines = spectrum_lines(&frame, 3, 2.0, 15.0);
        for line in &lines {
            let chars: Vec<char> = line.chars().collect();
            assert_eq!(chars[0], '█');
            assert_eq!(chars[1], ' ');
        }
    }

    #[test]
    fn spectrum_lines_scale_monotonically() {
        // Mid-range value fills roughly half the column, from the bottom.
        let frame = vec![8.5f32];
        let lines = spectrum_lines(&frame, 4, 2.0, 15.0);
        let filled: Vec<bool> = lines.iter().map(|l| l.starts_with('█')).collect();
        assert_eq!(filled, vec![false, false, true, true]);
    }
}
