//! Header: 2-row top bar.
//!
//! Row 1: player line (playing channel + stream, no-stream notice, or idle).
//! Row 2: startup error, or the selected channel's tooltip and the list size.
//!
//! Not focusable.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use tabla_core::state::PlayerState;

use crate::{
    app_state::AppState,
    theme::{style_muted, style_playing, style_secondary, C_CONNECTING, C_ERROR, C_MUTED, C_TAG},
};

pub fn draw_header(frame: &mut Frame, area: Rect, state: &AppState) {
    frame.render_widget(Clear, area);
    if area.height < 2 {
        frame.render_widget(Paragraph::new(player_line(state)), area);
        return;
    }
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);
    frame.render_widget(Paragraph::new(player_line(state)), rows[0]);
    frame.render_widget(Paragraph::new(info_line(state)), rows[1]);
}

fn player_line(state: &AppState) -> Line<'static> {
    if let Some(err) = &state.player_error {
        return Line::from(vec![
            Span::raw(" "),
            Span::styled(
                "✗ player: ",
                Style::default().fg(C_ERROR).add_modifier(Modifier::BOLD),
            ),
            Span::styled(err.clone(), Style::default().fg(C_ERROR)),
        ]);
    }
    match &state.model.player {
        PlayerState::Playing { channel_id, url } => Line::from(vec![
            Span::raw(" "),
            Span::styled("▶ ", style_playing()),
            Span::styled(state.channel_name(*channel_id), style_playing()),
            Span::raw("  "),
            Span::styled(url.clone(), style_muted()),
        ]),
        PlayerState::NoStream { message, .. } => Line::from(vec![
            Span::raw(" "),
            Span::styled("■ ", Style::default().fg(C_CONNECTING)),
            Span::styled(message.clone(), Style::default().fg(C_CONNECTING)),
        ]),
        PlayerState::Stopped => Line::from(vec![
            Span::raw(" "),
            Span::styled("■  nothing playing", Style::default().fg(C_MUTED)),
        ]),
    }
}

fn info_line(state: &AppState) -> Line<'static> {
    let model = &state.model;
    if let Some(err) = &model.startup_error {
        return Line::from(vec![
            Span::raw(" "),
            Span::styled(
                err.clone(),
                Style::default().fg(C_ERROR).add_modifier(Modifier::BOLD),
            ),
        ]);
    }

    let mut spans = vec![Span::raw(" ")];
    if model.channels_loading {
        spans.push(Span::styled("loading channels…", style_muted()));
    } else {
        spans.push(Span::styled(
            format!(
                "{} of {} channels",
                model.visible_channels().len(),
                model.channels.len()
            ),
            style_secondary(),
        ));
    }
    if let Some(ch) = model.selected.and_then(|id| model.lookup(id)) {
        let tooltip = ch.tooltip();
        spans.push(Span::styled("  │  ", style_muted()));
        spans.push(Span::styled(ch.name.clone(), style_secondary()));
        if !tooltip.is_empty() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(tooltip, Style::default().fg(C_TAG)));
        }
    }
    Line::from(spans)
}
