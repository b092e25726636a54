//! Status bar: bottom line with input mode and keybindings.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_MODE_COUNT, C_MODE_NORMAL, C_MUTED, C_PLAYING};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    /// Typing a new channel count.
    Count,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Count => "COUNT",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Count => C_MODE_COUNT,
        }
    }

    pub fn keys(self) -> &'static str {
        match self {
            Self::Normal => {
                " ↑↓/jk move  Enter schedule  p play  [ ] play prev/next  x stop  # count  R reload  y copy url  Tab panes  K keys  q quit"
            }
            Self::Count => " type a number  Enter apply (empty = default)  Esc cancel",
        }
    }
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode, playing: bool) {
    let mut spans = vec![Span::styled(
        format!(" {} ", mode.label()),
        Style::default()
            .fg(mode.color())
            .add_modifier(Modifier::BOLD),
    )];
    let bulb = if playing { C_PLAYING } else { C_MUTED };
    spans.push(Span::styled(
        "●",
        Style::default().fg(bulb).add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::raw(" "));
    spans.push(Span::styled(mode.keys(), Style::default().fg(C_MUTED)));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
