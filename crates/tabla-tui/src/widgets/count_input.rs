//! CountInput: tui-input prompt for the requested channel count.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};
use unicode_width::UnicodeWidthChar;

use tabla_core::limit::{effective_count, parse_requested_count};

use crate::theme::{C_FILTER_BG, C_FILTER_FG, C_MUTED};

const PROMPT: &str = "# ";

#[derive(Debug, PartialEq)]
pub enum CountAction {
    /// Parsed request; `None` for empty or non-numeric text.
    Submitted(Option<f64>),
    Cancelled,
    Editing,
}

pub struct CountInput {
    input: Input,
    pub active: bool,
}

/// `value` without its first `skip_cols` display columns.
fn skip_columns(value: &str, skip_cols: usize) -> &str {
    let mut cols = 0;
    for (i, c) in value.char_indices() {
        if cols >= skip_cols {
            return &value[i..];
        }
        cols += c.width().unwrap_or(0);
    }
    ""
}

impl CountInput {
    pub fn new() -> Self {
        Self {
            input: Input::default(),
            active: false,
        }
    }

    /// Open pre-filled with the count currently in effect.
    pub fn activate(&mut self, current: usize) {
        self.input = Input::new(current.to_string());
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn text(&self) -> &str {
        self.input.value()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> CountAction {
        match key.code {
            KeyCode::Esc => {
                self.deactivate();
                CountAction::Cancelled
            }
            KeyCode::Enter => {
                self.deactivate();
                CountAction::Submitted(parse_requested_count(Some(self.input.value())))
            }
            _ => {
                self.input.handle_event(&Event::Key(key));
                CountAction::Editing
            }
        }
    }

    /// Prompt text followed by the count it would produce.
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let value = self.text();
        let width = area.width.saturating_sub(PROMPT.len() as u16 + 1) as usize;
        let scroll = self.input.visual_scroll(width);
        let preview = effective_count(parse_requested_count(Some(value)));

        let line = Line::from(vec![
            Span::styled(PROMPT, Style::default().fg(C_MUTED)),
            Span::styled(
                skip_columns(value, scroll).to_string(),
                Style::default().fg(C_FILTER_FG),
            ),
            Span::styled(
                format!("   → {} channels", preview),
                Style::default().fg(C_MUTED),
            ),
        ]);
        frame.render_widget(
            Paragraph::new(line).style(Style::default().bg(C_FILTER_BG)),
            area,
        );

        if self.active && area.width > 0 {
            let cursor_x =
                area.x + PROMPT.len() as u16 + self.input.visual_cursor().saturating_sub(scroll) as u16;
            frame.set_cursor_position((cursor_x.min(area.x + area.width - 1), area.y));
        }
    }
}

impl Default for CountInput {
    fn default() -> Self {
        Self::new()
    }
}
