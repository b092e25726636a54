//! SchedulePanel: right pane, today's remaining programmes for the selected channel.
//!
//! Content is built as a flat list of lines and scrolled vertically; long
//! descriptions are word-wrapped to the panel width.

use chrono::{DateTime, Utc};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use tabla_core::model::{ScheduleEntry, ScheduleView, EMPTY_SCHEDULE_TEXT};
use tabla_core::state::SchedulePane;
use tabla_core::timestamp::format_hhmm;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_BADGE_LIVE, C_BADGE_PENDING, C_MUTED, C_ON_AIR, C_PRIMARY, C_SECONDARY, C_TIME},
    widgets::pane_chrome::{pane_chrome, Badge},
};

const INDENT: &str = "  ";

pub struct SchedulePanel {
    pub scroll: usize,
}

impl SchedulePanel {
    pub fn new() -> Self {
        Self { scroll: 0 }
    }
}

impl Default for SchedulePanel {
    fn default() -> Self {
        Self::new()
    }
}

/// "06:00 – 09:00"
fn fmt_time_range(entry: &ScheduleEntry) -> String {
    format!("{} – {}", format_hhmm(entry.start), format_hhmm(entry.end))
}

fn is_on_air(entry: &ScheduleEntry, now: DateTime<Utc>) -> bool {
    entry.start <= now && now < entry.end
}

/// Greedy word wrap measured in display columns.
fn word_wrap(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
            } else if current.width() + 1 + word.width() <= width {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

fn build_lines(view: &ScheduleView, now: DateTime<Utc>, width: u16) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            view.heading(),
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if view.is_empty() {
        lines.push(Line::from(Span::styled(
            EMPTY_SCHEDULE_TEXT,
            Style::default().fg(C_MUTED),
        )));
        return lines;
    }

    let text_width = (width as usize).saturating_sub(INDENT.len());
    for (i, entry) in view.entries.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        let on_air = is_on_air(entry, now);
        let mut title_style = Style::default().fg(C_PRIMARY);
        if on_air {
            title_style = title_style.add_modifier(Modifier::BOLD);
        }
        let mut head = vec![
            Span::styled(fmt_time_range(entry), Style::default().fg(C_TIME)),
            Span::raw("  "),
            Span::styled(entry.title.clone(), title_style),
        ];
        if on_air {
            head.push(Span::styled(
                "  ● on air",
                Style::default().fg(C_ON_AIR).add_modifier(Modifier::BOLD),
            ));
        }
        lines.push(Line::from(head));

        if let Some(subtitle) = &entry.subtitle {
            for l in word_wrap(subtitle, text_width) {
                lines.push(Line::from(Span::styled(
                    format!("{}{}", INDENT, l),
                    Style::default().fg(C_SECONDARY),
                )));
            }
        }
        if let Some(description) = &entry.description {
            for l in word_wrap(description, text_width) {
                lines.push(Line::from(Span::styled(
                    format!("{}{}", INDENT, l),
                    Style::default().fg(C_MUTED),
                )));
            }
        }
    }
    lines
}

impl Component for SchedulePanel {
    fn id(&self) -> ComponentId {
        ComponentId::SchedulePanel
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll += 1,
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            KeyCode::PageDown => self.scroll += 10,
            KeyCode::Home | KeyCode::Char('g') => self.scroll = 0,
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
            MouseEventKind::ScrollDown => self.scroll += 1,
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::Select(_) = action {
            self.scroll = 0;
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let badge = match &state.model.schedule {
            SchedulePane::Loading { .. } => Some(Badge {
                text: "LOADING".into(),
                color: C_BADGE_PENDING,
            }),
            SchedulePane::Ready(view) if !view.is_empty() => Some(Badge {
                text: format!("{} left", view.len()),
                color: C_BADGE_LIVE,
            }),
            _ => None,
        };
        let block = pane_chrome("schedule", Some('2'), focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines = match &state.model.schedule {
            SchedulePane::Empty => vec![Line::from(Span::styled(
                "  select a channel",
                Style::default().fg(C_MUTED),
            ))],
            SchedulePane::Loading { channel_id, .. } => vec![Line::from(Span::styled(
                format!("  loading schedule for {}…", state.channel_name(*channel_id)),
                Style::default().fg(C_MUTED),
            ))],
            SchedulePane::Ready(view) => build_lines(view, state.now, inner.width),
        };

        let max_scroll = lines.len().saturating_sub(inner.height as usize);
        if self.scroll > max_scroll {
            self.scroll = max_scroll;
        }
        frame.render_widget(
            Paragraph::new(lines).scroll((self.scroll as u16, 0)),
            inner,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn entry(title: &str, start: i64, end: i64, description: Option<&str>) -> ScheduleEntry {
        ScheduleEntry {
            title: title.into(),
            subtitle: None,
            description: description.map(str::to_string),
            start: at(start),
            end: at(end),
        }
    }

    fn view(entries: Vec<ScheduleEntry>) -> ScheduleView {
        ScheduleView {
            channel_id: 132,
            channel_name: "P1".into(),
            date: NaiveDate::from_ymd_opt(2023, 10, 16).unwrap(),
            built_at: at(0),
            entries,
        }
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_word_wrap_respects_width() {
        let lines = word_wrap("a quick brown fox jumps over", 10);
        assert_eq!(lines, vec!["a quick", "brown fox", "jumps over"]);
        assert!(lines.iter().all(|l| l.width() <= 10));
        assert_eq!(word_wrap("unbreakableword", 4), vec!["unbreakableword"]);
    }

    #[test]
    fn test_empty_view_shows_fallback() {
        let lines = build_lines(&view(vec![]), at(0), 40);
        assert_eq!(text(&lines[0]), "P1 - 2023-10-16");
        assert_eq!(text(lines.last().unwrap()), EMPTY_SCHEDULE_TEXT);
    }

    #[test]
    fn test_on_air_marker_only_for_running_entry() {
        let v = view(vec![
            entry("Morgonpasset", 1_000, 5_000, None),
            entry("Ekot", 5_000, 6_000, Some("Nyheter från Ekoredaktionen")),
        ]);
        let lines = build_lines(&v, at(2_000), 80);
        let rendered: Vec<String> = lines.iter().map(text).collect();
        let morning = rendered.iter().find(|l| l.contains("Morgonpasset")).unwrap();
        let ekot = rendered.iter().find(|l| l.contains("Ekot")).unwrap();
        assert!(morning.contains("on air"));
        assert!(!ekot.contains("on air"));
        assert!(rendered
            .iter()
            .any(|l| l == "  Nyheter från Ekoredaktionen"));
    }
}
