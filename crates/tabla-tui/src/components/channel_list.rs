//! ChannelList component: left pane, the visible slice of the channel directory.

use std::time::Instant;

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use tabla_core::model::{ChannelId, ChannelRef};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{
        C_ACCENT, C_BADGE_LIVE, C_BADGE_PENDING, C_MUTED, C_PLAYING, C_PRIMARY, C_SECONDARY,
        C_SELECTION_BG, C_TAG,
    },
    widgets::{
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
    },
};

const DOUBLE_CLICK_MS: u128 = 400;

pub struct ChannelList {
    pub list: ScrollableList<ChannelRef>,
    list_state: ListState,
    /// Model selection at the last sync; the cursor follows it only when it changes.
    last_selected: Option<ChannelId>,
    last_click: Option<(usize, Instant)>,
}

impl ChannelList {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(),
            list_state: ListState::default(),
            last_selected: None,
            last_click: None,
        }
    }

    pub fn cursor_channel(&self) -> Option<&ChannelRef> {
        self.list.selected_item()
    }

    fn cursor_id(&self) -> Option<ChannelId> {
        self.cursor_channel().map(|c| c.id)
    }

    fn render_item<'a>(
        channel: &'a ChannelRef,
        under_cursor: bool,
        state: &AppState,
    ) -> ListItem<'a> {
        let is_playing = state.playing_channel() == Some(channel.id);
        let is_selected = state.model.selected == Some(channel.id);

        let (icon, icon_style) = if is_playing {
            ("▶", Style::default().fg(C_PLAYING))
        } else if is_selected {
            ("●", Style::default().fg(C_ACCENT))
        } else {
            (" ", Style::default())
        };

        let name_color = if is_playing {
            C_PLAYING
        } else if under_cursor || is_selected {
            C_PRIMARY
        } else {
            C_SECONDARY
        };
        let mut name_style = Style::default().fg(name_color);
        if under_cursor || is_selected {
            name_style = name_style.add_modifier(Modifier::BOLD);
        }

        let mut spans = vec![
            Span::raw(" "),
            Span::styled(icon, icon_style),
            Span::raw(" "),
            Span::styled(channel.name.as_str(), name_style),
        ];
        if let Some(kind) = channel.channel_type.as_deref() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(kind, Style::default().fg(C_TAG)));
        }

        let item = ListItem::new(Line::from(spans));
        if under_cursor {
            item.style(Style::default().bg(C_SELECTION_BG))
        } else {
            item
        }
    }
}

impl Default for ChannelList {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for ChannelList {
    fn id(&self) -> ComponentId {
        ComponentId::ChannelList
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
            5
        } else {
            1
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(step),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(step),
            KeyCode::PageUp => self.list.select_up(10),
            KeyCode::PageDown => self.list.select_down(10),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),

            KeyCode::Enter => {
                if let Some(id) = self.cursor_id() {
                    return vec![Action::Select(id)];
                }
            }
            KeyCode::Char('p') | KeyCode::Char(' ') => {
                if let Some(id) = self.cursor_id() {
                    if state.playing_channel() == Some(id) {
                        return vec![Action::Stop];
                    }
                    return vec![Action::Play(id)];
                }
            }
            KeyCode::Char('y') => {
                if let Some(ch) = self.cursor_channel() {
                    if let Some(url) = ch
                        .live_audio_url
                        .as_deref()
                        .or(ch.site_url.as_deref())
                        .filter(|u| !u.is_empty())
                    {
                        return vec![Action::CopyToClipboard(url.to_string())];
                    }
                }
            }
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, _state: &AppState) -> Vec<Action> {
        let rel_row = event.row.saturating_sub(area.y + 1) as usize;
        match event.kind {
            MouseEventKind::ScrollUp => self.list.select_up(1),
            MouseEventKind::ScrollDown => self.list.select_down(1),
            MouseEventKind::Down(MouseButton::Left) => {
                let is_double = self
                    .last_click
                    .map(|(row, t)| row == rel_row && t.elapsed().as_millis() < DOUBLE_CLICK_MS)
                    .unwrap_or(false);
                if self.list.handle_click(rel_row) {
                    let Some(id) = self.cursor_id() else {
                        return vec![];
                    };
                    if is_double {
                        self.last_click = None;
                        return vec![Action::Play(id)];
                    }
                    self.last_click = Some((rel_row, Instant::now()));
                    return vec![Action::Select(id)];
                }
                self.last_click = Some((rel_row, Instant::now()));
            }
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::ChangeLimit(_) = action {
            self.list.select_first();
        }
        vec![]
    }

    fn sync(&mut self, state: &AppState) {
        let cursor = self.cursor_id();
        self.list.set_items(state.model.visible_channels().to_vec());

        if state.model.selected != self.last_selected {
            self.last_selected = state.model.selected;
            if let Some(id) = state.model.selected {
                if self.list.select_where(|c| c.id == id) {
                    return;
                }
            }
        }
        if let Some(id) = cursor {
            self.list.select_where(|c| c.id == id);
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let model = &state.model;
        let badge = if model.channels_loading {
            Some(Badge {
                text: "LOADING".into(),
                color: C_BADGE_PENDING,
            })
        } else if !model.channels.is_empty() {
            Some(Badge {
                text: format!("{}/{}", self.list.len(), model.channels.len()),
                color: C_BADGE_LIVE,
            })
        } else {
            None
        };
        let block = pane_chrome("channels", Some('1'), focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.list.is_empty() {
            let msg = if model.channels_loading {
                "  loading channels…"
            } else {
                "  no channels"
            };
            frame.render_widget(
                Paragraph::new(Span::styled(msg, Style::default().fg(C_MUTED))),
                inner,
            );
            return;
        }

        // Bottom row carries the tooltip of the channel under the cursor.
        let show_tooltip = inner.height > 3;
        let list_h = if show_tooltip {
            inner.height.saturating_sub(1)
        } else {
            inner.height
        } as usize;

        self.list.ensure_visible(list_h);
        let cursor = self.list.selected;
        let items: Vec<ListItem> = self
            .list
            .visible_items(list_h)
            .into_iter()
            .map(|(i, ch)| Self::render_item(ch, i == cursor, state))
            .collect();

        let list_area = Rect {
            height: list_h as u16,
            ..inner
        };
        self.list_state
            .select(Some(cursor.saturating_sub(self.list.scroll_offset)));
        frame.render_stateful_widget(List::new(items), list_area, &mut self.list_state);

        if show_tooltip {
            let tooltip = self
                .cursor_channel()
                .map(|c| c.tooltip())
                .unwrap_or_default();
            let tooltip_area = Rect {
                y: inner.y + inner.height - 1,
                height: 1,
                ..inner
            };
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(" {}", tooltip),
                    Style::default().fg(C_MUTED),
                )),
                tooltip_area,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabla_core::state::Model;

    fn channel(id: ChannelId, url: Option<&str>) -> ChannelRef {
        ChannelRef {
            id,
            name: format!("P{}", id),
            channel_type: Some("Rikskanal".into()),
            live_audio_url: url.map(str::to_string),
            ..Default::default()
        }
    }

    fn state_with(channels: Vec<ChannelRef>, selected: Option<ChannelId>) -> AppState {
        let mut model = Model::new(false, None);
        model.channels = channels;
        model.selected = selected;
        AppState::new(model)
    }

    fn press(list: &mut ChannelList, code: KeyCode, state: &AppState) -> Vec<Action> {
        list.handle_key(KeyEvent::new(code, KeyModifiers::NONE), state)
    }

    #[test]
    fn test_sync_follows_model_selection() {
        let state = state_with(
            vec![channel(132, None), channel(163, None), channel(164, None)],
            Some(163),
        );
        let mut list = ChannelList::new();
        list.sync(&state);
        assert_eq!(list.cursor_id(), Some(163));

        // A later sync with the same selection keeps the user's cursor.
        list.list.select_last();
        list.sync(&state);
        assert_eq!(list.cursor_id(), Some(164));
    }

    #[test]
    fn test_sync_respects_limit() {
        let channels: Vec<ChannelRef> = (1..=15).map(|id| channel(id, None)).collect();
        let state = state_with(channels, None);
        let mut list = ChannelList::new();
        list.sync(&state);
        assert_eq!(list.list.len(), 10);
    }

    #[test]
    fn test_enter_selects_and_p_toggles_playback() {
        let state = state_with(vec![channel(132, Some("https://x/p1.mp3"))], None);
        let mut list = ChannelList::new();
        list.sync(&state);

        let actions = press(&mut list, KeyCode::Enter, &state);
        assert!(matches!(actions.as_slice(), [Action::Select(132)]));

        let actions = press(&mut list, KeyCode::Char('p'), &state);
        assert!(matches!(actions.as_slice(), [Action::Play(132)]));

        let mut playing = state_with(vec![channel(132, Some("https://x/p1.mp3"))], None);
        playing.model.player = tabla_core::state::PlayerState::Playing {
            channel_id: 132,
            url: "https://x/p1.mp3".into(),
        };
        let actions = press(&mut list, KeyCode::Char('p'), &playing);
        assert!(matches!(actions.as_slice(), [Action::Stop]));
    }

    #[test]
    fn test_copy_prefers_stream_url() {
        let state = state_with(vec![channel(132, Some("https://x/p1.mp3"))], None);
        let mut list = ChannelList::new();
        list.sync(&state);
        let actions = press(&mut list, KeyCode::Char('y'), &state);
        match actions.as_slice() {
            [Action::CopyToClipboard(url)] => assert_eq!(url, "https://x/p1.mp3"),
            other => panic!("unexpected actions: {:?}", other),
        }

        let bare = state_with(vec![channel(164, None)], None);
        list.sync(&bare);
        assert!(press(&mut list, KeyCode::Char('y'), &bare).is_empty());
    }
}
