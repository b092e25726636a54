//! Component trait: the interface every UI panel implements.
//!
//! - Components own their view state (cursor, scroll) and render themselves.
//! - They read `AppState` for everything else and never mutate it.
//! - They answer input with `Vec<Action>`; the App dispatches those.

use ratatui::crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{layout::Rect, Frame};

use crate::action::{Action, ComponentId};
use crate::app_state::AppState;

pub trait Component {
    fn id(&self) -> ComponentId;

    /// Only called when this component has focus.
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action>;

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, state: &AppState) -> Vec<Action>;

    /// Called each tick (~100ms).
    fn tick(&mut self, _state: &AppState) -> Vec<Action> {
        Vec::new()
    }

    /// Receive an action dispatched by the App, focused or not.
    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action>;

    /// The model changed (new `rev`).
    fn sync(&mut self, _state: &AppState) {}

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState);
}
