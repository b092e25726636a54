//! App: component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background tasks.
//! - The event loop draws each frame, then awaits the next message.
//! - Components return `Vec<Action>`; App dispatches each Action.
//! - All state changes go through `Model::update`; the `Effect`s it returns
//!   are run here (fetch tasks, mpv).

use std::io;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use tabla_core::api::{fetch_channels_or_empty, fetch_schedule_or_empty, SrClient};
use tabla_core::protocol::{Command, Effect, Message};
use tabla_core::state::{Model, PlayerState, StateManager};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::{channel_list::ChannelList, header::draw_header, schedule_panel::SchedulePanel},
    focus::FocusRing,
    player::Player,
    widgets::{
        count_input::{CountAction, CountInput},
        status_bar::{self, InputMode},
        toast::ToastManager,
    },
};

/// Everything the event loop reacts to.
#[derive(Debug)]
pub enum AppMessage {
    /// Terminal input.
    Event(Event),
    /// Fetch results and startup failures, fed to `Model::update`.
    Core(Message),
    /// Commands from the HTTP API.
    Remote(Command),
}

#[derive(Default, Clone, Copy)]
struct PaneAreas {
    channel_list: Rect,
    schedule: Rect,
}

pub struct App {
    state: AppState,
    channel_list: ChannelList,
    schedule_panel: SchedulePanel,
    focus: FocusRing,
    toast: ToastManager,
    count_input: CountInput,
    player: Player,
    /// `None` when the HTTP client could not be built; every fetch then fails.
    client: Option<SrClient>,
    state_manager: Arc<StateManager>,
    tx: mpsc::Sender<AppMessage>,
    pane_areas: PaneAreas,
    show_keys_bar: bool,
    should_quit: bool,
    /// Model revision the components last synced to.
    synced_rev: u64,
}

impl App {
    pub fn new(
        model: Model,
        client: Option<SrClient>,
        player: Player,
        state_manager: Arc<StateManager>,
        tx: mpsc::Sender<AppMessage>,
    ) -> Self {
        Self {
            state: AppState::new(model),
            channel_list: ChannelList::new(),
            schedule_panel: SchedulePanel::new(),
            focus: FocusRing::default(),
            toast: ToastManager::new(),
            count_input: CountInput::new(),
            player,
            client,
            state_manager,
            tx,
            pane_areas: PaneAreas::default(),
            show_keys_bar: true,
            should_quit: false,
            synced_rev: 0,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(
        mut self,
        startup: Vec<Effect>,
        mut rx: mpsc::Receiver<AppMessage>,
    ) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = self.tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        self.after_update();
        self.run_effects(startup).await;

        // Toast expiry, spinner, on-air clock and mpv liveness.
        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        loop {
            terminal.draw(|f| self.draw(f))?;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    self.handle_message(msg).await;
                    // Drain whatever else is queued before the next frame.
                    while let Ok(next) = rx.try_recv() {
                        self.handle_message(next).await;
                        if self.should_quit {
                            break;
                        }
                    }
                }

                _ = ui_tick.tick() => {
                    self.on_tick().await;
                }
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        self.player.stop().await;
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        info!("tabla exiting");
        Ok(())
    }

    async fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::Event(Event::Key(key)) => {
                for action in self.handle_key(key) {
                    self.dispatch(action).await;
                }
            }
            AppMessage::Event(Event::Mouse(mouse)) => {
                for action in self.handle_mouse(mouse) {
                    self.dispatch(action).await;
                }
            }
            AppMessage::Event(_) => {}
            AppMessage::Core(msg) => self.update(msg).await,
            AppMessage::Remote(cmd) => {
                debug!("remote command: {:?}", cmd);
                self.update(cmd.into()).await;
            }
        }
    }

    async fn on_tick(&mut self) {
        self.toast.tick();
        self.state.now = Utc::now();

        if self.player.is_running() && !self.player.process_alive() {
            self.toast.warning("stream ended");
            self.update(Command::Stop.into()).await;
        }

        let actions: Vec<Action> = {
            let s = &self.state;
            let mut all = self.channel_list.tick(s);
            all.extend(self.schedule_panel.tick(s));
            all
        };
        for action in actions {
            self.dispatch(action).await;
        }
    }

    // ── Model / effects ───────────────────────────────────────────────────────

    async fn update(&mut self, msg: Message) {
        let before = self.state.model.player.clone();
        let had_error = self.state.model.startup_error.is_some();
        let effects = self.state.model.update(msg, Utc::now());
        self.notify_player_change(&before);
        if !had_error {
            if let Some(err) = &self.state.model.startup_error {
                self.toast.error(err.clone());
            }
        }
        self.run_effects(effects).await;
        self.after_update();
    }

    fn notify_player_change(&mut self, before: &PlayerState) {
        let after = &self.state.model.player;
        if after == before {
            return;
        }
        if let PlayerState::NoStream { message, .. } = after {
            self.toast.warning(message.clone());
        }
    }

    /// Sync components and publish the snapshot when the model moved.
    fn after_update(&mut self) {
        let model = &self.state.model;
        if model.rev == self.synced_rev {
            return;
        }
        self.synced_rev = model.rev;

        if model.channels_loading {
            if !self.toast.has_spinner() {
                self.toast.spinner("loading channels");
            }
        } else {
            self.toast.dismiss_spinner();
        }

        self.channel_list.sync(&self.state);
        self.schedule_panel.sync(&self.state);

        let snapshot = self.state.model.clone();
        let state_manager = self.state_manager.clone();
        tokio::spawn(async move {
            state_manager.publish(&snapshot).await;
        });
    }

    async fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            debug!("effect: {:?}", effect);
            match effect {
                Effect::FetchChannels { seq } => self.spawn_fetch_channels(seq),
                Effect::FetchSchedule {
                    seq,
                    channel_id,
                    date,
                } => self.spawn_fetch_schedule(seq, channel_id, date),
                Effect::StartPlayback { channel_id, url } => {
                    match self.player.play(&url).await {
                        Ok(()) => {
                            self.state.player_error = None;
                            self.toast
                                .info(format!("playing {}", self.state.channel_name(channel_id)));
                        }
                        Err(e) => {
                            warn!("playback of {} failed: {}", url, e);
                            self.state.player_error = Some(e.to_string());
                            self.toast.error(format!("player: {}", e));
                            // Keep the model honest: nothing is playing.
                            let _ = self.state.model.update(Command::Stop.into(), Utc::now());
                        }
                    }
                }
                Effect::StopPlayback => self.player.stop().await,
            }
        }
    }

    fn spawn_fetch_channels(&self, seq: u64) {
        let tx = self.tx.clone();
        let Some(client) = self.client.clone() else {
            tokio::spawn(async move {
                let _ = tx
                    .send(AppMessage::Core(Message::StartupFailed(
                        "no HTTP client".into(),
                    )))
                    .await;
            });
            return;
        };
        tokio::spawn(async move {
            let channels = fetch_channels_or_empty(&client).await;
            let _ = tx
                .send(AppMessage::Core(Message::ChannelsLoaded { seq, channels }))
                .await;
        });
    }

    fn spawn_fetch_schedule(
        &self,
        seq: u64,
        channel_id: tabla_core::model::ChannelId,
        date: chrono::NaiveDate,
    ) {
        let tx = self.tx.clone();
        let Some(client) = self.client.clone() else {
            return;
        };
        tokio::spawn(async move {
            let entries = fetch_schedule_or_empty(&client, channel_id, date).await;
            let _ = tx
                .send(AppMessage::Core(Message::ScheduleLoaded {
                    seq,
                    channel_id,
                    date,
                    entries,
                }))
                .await;
        });
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
            return vec![Action::Quit];
        }

        // Count prompt captures all keys while open.
        if self.state.input_mode == InputMode::Count {
            return match self.count_input.handle_key(key) {
                CountAction::Submitted(count) => {
                    vec![Action::CloseCountPrompt, Action::ChangeLimit(count)]
                }
                CountAction::Cancelled => vec![Action::CloseCountPrompt],
                CountAction::Editing => vec![],
            };
        }

        match key.code {
            KeyCode::Char('q') => return vec![Action::Quit],
            KeyCode::Tab => return vec![Action::FocusNext],
            KeyCode::BackTab => return vec![Action::FocusPrev],
            KeyCode::Char('1') => return vec![Action::FocusPane(ComponentId::ChannelList)],
            KeyCode::Char('2') => return vec![Action::FocusPane(ComponentId::SchedulePanel)],
            KeyCode::Char('#') => return vec![Action::OpenCountPrompt],
            KeyCode::Char('R') => return vec![Action::ReloadChannels],
            KeyCode::Char('x') => return vec![Action::Stop],
            KeyCode::Char('K') => return vec![Action::ToggleKeys],
            // Player picker: steps through every channel, not just the visible ones.
            KeyCode::Char('[') | KeyCode::Char(']') => {
                let step = if key.code == KeyCode::Char(']') { 1 } else { -1 };
                let model = &self.state.model;
                return model
                    .neighbour_channel(model.player_channel(), step)
                    .map(Action::Play)
                    .into_iter()
                    .collect();
            }
            _ => {}
        }

        let s = &self.state;
        match self.focus.current() {
            Some(ComponentId::ChannelList) => self.channel_list.handle_key(key, s),
            Some(ComponentId::SchedulePanel) => self.schedule_panel.handle_key(key, s),
            None => vec![],
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        let is_click = matches!(
            event.kind,
            MouseEventKind::Down(_) | MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
        );
        if !is_click {
            return vec![];
        }

        fn hit(r: Rect, col: u16, row: u16) -> bool {
            r.width > 0
                && r.height > 0
                && col >= r.x
                && col < r.x + r.width
                && row >= r.y
                && row < r.y + r.height
        }

        let areas = self.pane_areas;
        let s = &self.state;
        let (id, mut actions) = if hit(areas.channel_list, event.column, event.row) {
            (
                ComponentId::ChannelList,
                self.channel_list.handle_mouse(event, areas.channel_list, s),
            )
        } else if hit(areas.schedule, event.column, event.row) {
            (
                ComponentId::SchedulePanel,
                self.schedule_panel.handle_mouse(event, areas.schedule, s),
            )
        } else {
            return vec![];
        };
        if !self.focus.is_focused(id) {
            actions.insert(0, Action::FocusPane(id));
        }
        actions
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    async fn dispatch(&mut self, action: Action) {
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = self.channel_list.on_action(&action, s);
            out.extend(self.schedule_panel.on_action(&action, s));
            out
        };

        self.apply_action(action).await;

        for a in secondary {
            self.apply_action(a).await;
        }
    }

    async fn apply_action(&mut self, action: Action) {
        debug!("apply_action: {:?}", action);
        match action {
            Action::Select(id) => self.update(Command::SelectChannel { id }.into()).await,
            Action::ReloadChannels => self.update(Command::ReloadChannels.into()).await,
            Action::ChangeLimit(count) => {
                self.update(Command::ChangeLimit { count }.into()).await;
                self.toast.info(format!(
                    "showing {} channels",
                    self.state.model.effective_limit()
                ));
            }
            Action::Play(id) => self.update(Command::Play { id }.into()).await,
            Action::Stop => self.update(Command::Stop.into()).await,

            Action::FocusNext => {
                self.focus.next();
            }
            Action::FocusPrev => {
                self.focus.prev();
            }
            Action::FocusPane(id) => self.focus.set(id),

            Action::OpenCountPrompt => {
                self.count_input.activate(self.state.model.effective_limit());
                self.state.input_mode = InputMode::Count;
            }
            Action::CloseCountPrompt => {
                self.count_input.deactivate();
                self.state.input_mode = InputMode::Normal;
            }

            Action::ToggleKeys => self.show_keys_bar = !self.show_keys_bar,
            Action::CopyToClipboard(text) => {
                match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.clone())) {
                    Ok(()) => {
                        let display = if text.chars().count() > 40 {
                            format!("{}…", text.chars().take(40).collect::<String>())
                        } else {
                            text.clone()
                        };
                        self.toast.success(format!("copied: {}", display));
                    }
                    Err(e) => {
                        warn!("clipboard error: {}", e);
                        self.toast.error(format!("clipboard error: {}", e));
                    }
                }
            }

            Action::Quit => self.should_quit = true,
        }
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        use crate::theme::C_BG;
        use ratatui::widgets::Block;
        let area = frame.area();

        frame.render_widget(
            Block::default().style(ratatui::style::Style::default().bg(C_BG)),
            area,
        );

        // ── Outer layout: header | body | (count prompt) | (statusbar) ───────
        let prompt_h = if self.count_input.active { 1u16 } else { 0 };
        let status_h = if self.show_keys_bar { 1u16 } else { 0 };
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(prompt_h),
                Constraint::Length(status_h),
            ])
            .split(area);

        draw_header(frame, outer[0], &self.state);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(outer[1]);
        self.pane_areas = PaneAreas {
            channel_list: body[0],
            schedule: body[1],
        };

        let list_focused = self.focus.is_focused(ComponentId::ChannelList);
        let schedule_focused = self.focus.is_focused(ComponentId::SchedulePanel);
        self.channel_list
            .draw(frame, body[0], list_focused, &self.state);
        self.schedule_panel
            .draw(frame, body[1], schedule_focused, &self.state);

        if self.count_input.active {
            self.count_input.draw(frame, outer[2]);
        }
        if self.show_keys_bar {
            status_bar::draw_keys_bar(
                frame,
                outer[3],
                self.state.input_mode,
                self.state.model.player.is_playing(),
            );
        }

        self.toast.draw(frame, area);
    }
}
