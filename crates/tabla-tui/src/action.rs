//! Action enum: all user-initiated intents and internal events.

use tabla_core::model::ChannelId;

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    ChannelList,
    SchedulePanel,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Channels / schedule ──────────────────────────────────────────────────
    Select(ChannelId),
    ReloadChannels,
    ChangeLimit(Option<f64>),

    // ── Playback ─────────────────────────────────────────────────────────────
    Play(ChannelId),
    Stop,

    // ── Navigation ───────────────────────────────────────────────────────────
    FocusNext,
    FocusPrev,
    FocusPane(ComponentId),

    // ── Count prompt ─────────────────────────────────────────────────────────
    OpenCountPrompt,
    CloseCountPrompt,

    // ── UI toggles ───────────────────────────────────────────────────────────
    ToggleKeys,
    CopyToClipboard(String),

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
}
