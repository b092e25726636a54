pub mod channel_list;
pub mod header;
pub mod schedule_panel;
