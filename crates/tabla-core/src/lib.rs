pub mod api;
pub mod config;
pub mod limit;
pub mod live;
pub mod model;
pub mod platform;
pub mod protocol;
pub mod schedule;
pub mod state;
pub mod timestamp;
