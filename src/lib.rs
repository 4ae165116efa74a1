pub mod config;
pub mod raid;
pub mod twitch;
