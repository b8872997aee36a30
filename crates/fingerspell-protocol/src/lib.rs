pub mod config;
pub mod landmarks;
pub mod messages;
