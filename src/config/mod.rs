pub mod server_config;

pub use server_config::{ServerSetting, Setting, GAME_CONFIG};
