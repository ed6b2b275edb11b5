/// Open MOBA Backend AOI Server
/// 
/// 燈塔 AOI 伺服器外殼：設定、日誌、指令佇列與 tick 循環

pub mod config;
pub mod msg;
pub mod state;

// Re-export commonly used types
pub use crate::msg::{AoiNotice, NoticeKind, PlayerCommand};
pub use crate::state::{State, TimeManager};
