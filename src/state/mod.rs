/// 伺服器狀態管理模塊
///
/// 負責 AOI 管理器、指令佇列與時間循環

pub mod core;
pub mod time_management;

pub use self::core::State;
pub use self::time_management::TimeManager;
