/// 燈塔 AOI 系統
///
/// 純邏輯處理，不依賴 ECS 與網路層。
/// 地圖切成固定大小的燈塔，每座燈塔記錄站在裡面的實體 (marker)
/// 以及視野覆蓋到它的實體 (watcher)，移動時只計算視野窗口的差集。

pub mod config;
pub mod entity;
pub mod error;
pub mod grid;
pub mod manager;
pub mod shared;
pub mod tower;

pub use config::AoiConfig;
pub use entity::{Entity, EntityId};
pub use error::{AoiError, Result};
pub use grid::{Grid, TowerWindow};
pub use manager::{AoiManager, AoiStats};
pub use shared::SharedAoi;
pub use tower::{Tower, TowerCoord};
