use thiserror::Error;

use crate::entity::EntityId;

/// AOI 操作錯誤
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AoiError {
    /// 重複進入地圖
    #[error("entity {0} is already registered")]
    IdConflict(EntityId),
    /// 實體未註冊
    #[error("entity {0} is not registered")]
    NotFound(EntityId),
    /// 座標超出地圖範圍
    #[error("position ({x}, {y}) is outside the map")]
    OutOfBounds { x: u32, y: u32 },
    #[error("invalid aoi config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, AoiError>;
