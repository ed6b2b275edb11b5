use serde::{Deserialize, Serialize};

use crate::error::{AoiError, Result};

/// AOI 配置
///
/// 地圖與燈塔尺寸、視野半徑，單位都與實體座標相同。
/// 建立 Grid 後就固定，不支援動態調整。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AoiConfig {
    /// 地圖寬度 (x)
    pub map_width: u32,
    /// 地圖高度 (y)
    pub map_height: u32,
    pub tower_width: u32,
    pub tower_height: u32,
    /// 視野半徑
    pub visible_range: u32,
}

impl Default for AoiConfig {
    fn default() -> Self {
        Self {
            map_width: 50,
            map_height: 50,
            tower_width: 5,
            tower_height: 5,
            visible_range: 5,
        }
    }
}

impl AoiConfig {
    pub fn new(map_width: u32, map_height: u32, tower_width: u32, tower_height: u32, visible_range: u32) -> Self {
        Self {
            map_width,
            map_height,
            tower_width,
            tower_height,
            visible_range,
        }
    }

    /// 從JSON字符串載入配置
    pub fn from_json(json_content: &str) -> Result<Self> {
        let config: AoiConfig = serde_json::from_str(json_content)
            .map_err(|e| AoiError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 檢查尺寸設定
    pub fn validate(&self) -> Result<()> {
        if self.map_width == 0 || self.map_height == 0 {
            return Err(AoiError::InvalidConfig(format!(
                "map size {}x{} must be non-zero",
                self.map_width, self.map_height
            )));
        }
        if self.tower_width == 0 || self.tower_height == 0 {
            return Err(AoiError::InvalidConfig(format!(
                "tower size {}x{} must be non-zero",
                self.tower_width, self.tower_height
            )));
        }
        if self.tower_count().is_none() {
            return Err(AoiError::InvalidConfig(format!(
                "grid {}x{} is too large",
                self.grid_cols(),
                self.grid_rows()
            )));
        }
        Ok(())
    }

    /// 燈塔欄數 ceil(map_width / tower_width)
    pub fn grid_cols(&self) -> u32 {
        self.map_width.div_ceil(self.tower_width)
    }

    /// 燈塔列數 ceil(map_height / tower_height)
    pub fn grid_rows(&self) -> u32 {
        self.map_height.div_ceil(self.tower_height)
    }

    /// 燈塔總數，超出 usize 時為 None
    pub fn tower_count(&self) -> Option<usize> {
        let cols = usize::try_from(self.grid_cols()).ok()?;
        let rows = usize::try_from(self.grid_rows()).ok()?;
        cols.checked_mul(rows)
    }
}
