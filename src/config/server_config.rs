use aoi_system::AoiConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// 預設設定檔路徑
pub const GAME_CONFIG: &str = "game.toml";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ServerSetting {
    /// 每秒 tick 數
    pub TICK_RATE: u64,
    /// log4rs 設定檔，不存在時改用主控台輸出
    pub LOG_CONFIG: String,
}

impl Default for ServerSetting {
    fn default() -> Self {
        Self {
            TICK_RATE: 10,
            LOG_CONFIG: "log4rs.yml".to_owned(),
        }
    }
}

impl ServerSetting {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.TICK_RATE.max(1) as f64)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Setting {
    #[serde(default)]
    pub server: ServerSetting,
    #[serde(default)]
    pub aoi: AoiConfig,
}

impl Setting {
    pub fn load(file_path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let file_path = file_path.as_ref();
        let mut file = File::open(file_path)
            .with_context(|| format!("no such file {}", file_path.display()))?;
        let mut str_val = String::new();
        file.read_to_string(&mut str_val)
            .with_context(|| format!("Error Reading {}", file_path.display()))?;
        Self::parse(&str_val)
    }

    /// 檔案不存在時回傳 None；存在但內容錯誤時回傳錯誤，不退回預設值
    pub fn load_optional(file_path: impl AsRef<Path>) -> anyhow::Result<Option<Self>> {
        let file_path = file_path.as_ref();
        if !file_path.exists() {
            return Ok(None);
        }
        Self::load(file_path).map(Some)
    }

    pub fn parse(str_val: &str) -> anyhow::Result<Self> {
        let setting: Setting = toml::from_str(str_val).context("invalid game.toml")?;
        setting.aoi.validate()?;
        Ok(setting)
    }
}
