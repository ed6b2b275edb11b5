use log::{info, warn, error};
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use log::LevelFilter;
use std::io::{self, BufRead};
use std::path::Path;
use std::thread;

use omb_aoi::config::{ServerSetting, Setting, GAME_CONFIG};
use omb_aoi::{AoiNotice, PlayerCommand, State, TimeManager};

fn init_logging(path: &str) -> anyhow::Result<()> {
    if Path::new(path).exists() {
        log4rs::init_file(path, Default::default())?;
        return Ok(());
    }
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S%.3f)} {h({l})} {t} - {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info))?;
    log4rs::init_config(config)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let loaded = Setting::load_optional(GAME_CONFIG);
    let log_config = match &loaded {
        Ok(Some(setting)) => setting.server.LOG_CONFIG.clone(),
        _ => ServerSetting::default().LOG_CONFIG,
    };
    init_logging(&log_config)?;
    let setting = match loaded {
        Ok(Some(setting)) => setting,
        Ok(None) => {
            warn!("{} 不存在，使用預設設定", GAME_CONFIG);
            Setting::default()
        }
        Err(e) => {
            error!("{} 設定錯誤: {:#}", GAME_CONFIG, e);
            return Err(e);
        }
    };
    info!("aoi setting {:?}", setting);

    let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<PlayerCommand>();
    let (notice_tx, notice_rx) = crossbeam_channel::unbounded::<AoiNotice>();
    let mut state = State::new(setting.aoi.clone(), cmd_rx, notice_tx)?;
    let mut time = TimeManager::new(setting.server.tick_interval());

    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    error!("stdin: {}", e);
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<PlayerCommand>() {
                Ok(cmd) => {
                    if cmd_tx.send(cmd).is_err() {
                        break;
                    }
                }
                Err(e) => warn!("無法解析指令 `{}`: {:#}", line.trim(), e),
            }
        }
    });

    thread::spawn(move || {
        for notice in notice_rx.iter() {
            info!("{}", notice);
        }
    });

    loop {
        let applied = state.tick();
        if applied > 0 {
            log::debug!("tick {} 套用 {} 個指令 {:?}", time.ticks(), applied, state.aoi().lock().stats());
        }
        // Wait for the next tick.
        time.tick();
    }
}
