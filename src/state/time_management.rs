/// 時間管理器 - 固定頻率的 tick 節拍

use std::time::{Duration, Instant};

pub struct TimeManager {
    /// 每個 tick 的間隔
    interval: Duration,
    last_tick: Instant,
    ticks: u64,
}

impl TimeManager {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_tick: Instant::now(),
            ticks: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// 距離上次 tick 的時間
    pub fn dt(&self) -> Duration {
        self.last_tick.elapsed()
    }

    /// 睡到下一個 tick，回傳本次實際經過時間
    pub fn tick(&mut self) -> Duration {
        let spent = self.last_tick.elapsed();
        if spent < self.interval {
            spin_sleep::sleep(self.interval - spent);
        } else if spent > self.interval * 2 {
            log::warn!("tick {} 超時 {:?}", self.ticks, spent);
        }
        let dt = self.last_tick.elapsed();
        self.last_tick = Instant::now();
        self.ticks += 1;
        dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_waits_for_interval() {
        let mut time = TimeManager::new(Duration::from_millis(5));
        assert_eq!(time.interval(), Duration::from_millis(5));
        let dt = time.tick();
        assert!(dt >= Duration::from_millis(5));
        assert_eq!(time.ticks(), 1);
    }
}
