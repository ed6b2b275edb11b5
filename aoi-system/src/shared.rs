use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::config::AoiConfig;
use crate::error::Result;
use crate::manager::AoiManager;

/// 跨執行緒共用的 AOI 管理器
///
/// 整個管理器一把鎖：每次進入、離開、移動都在鎖內完成，
/// 雙向連結不會被其他執行緒看到一半。回呼在持鎖時執行，不可重入。
#[derive(Debug, Clone)]
pub struct SharedAoi {
    inner: Arc<Mutex<AoiManager>>,
}

impl SharedAoi {
    pub fn new(config: AoiConfig) -> Result<Self> {
        Ok(Self::from_manager(AoiManager::new(config)?))
    }

    pub fn from_manager(manager: AoiManager) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, AoiManager> {
        self.inner.lock()
    }

    /// 在鎖內執行一段操作
    pub fn with<R>(&self, f: impl FnOnce(&mut AoiManager) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use std::thread;

    #[test]
    fn test_concurrent_moves_keep_links_symmetric() {
        let aoi = SharedAoi::new(AoiConfig::new(100, 100, 10, 10, 10)).unwrap();
        for id in 0..8u64 {
            let x = (id as u32 * 12) % 100;
            aoi.with(|m| m.enter(Entity::new(id, format!("p{}", id), x, 50), |_, _| {}))
                .unwrap();
        }

        let handles: Vec<_> = (0..8u64)
            .map(|id| {
                let aoi = aoi.clone();
                thread::spawn(move || {
                    for step in 0..50u32 {
                        let x = (id as u32 * 12 + step * 7) % 100;
                        let y = (step * 13 + id as u32) % 100;
                        aoi.with(|m| m.move_to(id, x, y, |_, _| {}, |_, _| {}, |_, _| {}))
                            .unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let manager = aoi.lock();
        for e in manager.entities() {
            for other in e.visible_set() {
                assert!(manager.lookup(*other).unwrap().can_see(e.id));
            }
        }
    }
}
