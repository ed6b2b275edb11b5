/// 伺服器核心狀態

use aoi_system::{AoiConfig, Entity, SharedAoi};
use crossbeam_channel::{Receiver, Sender};

use crate::msg::{AoiNotice, NoticeKind, PlayerCommand};

/// 伺服器核心狀態
pub struct State {
    /// 燈塔 AOI
    aoi: SharedAoi,
    /// 玩家指令接收通道
    cmd_rx: Receiver<PlayerCommand>,
    /// 通知發送通道 (交給傳輸層)
    notice_tx: Sender<AoiNotice>,
}

impl State {
    pub fn new(
        config: AoiConfig,
        cmd_rx: Receiver<PlayerCommand>,
        notice_tx: Sender<AoiNotice>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            aoi: SharedAoi::new(config)?,
            cmd_rx,
            notice_tx,
        })
    }

    pub fn aoi(&self) -> &SharedAoi {
        &self.aoi
    }

    /// 主循環 tick：處理所有待處理的指令，回傳成功套用的數量
    pub fn tick(&mut self) -> usize {
        let mut applied = 0;
        for cmd in self.cmd_rx.try_iter() {
            match self.apply(&cmd) {
                Ok(()) => applied += 1,
                Err(e) => log::warn!("指令 {:?} 失敗: {}", cmd, e),
            }
        }
        applied
    }

    /// 套用單一指令
    pub fn apply(&self, cmd: &PlayerCommand) -> aoi_system::Result<()> {
        match cmd {
            PlayerCommand::Enter { id, name, x, y } => self.aoi.with(|m| {
                m.enter(Entity::new(*id, name.clone(), *x, *y), |a, b| {
                    self.notify(NoticeKind::Meet, a, b)
                })
            }),
            PlayerCommand::Move { id, x, y } => self.aoi.with(|m| {
                m.move_to(
                    *id,
                    *x,
                    *y,
                    |a, b| self.notify(NoticeKind::Move, a, b),
                    |a, b| self.notify(NoticeKind::Leave, a, b),
                    |a, b| self.notify(NoticeKind::Enter, a, b),
                )
            }),
            PlayerCommand::Leave { id } => self
                .aoi
                .with(|m| m.leave(*id, |a, b| self.notify(NoticeKind::Depart, a, b)))
                .map(|_| ()),
            PlayerCommand::Query { id } => {
                let visible = self.aoi.lock().visible_ids(*id)?;
                log::info!("玩家[{}] 可見 {:?}", id, visible);
                Ok(())
            }
        }
    }

    fn notify(&self, kind: NoticeKind, subject: &Entity, other: &Entity) {
        if self.notice_tx.send(AoiNotice::new(kind, subject, other)).is_err() {
            log::warn!("通知通道已關閉，丟棄 {:?} {} -> {}", kind, subject.id, other.id);
        }
    }
}
